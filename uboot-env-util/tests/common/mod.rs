#![allow(dead_code)]

use std::path::Path;
use uboot_env::{DIGEST_LEN, Layout, UbootDigest};

/// Offset of the stored U-Boot digest in generated images.
pub const HASH_AT: usize = 0x600;

/// Builds one PineNote image copy with `env` in the environment block and a
/// matching digest at [`HASH_AT`].
pub fn pinenote_copy(env: &[u8]) -> Vec<u8> {
    let layout = Layout::PINENOTE;
    let mut copy: Vec<u8> = (0..layout.image_size())
        .map(|i| (i.wrapping_mul(31) >> 3) as u8)
        .collect();

    let start = layout.uboot_offset() + layout.env_offset();
    copy[start..start + layout.env_size()].fill(0);
    copy[start..start + env.len()].copy_from_slice(env);

    let digest = UbootDigest::compute(&copy[layout.uboot_range()]);
    copy[HASH_AT..HASH_AT + DIGEST_LEN].copy_from_slice(digest.as_bytes());
    copy
}

/// Writes `copy` twice to `path`, returning the file content.
pub fn write_duplicated(path: &Path, copy: &[u8]) -> Vec<u8> {
    let raw = [copy, copy].concat();
    std::fs::write(path, &raw).expect("failed to write image");
    raw
}

/// Absolute range of the environment block within one copy.
pub fn env_range() -> std::ops::Range<usize> {
    let layout = Layout::PINENOTE;
    let start = layout.uboot_offset() + layout.env_offset();
    start..start + layout.env_size()
}
