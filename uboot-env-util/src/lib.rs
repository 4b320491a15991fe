//! Library for extracting and re-inserting the default U-Boot environment of
//! PineNote firmware images.
//!
//! This crate wires the format logic of [`uboot_env`] to files on disk.
//!
//! # Overview
//!
//! The main entry point is [`EnvPatcher`], which takes [`PatchOptions`] and a
//! [`Reporter`] implementation, then runs `extract`, `insert` or `inspect`
//! against image and text files.
//!
//! # Example
//!
//! ```no_run
//! use uboot_env_util::{EnvPatcher, PatchOptions, SilentReporter};
//!
//! let patcher = EnvPatcher::new(PatchOptions::default(), SilentReporter);
//! patcher.extract("uboot.img", "env.txt").expect("extraction failed");
//! // ... edit env.txt ...
//! patcher
//!     .insert(Some("uboot.img".as_ref()), "env.txt", "uboot-new.img")
//!     .expect("insertion failed");
//! ```
//!
//! # Custom reporting
//!
//! You can implement the [`Reporter`] trait to receive the diagnostics
//! produced while an image is processed.

pub mod patch;
pub mod report;

pub use self::patch::{EnvPatcher, ImageInfo, PatchError, PatchOptions};
pub use self::report::{LogReporter, Reporter, SilentReporter};

use snafu::{ResultExt, Snafu};
use std::path::Path;
use uboot_env::{Image, Layout};

/// Errors that can occur when reading an image from disk.
#[derive(Debug, Snafu)]
pub enum ReadImageError {
    #[snafu(display("failed to read file"))]
    ReadFile { source: std::io::Error },

    #[snafu(display("invalid image"))]
    ParseImage { source: uboot_env::ReadError },
}

/// Reads a duplicated image from disk and verifies both copies.
///
/// The whole file is loaded into memory; images are a few megabytes.
pub fn read_image(path: &Path, layout: Layout) -> Result<Image, ReadImageError> {
    let raw = std::fs::read(path).context(ReadFileSnafu)?;
    Image::from_duplicated(&raw, layout).context(ParseImageSnafu)
}
