//! A library for reading and patching the default U-Boot environment stored
//! inside PineNote firmware images.
//!
//! A PineNote `uboot.img` holds the same image twice. Each copy embeds the
//! U-Boot binary at a fixed offset, and the default environment sits at a
//! fixed offset inside U-Boot as a block of `NUL`-separated `name=value`
//! lines. The loader verifies U-Boot against a SHA-256 digest stored
//! elsewhere in the image, so editing the environment means re-signing it.
//!
//! # Features
//!
//! - Verify and split the duplicated on-disk image
//! - Decode the environment block into lines and encode it back
//! - Parse environment text with or without `#` comments
//! - Locate and rewrite the embedded U-Boot digest
//!
//! # Example
//!
//! ```no_run
//! use uboot_env::{CommentMode, Environment, Image, Layout};
//!
//! let raw = std::fs::read("uboot.img").unwrap();
//! let mut image = Image::from_duplicated(&raw, Layout::PINENOTE).unwrap();
//!
//! for line in image.environment().unwrap().lines() {
//!     println!("{line}");
//! }
//!
//! let env = Environment::parse_text(b"bootdelay=0\n", CommentMode::Strip).unwrap();
//! image.patch_environment(&env).unwrap();
//! std::fs::write("uboot-new.img", image.to_duplicated()).unwrap();
//! ```

pub use self::env::{CapacityError, CommentMode, DecodeError, Environment, ValidationError};
pub use self::hash::{DIGEST_LEN, HashLocation, LocateError, UbootDigest};
pub use self::image::{Image, PatchError, Patched, ReadError};
pub use self::layout::{Layout, LayoutError};

pub mod env;
pub mod hash;
pub mod image;
pub mod layout;
