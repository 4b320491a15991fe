use snafu::{Snafu, ensure};
use std::ops::Range;

/// Errors when describing a custom [`Layout`].
#[derive(Debug, Snafu)]
#[snafu(module)]
#[non_exhaustive]
pub enum LayoutError {
    #[snafu(display("{region} size must not be zero"))]
    ZeroSize { region: &'static str },

    #[snafu(display(
        "U-Boot region 0x{offset:X}+0x{size:X} does not fit in a 0x{image_size:X} byte image"
    ))]
    UbootOutOfBounds {
        offset: usize,
        size: usize,
        image_size: usize,
    },

    #[snafu(display(
        "environment region 0x{offset:X}+0x{size:X} does not fit in a 0x{uboot_size:X} byte U-Boot"
    ))]
    EnvOutOfBounds {
        offset: usize,
        size: usize,
        uboot_size: usize,
    },
}

/// Geometry of a duplicated firmware image.
///
/// All offsets are in bytes. `uboot_offset` is relative to the start of one
/// image copy, `env_offset` is relative to the start of the U-Boot sub-image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layout {
    image_size: usize,
    uboot_offset: usize,
    uboot_size: usize,
    env_offset: usize,
    env_size: usize,
}

impl Layout {
    /// Layout of the PineNote U-Boot image (`uboot.img`).
    pub const PINENOTE: Self = Self {
        image_size: 0x200000,
        uboot_offset: 0xE00,
        uboot_size: 0x128288,
        env_offset: 0xC1730,
        env_size: 0xE29,
    };

    /// Creates a custom layout, checking that every region fits in its parent.
    pub fn new(
        image_size: usize,
        uboot_offset: usize,
        uboot_size: usize,
        env_offset: usize,
        env_size: usize,
    ) -> Result<Self, LayoutError> {
        use layout_error::*;

        ensure!(image_size != 0, ZeroSizeSnafu { region: "image" });
        ensure!(uboot_size != 0, ZeroSizeSnafu { region: "U-Boot" });
        ensure!(env_size != 0, ZeroSizeSnafu { region: "environment" });

        let fits = |offset: usize, size: usize, parent: usize| {
            offset.checked_add(size).is_some_and(|end| end <= parent)
        };

        ensure!(
            fits(uboot_offset, uboot_size, image_size),
            UbootOutOfBoundsSnafu {
                offset: uboot_offset,
                size: uboot_size,
                image_size,
            }
        );
        ensure!(
            fits(env_offset, env_size, uboot_size),
            EnvOutOfBoundsSnafu {
                offset: env_offset,
                size: env_size,
                uboot_size,
            }
        );

        Ok(Self {
            image_size,
            uboot_offset,
            uboot_size,
            env_offset,
            env_size,
        })
    }

    /// Returns the size of one image copy.
    #[must_use]
    pub const fn image_size(&self) -> usize {
        self.image_size
    }

    /// Returns the size of the on-disk file (two copies).
    #[must_use]
    pub const fn file_size(&self) -> usize {
        self.image_size * 2
    }

    #[must_use]
    pub const fn uboot_offset(&self) -> usize {
        self.uboot_offset
    }

    #[must_use]
    pub const fn uboot_size(&self) -> usize {
        self.uboot_size
    }

    #[must_use]
    pub const fn env_offset(&self) -> usize {
        self.env_offset
    }

    /// Returns the capacity of the environment block, terminator included.
    #[must_use]
    pub const fn env_size(&self) -> usize {
        self.env_size
    }

    /// Range of the U-Boot sub-image within one image copy.
    #[must_use]
    pub const fn uboot_range(&self) -> Range<usize> {
        self.uboot_offset..(self.uboot_offset + self.uboot_size)
    }

    /// Range of the environment block within the U-Boot sub-image.
    #[must_use]
    pub const fn env_range(&self) -> Range<usize> {
        self.env_offset..(self.env_offset + self.env_size)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::PINENOTE
    }
}
