use crate::env::{CapacityError, DecodeError, Environment};
use crate::hash::{self, HashLocation, LocateError, UbootDigest};
use crate::layout::Layout;
use snafu::{ResultExt, Snafu, ensure};

/// Errors when reading a duplicated image.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ReadError {
    #[snafu(display("image file is {actual} bytes, expected {expected} (two copies)"))]
    WrongSize { expected: usize, actual: usize },

    #[snafu(display("image copies differ starting at offset 0x{offset:X}"))]
    CopyMismatch { offset: usize },
}

/// One verified copy of a firmware image.
#[derive(Clone, PartialEq, Eq)]
#[must_use]
pub struct Image {
    data: Vec<u8>,
    layout: Layout,
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("layout", &self.layout)
            .field("len", &self.data.len())
            .finish_non_exhaustive()
    }
}

impl Image {
    /// Parses the on-disk representation: two identical copies back to back.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::WrongSize`] if `raw` is not exactly two copies long
    /// and [`ReadError::CopyMismatch`] if the copies differ.
    pub fn from_duplicated(raw: &[u8], layout: Layout) -> Result<Self, ReadError> {
        ensure!(
            raw.len() == layout.file_size(),
            WrongSizeSnafu {
                expected: layout.file_size(),
                actual: raw.len(),
            }
        );

        let (first, second) = raw.split_at(layout.image_size());

        if let Some(offset) = first.iter().zip(second).position(|(a, b)| a != b) {
            return CopyMismatchSnafu { offset }.fail();
        }

        Ok(Self {
            data: first.to_vec(),
            layout,
        })
    }

    /// Returns the layout this image was read with.
    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Returns the bytes of one copy.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the embedded U-Boot sub-image.
    #[must_use]
    pub fn uboot(&self) -> &[u8] {
        &self.data[self.layout.uboot_range()]
    }

    /// Returns the raw environment block inside the U-Boot sub-image.
    #[must_use]
    pub fn env_block(&self) -> &[u8] {
        &self.uboot()[self.layout.env_range()]
    }

    /// Decodes the default environment.
    pub fn environment(&self) -> Result<Environment, DecodeError> {
        Environment::decode(self.env_block())
    }

    /// Returns the digest of the current U-Boot sub-image.
    pub fn uboot_digest(&self) -> UbootDigest {
        UbootDigest::compute(self.uboot())
    }

    /// Locates the stored copy of the current U-Boot digest.
    pub fn hash_location(&self) -> Result<HashLocation, LocateError> {
        hash::locate(&self.data, &self.uboot_digest())
    }

    /// Replaces the environment and re-signs the U-Boot digest.
    ///
    /// The digest location is resolved before anything is modified, so on
    /// error the image is left untouched.
    pub fn patch_environment(&mut self, env: &Environment) -> Result<Patched, PatchError> {
        let block = env.encode(self.layout.env_size()).context(CapacitySnafu)?;
        self.replace_env_block(&block)
    }

    /// Replaces the raw environment block and re-signs the U-Boot digest.
    ///
    /// `block` must be exactly [`Layout::env_size()`] bytes, as produced by
    /// [`Environment::encode()`].
    pub fn replace_env_block(&mut self, block: &[u8]) -> Result<Patched, PatchError> {
        ensure!(
            block.len() == self.layout.env_size(),
            BlockSizeSnafu {
                expected: self.layout.env_size(),
                actual: block.len(),
            }
        );

        // Must be resolved against the unpatched U-Boot.
        let location = self.hash_location().context(LocateSnafu)?;

        let mut uboot = self.uboot().to_vec();
        uboot[self.layout.env_range()].copy_from_slice(block);

        let digest = UbootDigest::compute(&uboot);

        self.data[self.layout.uboot_range()].copy_from_slice(&uboot);
        self.data[location.offset..location.offset + hash::DIGEST_LEN]
            .copy_from_slice(digest.as_bytes());

        Ok(Patched { location, digest })
    }

    /// Serializes the image back to its on-disk form (two copies).
    #[must_use]
    pub fn to_duplicated(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.layout.file_size());
        out.extend_from_slice(&self.data);
        out.extend_from_slice(&self.data);
        out
    }
}

/// Result of [`Image::patch_environment()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patched {
    /// Where the digest was found in the original image.
    pub location: HashLocation,
    /// Digest of the patched U-Boot, now stored at `location.offset`.
    pub digest: UbootDigest,
}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum PatchError {
    #[snafu(display("environment does not fit"))]
    Capacity { source: CapacityError },

    #[snafu(display("environment block is {actual} bytes, expected {expected}"))]
    BlockSize { expected: usize, actual: usize },

    #[snafu(display("cannot locate U-Boot digest"))]
    Locate { source: LocateError },
}
