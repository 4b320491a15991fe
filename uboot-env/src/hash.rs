use sha2::{Digest, Sha256};
use snafu::{OptionExt, Snafu};
use std::fmt;

/// Length of the embedded U-Boot digest.
pub const DIGEST_LEN: usize = 32;

/// The U-Boot digest was not found in the image.
#[derive(Debug, Snafu)]
#[snafu(display("U-Boot digest {digest} not found in image"))]
pub struct LocateError {
    pub digest: UbootDigest,
}

/// SHA-256 digest of a U-Boot sub-image.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct UbootDigest([u8; DIGEST_LEN]);

impl UbootDigest {
    /// Computes the digest of `uboot`.
    pub fn compute(uboot: &[u8]) -> Self {
        Self(Sha256::digest(uboot).into())
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl fmt::Display for UbootDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }

        Ok(())
    }
}

impl fmt::Debug for UbootDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UbootDigest({self})")
    }
}

/// Where a digest is stored in an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashLocation {
    /// Offset of the first occurrence. This is the one that gets patched.
    pub offset: usize,
    /// Offset of a second occurrence, if the image has one.
    pub duplicate: Option<usize>,
}

/// Finds the first occurrence of `digest` in `image`.
///
/// The search continues past the first match to detect a second copy of the
/// same bytes, which makes the hash placement ambiguous.
pub fn locate(image: &[u8], digest: &UbootDigest) -> Result<HashLocation, LocateError> {
    let offset = find(image, digest.as_bytes()).context(LocateSnafu { digest: *digest })?;
    let duplicate = find(&image[offset + 1..], digest.as_bytes()).map(|o| offset + 1 + o);

    Ok(HashLocation { offset, duplicate })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_matches_known_vector() {
        assert_eq!(
            UbootDigest::compute(b"abc").to_string(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn locate_first_occurrence() {
        let digest = UbootDigest::compute(b"uboot");
        let mut image = vec![0xFFu8; 256];
        image[100..132].copy_from_slice(digest.as_bytes());

        let loc = locate(&image, &digest).unwrap();
        assert_eq!(loc.offset, 100);
        assert_eq!(loc.duplicate, None);
    }

    #[test]
    fn locate_reports_duplicate() {
        let digest = UbootDigest::compute(b"uboot");
        let mut image = vec![0u8; 256];
        image[10..42].copy_from_slice(digest.as_bytes());
        image[200..232].copy_from_slice(digest.as_bytes());

        let loc = locate(&image, &digest).unwrap();
        assert_eq!(loc.offset, 10);
        assert_eq!(loc.duplicate, Some(200));
    }

    #[test]
    fn locate_at_start_and_end() {
        let digest = UbootDigest::compute(b"uboot");
        let mut image = vec![0u8; 64];
        image[..32].copy_from_slice(digest.as_bytes());
        image[32..].copy_from_slice(digest.as_bytes());

        let loc = locate(&image, &digest).unwrap();
        assert_eq!(loc.offset, 0);
        assert_eq!(loc.duplicate, Some(32));
    }

    #[test]
    fn locate_missing_digest() {
        let digest = UbootDigest::compute(b"uboot");
        let err = locate(&[0u8; 128], &digest).unwrap_err();
        assert_eq!(err.digest, digest);
    }
}
