use snafu::Snafu;
use std::path::PathBuf;

/// Errors that can occur while extracting or inserting an environment.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum PatchError {
    // Input errors
    #[snafu(display("cannot read image {}: {source}", path.display()))]
    ReadImageFailed {
        path: PathBuf,
        source: crate::ReadImageError,
    },

    #[snafu(display("cannot read environment from {}: {source}", path.display()))]
    ReadTextFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("invalid environment in {}: {source}", path.display()))]
    InvalidText {
        path: PathBuf,
        source: uboot_env::ValidationError,
    },

    #[snafu(display("cannot decode environment of {}: {source}", path.display()))]
    DecodeFailed {
        path: PathBuf,
        source: uboot_env::DecodeError,
    },

    #[snafu(display("environment from {} is too large: {source}", path.display()))]
    EnvTooLarge {
        path: PathBuf,
        source: uboot_env::CapacityError,
    },

    // Patching errors
    #[snafu(display("cannot patch image {}: {source}", path.display()))]
    PatchFailed {
        path: PathBuf,
        source: uboot_env::PatchError,
    },

    // Output errors
    #[snafu(display("cannot create temporary file next to {}: {source}", path.display()))]
    CreateFileFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("cannot open {} for writing: {source}", path.display()))]
    OpenFileFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("cannot write to {}: {source}", path.display()))]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}
