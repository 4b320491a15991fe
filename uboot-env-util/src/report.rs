use std::path::Path;
use uboot_env::{HashLocation, Layout, UbootDigest};

/// Trait for receiving diagnostics while an image is processed.
///
/// An implementation is handed to [`EnvPatcher`](crate::EnvPatcher) once and
/// used for every operation it runs. All methods have empty defaults.
pub trait Reporter {
    /// Called after an image has been read and both copies verified.
    fn image_loaded(&self, _path: &Path, _layout: &Layout) {}

    /// Called when `insert` reads the destination image as its source.
    fn destination_as_source(&self, _path: &Path) {}

    /// Called with the space needed by the new environment.
    fn env_usage(&self, _used: usize, _capacity: usize) {}

    /// Called when the stored U-Boot digest has been found.
    fn hash_located(&self, _location: &HashLocation) {}

    /// Called when the U-Boot digest occurs more than once in the image.
    ///
    /// Only the first occurrence is rewritten.
    fn duplicate_hash(&self, _first: usize, _second: usize) {}

    /// Called after the environment text has been written.
    fn env_written(&self, _path: &Path, _lines: usize) {}

    /// Called after the patched image has been written.
    fn image_written(&self, _path: &Path, _digest: &UbootDigest) {}
}

/// A no-op reporter that discards everything.
pub struct SilentReporter;

impl Reporter for SilentReporter {}

/// Reporter that forwards to the [`log`] facade.
///
/// Verbosity is whatever the installed logger lets through.
pub struct LogReporter;

impl Reporter for LogReporter {
    fn image_loaded(&self, path: &Path, layout: &Layout) {
        log::debug!(
            "Read {} ({} bytes, two verified copies)",
            path.display(),
            layout.file_size()
        );
    }

    fn destination_as_source(&self, path: &Path) {
        log::info!(
            "Using destination image '{}' as U-Boot source image",
            path.display()
        );
    }

    fn env_usage(&self, used: usize, capacity: usize) {
        log::info!("Environment uses {used} bytes of space out of {capacity} available");
    }

    fn hash_located(&self, location: &HashLocation) {
        log::debug!("U-Boot hash offset is {:#08x}", location.offset);
    }

    fn duplicate_hash(&self, first: usize, second: usize) {
        log::warn!(
            "U-Boot hash found at both {first:#08x} and {second:#08x}, only the first is updated"
        );
    }

    fn env_written(&self, path: &Path, lines: usize) {
        log::info!("Wrote {lines} environment lines to {}", path.display());
    }

    fn image_written(&self, path: &Path, digest: &UbootDigest) {
        log::info!("Wrote {} (U-Boot digest {digest})", path.display());
    }
}
