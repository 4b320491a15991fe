mod error;

pub use self::error::PatchError;

use self::error::*;
use crate::report::Reporter;
use snafu::ResultExt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uboot_env::{CommentMode, Environment, HashLocation, Image, Layout, Patched, UbootDigest};

/// Settings shared by every operation of an [`EnvPatcher`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchOptions {
    /// Geometry of the images being processed.
    pub layout: Layout,
    /// Comment handling when reading environment text.
    pub comments: CommentMode,
}

/// Summary of an image, returned by [`EnvPatcher::inspect()`].
#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub layout: Layout,
    pub digest: UbootDigest,
    /// `None` if the digest is not stored anywhere in the image.
    pub hash: Option<HashLocation>,
    pub env: Environment,
}

/// Extracts and inserts the default environment of U-Boot images on disk.
pub struct EnvPatcher<R: Reporter> {
    options: PatchOptions,
    reporter: R,
}

impl<R: Reporter> EnvPatcher<R> {
    /// Creates a new patcher.
    pub fn new(options: PatchOptions, reporter: R) -> Self {
        Self { options, reporter }
    }

    #[must_use]
    pub fn options(&self) -> &PatchOptions {
        &self.options
    }

    /// Writes the environment of `image` to `output` as text.
    ///
    /// An existing `output` is replaced.
    pub fn extract(
        &self,
        image: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<Environment, PatchError> {
        let (image_path, output) = (image.as_ref(), output.as_ref());
        let image = self.read_image(image_path)?;
        let env = image
            .environment()
            .context(DecodeFailedSnafu { path: image_path })?;

        write_atomic(output, |f| f.write_all(env.to_text().as_bytes()))?;
        self.reporter.env_written(output, env.len());

        Ok(env)
    }

    /// Replaces the environment of an image with the content of `text`.
    ///
    /// When `image` is `None` the image at `output` is patched in place.
    /// Nothing is written unless every step succeeds.
    pub fn insert(
        &self,
        image: Option<&Path>,
        text: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<Patched, PatchError> {
        let (text, output) = (text.as_ref(), output.as_ref());
        let layout = self.options.layout;

        let raw = fs::read(text).context(ReadTextFailedSnafu { path: text })?;
        let env = Environment::parse_text(&raw, self.options.comments)
            .context(InvalidTextSnafu { path: text })?;

        self.reporter
            .env_usage(env.encoded_len(), layout.env_size());

        let block = env
            .encode(layout.env_size())
            .context(EnvTooLargeSnafu { path: text })?;

        let source = match image {
            Some(path) => path,
            None => {
                self.reporter.destination_as_source(output);
                output
            }
        };

        let mut image = self.read_image(source)?;
        let patched = image
            .replace_env_block(&block)
            .context(PatchFailedSnafu { path: source })?;
        self.report_location(&patched.location);

        write_atomic(output, |f| {
            f.write_all(image.as_bytes())?;
            f.write_all(image.as_bytes())
        })?;
        self.reporter.image_written(output, &patched.digest);

        Ok(patched)
    }

    /// Reads an image and summarizes its layout, digest and environment.
    pub fn inspect(&self, image: impl AsRef<Path>) -> Result<ImageInfo, PatchError> {
        let path = image.as_ref();
        let image = self.read_image(path)?;
        let env = image.environment().context(DecodeFailedSnafu { path })?;
        let hash = image.hash_location().ok();

        if let Some(location) = &hash {
            self.report_location(location);
        }

        Ok(ImageInfo {
            layout: *image.layout(),
            digest: image.uboot_digest(),
            hash,
            env,
        })
    }

    fn read_image(&self, path: &Path) -> Result<Image, PatchError> {
        let image =
            crate::read_image(path, self.options.layout).context(ReadImageFailedSnafu { path })?;
        self.reporter.image_loaded(path, image.layout());
        Ok(image)
    }

    fn report_location(&self, location: &HashLocation) {
        self.reporter.hash_located(location);

        if let Some(second) = location.duplicate {
            self.reporter.duplicate_hash(location.offset, second);
        }
    }
}

/// Writes `path` through a temporary file in the same directory.
///
/// The destination is only replaced once `fill` has succeeded, so a failed
/// write never leaves a truncated file behind. Permissions of an existing
/// destination are kept. Symlinks are followed, and a destination that is
/// not a regular file (a block device, say) is truncated and written
/// directly.
fn write_atomic<F>(path: &Path, fill: F) -> Result<(), PatchError>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let existing = fs::metadata(&target).ok();

    if existing.as_ref().is_some_and(|meta| !meta.is_file()) {
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&target)
            .context(OpenFileFailedSnafu { path })?;

        fill(&mut file).context(WriteFailedSnafu { path })?;
        file.sync_all().context(WriteFailedSnafu { path })?;

        return Ok(());
    }

    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut tmp = NamedTempFile::new_in(&dir).context(CreateFileFailedSnafu { path })?;

    fill(&mut tmp).context(WriteFailedSnafu { path })?;
    tmp.as_file().sync_all().context(WriteFailedSnafu { path })?;

    if let Some(meta) = existing {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .context(WriteFailedSnafu { path })?;
    }

    tmp.persist(&target)
        .map_err(|e| e.error)
        .context(WriteFailedSnafu { path })?;

    Ok(())
}
