//! Temporary file management utilities.
//!
//! Palette exports write an intermediate image that only lives for the
//! duration of one run. It is held as a [`tempfile::TempPath`], so the file is
//! removed when the guard is dropped on every exit path, including errors and
//! panics. An explicit [`IntermediateArtifact::close`] reports removal
//! failures instead of swallowing them.

use crate::error::{CoreError, CoreResult};
use std::path::Path;
use tempfile::{Builder as TempFileBuilder, NamedTempFile, TempPath};

/// Creates a temporary file with prefix and extension. Auto-deleted when dropped.
///
/// Uses the system temp directory when `dir` is `None`.
pub fn create_temp_file(dir: Option<&Path>, prefix: &str, extension: &str) -> CoreResult<NamedTempFile> {
    let prefix = format!("{prefix}_");
    let suffix = format!(".{extension}");
    let mut builder = TempFileBuilder::new();
    builder.prefix(&prefix).suffix(&suffix);

    let temp_file = match dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            builder.tempfile_in(dir)?
        }
        None => builder.tempfile()?,
    };
    Ok(temp_file)
}

/// Scoped guard for a file produced by one pass and consumed by the next.
#[derive(Debug)]
pub struct IntermediateArtifact {
    path: TempPath,
}

impl IntermediateArtifact {
    /// Reserves a uniquely named file for the artifact.
    pub fn create(dir: Option<&Path>, prefix: &str, extension: &str) -> CoreResult<Self> {
        let path = create_temp_file(dir, prefix, extension)?.into_temp_path();
        log::debug!("Reserved intermediate artifact {}", path.display());
        Ok(Self { path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the file now, reporting failure.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::IntermediateArtifactCleanup` when removal fails.
    pub fn close(self) -> CoreResult<()> {
        let path = self.path.to_path_buf();
        self.path
            .close()
            .map_err(|source| CoreError::IntermediateArtifactCleanup { path, source })
    }
}
