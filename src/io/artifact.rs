//! Temporary on-disk copies of in-memory source.
//!
//! Analyzers take file paths, so source strings are written to a uniquely
//! named file first. The file belongs to a [`TemporaryArtifact`] guard and
//! is removed when the guard is released or dropped, whichever comes first,
//! including during unwinding.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tracing::{debug, warn};

use crate::core::errors::{Error, Result};

const FILE_PREFIX: &str = "codelint-";

/// Writes source content to temporary files.
#[derive(Debug, Clone, Default)]
pub struct ArtifactMaterializer {
    /// Directory for artifacts; the system temp dir when `None`
    dir: Option<PathBuf>,
}

impl ArtifactMaterializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place artifacts in `dir` instead of the system temp directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Write `content` verbatim to a fresh file whose name ends in `suffix`.
    ///
    /// Name uniqueness comes from `tempfile`, which creates the file with
    /// `O_EXCL` semantics, so concurrent callers never share a path.
    pub fn materialize(&self, content: &str, suffix: &str) -> Result<TemporaryArtifact> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(FILE_PREFIX).suffix(suffix);

        let file = match &self.dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| Error::materialization(format!("cannot create temporary file: {}", e), e))?;

        let mut file = file;
        file.write_all(content.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| Error::materialization(format!("cannot write source: {}", e), e))?;

        // Close our handle so analyzers can open the file on every platform
        let path = file.into_temp_path();
        debug!(path = %path.display(), bytes = content.len(), "materialized source");

        Ok(TemporaryArtifact { path: Some(path) })
    }
}

/// A materialized source file, deleted when released or dropped.
#[derive(Debug)]
pub struct TemporaryArtifact {
    path: Option<TempPath>,
}

impl TemporaryArtifact {
    pub fn path(&self) -> &Path {
        self.path
            .as_deref()
            .unwrap_or_else(|| Path::new(""))
    }

    /// Remove the file now. A file that is already gone counts as released.
    pub fn release(mut self) -> Result<()> {
        self.release_inner()
    }

    fn release_inner(&mut self) -> Result<()> {
        let Some(path) = self.path.take() else {
            return Ok(());
        };
        let shown = path.display().to_string();

        match path.close() {
            Ok(()) => {
                debug!(path = %shown, "released temporary artifact");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

impl Drop for TemporaryArtifact {
    fn drop(&mut self) {
        if let Err(e) = self.release_inner() {
            warn!(error = %e, "failed to remove temporary artifact");
        }
    }
}
