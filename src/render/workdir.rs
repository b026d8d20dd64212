use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::BlockturnResult;

/// Scratch directory holding the frame files of one invocation.
///
/// Nothing is removed on drop: the directory outlives a failed mux so its frames can be inspected,
/// and the owner decides when to call [`WorkDir::remove_files`] and [`WorkDir::remove`].
#[derive(Debug, PartialEq, Eq)]
pub struct WorkDir {
    path: PathBuf,
}

impl WorkDir {
    /// Create a fresh uniquely named directory under the system temp dir.
    pub fn create() -> BlockturnResult<Self> {
        Self::create_in(std::env::temp_dir())
    }

    /// Create a fresh uniquely named directory under `parent`.
    pub fn create_in(parent: impl AsRef<Path>) -> BlockturnResult<Self> {
        let parent = parent.as_ref();
        let dir = tempfile::Builder::new()
            .prefix("blockturn-")
            .tempdir_in(parent)
            .with_context(|| format!("create working directory in '{}'", parent.display()))?;
        let path = dir.keep();
        tracing::debug!(path = %path.display(), "created working directory");
        Ok(Self { path })
    }

    /// Adopt an existing directory.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete each of `files` that exists. Failures are logged and returned as a count.
    pub fn remove_files<'a>(&self, files: impl IntoIterator<Item = &'a Path>) -> usize {
        let mut failed = 0;
        for file in files {
            match std::fs::remove_file(file) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    failed += 1;
                    tracing::warn!(path = %file.display(), error = %e, "failed to remove frame file");
                }
            }
        }
        failed
    }

    /// Remove the directory itself. It must already be empty.
    pub fn remove(self) -> BlockturnResult<()> {
        std::fs::remove_dir(&self.path)
            .with_context(|| format!("remove working directory '{}'", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "removed working directory");
        Ok(())
    }

    /// Hand the directory path over to the caller, giving up ownership.
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/workdir.rs"]
mod tests;
