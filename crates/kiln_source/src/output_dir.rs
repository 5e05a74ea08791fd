//! The scratch directory shared by the compiler output and generated sources.

use std::path::{Path, PathBuf};

use kiln_common::TypeName;
use tracing::debug;

use crate::error::SourceError;

/// The single output directory owned by one loader instance.
///
/// The compiler writes artifacts here, and generators may stage source units
/// here before asking for them to be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirectory {
    path: PathBuf,
}

impl OutputDirectory {
    /// Wraps a directory path. Nothing is created until [`ensure`](Self::ensure).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The directory as an absolute path, for passing to child processes.
    pub fn absolute_path(&self) -> PathBuf {
        std::path::absolute(&self.path).unwrap_or_else(|_| self.path.clone())
    }

    /// Creates the directory (and parents) if it does not exist.
    pub fn ensure(&self) -> Result<(), SourceError> {
        std::fs::create_dir_all(&self.path).map_err(|e| SourceError::Io {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Where a source unit for `name` lives inside this directory.
    pub fn source_path(&self, name: &TypeName, source_extension: &str) -> PathBuf {
        self.path.join(name.to_relative_path(source_extension))
    }

    /// Stages a generated source unit so a later load of `name` finds it.
    ///
    /// The text is written to a sibling temporary file and renamed into place,
    /// so a concurrent resolver never observes a half-written source.
    pub fn write_source(
        &self,
        name: &TypeName,
        source_extension: &str,
        contents: &str,
    ) -> Result<PathBuf, SourceError> {
        let target = self.source_path(name, source_extension);
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| SourceError::Io { path, source }
        };

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(io_err(parent))?;
        }
        let tmp = target.with_extension(format!(
            "{source_extension}.tmp{}",
            std::process::id()
        ));
        std::fs::write(&tmp, contents).map_err(io_err(&tmp))?;
        if let Err(e) = std::fs::rename(&tmp, &target) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(&target)(e));
        }
        debug!(name = %name, path = %target.display(), "staged generated source");
        Ok(target)
    }
}
