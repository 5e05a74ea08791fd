//! Compiled artifacts found in the output directory.

use std::path::PathBuf;

use kiln_common::TypeName;

/// One compiled artifact: the logical name it defines and where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledArtifact {
    /// Logical name derived from the artifact's relative path.
    pub name: TypeName,
    /// Path of the artifact file.
    pub path: PathBuf,
}

impl CompiledArtifact {
    /// Reads the whole artifact.
    pub fn read(&self) -> std::io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }
}
