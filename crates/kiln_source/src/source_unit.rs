//! The resolved source file backing a requested type name.

use std::path::PathBuf;

use kiln_common::TypeName;

/// Where a [`SourceUnit`] was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOrigin {
    /// Under the search root at this position in the resolver's root list.
    SearchRoot(usize),
    /// Under the output directory, typically a freshly generated source.
    OutputDirectory,
}

/// A source file located for a [`TypeName`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// The name that was resolved.
    pub name: TypeName,
    /// Absolute path of the source file.
    pub path: PathBuf,
    /// Which location supplied the file.
    pub origin: SourceOrigin,
}
