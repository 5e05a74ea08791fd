//! Hierarchical type names and their mapping to source and artifact paths.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Separator between the segments of a [`TypeName`] (`org.example.Token`).
pub const HIERARCHY_SEPARATOR: char = '.';

/// Marker compilers place between an outer type and a nested type when both
/// live in the same directory (`Outer$Inner`).
pub const NESTED_MARKER: char = '$';

/// Errors produced when a string is not a valid [`TypeName`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// The name was the empty string.
    #[error("type name is empty")]
    Empty,

    /// The name has a leading, trailing, or doubled separator.
    #[error("type name '{name}' has an empty segment")]
    EmptySegment {
        /// The rejected name.
        name: String,
    },

    /// The name contains a character that cannot appear in a type name.
    #[error("type name '{name}' contains forbidden character {ch:?}")]
    ForbiddenChar {
        /// The rejected name.
        name: String,
        /// The first offending character.
        ch: char,
    },
}

/// A fully-qualified, dotted type name such as `org.example.Uint256`.
///
/// A `TypeName` maps deterministically to a relative file path: every
/// separator becomes a path component boundary and the file extension is
/// appended. Validation guarantees the mapping never escapes its base
/// directory (no empty segments, no path separators).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeName(String);

impl TypeName {
    /// Parses and validates a type name.
    pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();
        if name.is_empty() {
            return Err(NameError::Empty);
        }
        if let Some(ch) = name.chars().find(|&c| is_forbidden(c)) {
            return Err(NameError::ForbiddenChar { name, ch });
        }
        if name.split(HIERARCHY_SEPARATOR).any(str::is_empty) {
            return Err(NameError::EmptySegment { name });
        }
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the dotted segments of the name.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(HIERARCHY_SEPARATOR)
    }

    /// Maps the name to a relative path with the given extension.
    ///
    /// `org.example.Uint256` with `"java"` becomes `org/example/Uint256.java`
    /// (using the host's path separator).
    pub fn to_relative_path(&self, extension: &str) -> PathBuf {
        let mut path: PathBuf = self.segments().collect();
        path.set_extension(extension);
        path
    }

    /// Derives the logical name of a file from its path relative to a base
    /// directory.
    ///
    /// Returns `None` if the extension does not match, the path is not purely
    /// relative, or the derived string is not a valid name.
    pub fn from_relative_path(relative: &Path, extension: &str) -> Option<Self> {
        if relative.extension()?.to_str()? != extension {
            return None;
        }
        let without_ext = relative.with_extension("");
        let mut segments = Vec::new();
        for component in without_ext.components() {
            match component {
                Component::Normal(part) => segments.push(part.to_str()?),
                _ => return None,
            }
        }
        Self::new(segments.join(".")).ok()
    }

    /// Returns `true` if `candidate` is this name or a type nested under it.
    ///
    /// A plain prefix test would also accept unrelated siblings (`Foo` would
    /// match `FooBar`), so the character following the prefix must be a
    /// [`HIERARCHY_SEPARATOR`] or [`NESTED_MARKER`].
    pub fn is_self_or_nested(&self, candidate: &TypeName) -> bool {
        match candidate.0.strip_prefix(self.0.as_str()) {
            Some("") => true,
            Some(rest) => rest.starts_with([HIERARCHY_SEPARATOR, NESTED_MARKER]),
            None => false,
        }
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
        || c.is_whitespace()
        || c.is_control()
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeName({})", self.0)
    }
}

impl FromStr for TypeName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TypeName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TypeName> for String {
    fn from(name: TypeName) -> Self {
        name.0
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
