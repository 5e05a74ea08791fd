//! Error types for artifact discovery and definition.

use std::path::PathBuf;

use kiln_common::TypeName;

/// Errors raised while discovering or reading compiled artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// The output directory could not be walked.
    #[error("failed to walk output directory {path}: {source}")]
    Walk {
        /// The directory or entry that could not be read.
        path: PathBuf,
        /// The underlying walk error.
        source: walkdir::Error,
    },

    /// A discovered artifact could not be read.
    #[error("failed to read artifact {path}: {source}")]
    Read {
        /// The artifact file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Defining an artifact's bytes failed.
    #[error(transparent)]
    Define(#[from] DefineError),
}

/// Errors raised by a [`TypeDefiner`](crate::TypeDefiner).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefineError {
    /// The requested byte range lies outside the buffer.
    #[error("range {offset}+{len} is out of bounds for {available} bytes defining `{name}`")]
    OutOfBounds {
        /// The name being defined.
        name: TypeName,
        /// Start of the requested range.
        offset: usize,
        /// Length of the requested range.
        len: usize,
        /// Size of the buffer.
        available: usize,
    },

    /// The name is already defined in this type space.
    #[error("type `{name}` is already defined")]
    Duplicate {
        /// The name that was defined twice.
        name: TypeName,
    },

    /// The definer refused the bytes.
    #[error("type `{name}` was rejected: {reason}")]
    Rejected {
        /// The name being defined.
        name: TypeName,
        /// Why the definer refused it.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_display() {
        let err = DefineError::OutOfBounds {
            name: TypeName::new("a.B").unwrap(),
            offset: 4,
            len: 10,
            available: 8,
        };
        assert_eq!(
            err.to_string(),
            "range 4+10 is out of bounds for 8 bytes defining `a.B`"
        );
    }

    #[test]
    fn define_wraps_transparently() {
        let err: ArtifactError = DefineError::Duplicate {
            name: TypeName::new("Outer").unwrap(),
        }
        .into();
        assert_eq!(err.to_string(), "type `Outer` is already defined");
    }
}
