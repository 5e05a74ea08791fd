//! Error types for source staging.

use std::path::PathBuf;

/// Errors raised while preparing the output directory or staging sources.
///
/// Resolution itself never errors: a name with no source unit is simply
/// unresolved.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// An I/O error occurred while creating a directory or writing a file.
    #[error("source I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = SourceError::Io {
            path: PathBuf::from("/tmp/out/org/Token.java"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("source I/O error"));
        assert!(msg.contains("Token.java"));
        assert!(msg.contains("denied"));
    }
}
