//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `kiln.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_field() {
        let err = ConfigError::MissingField("loader.output_dir".to_string());
        assert_eq!(format!("{err}"), "missing required field: loader.output_dir");
    }

    #[test]
    fn display_parse_error() {
        let err = ConfigError::ParseError("expected '=' at line 2".to_string());
        assert_eq!(
            format!("{err}"),
            "failed to parse configuration: expected '=' at line 2"
        );
    }

    #[test]
    fn display_validation_error() {
        let err = ConfigError::ValidationError("extensions must differ".to_string());
        assert_eq!(format!("{err}"), "validation error: extensions must differ");
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no kiln.toml");
        let err: ConfigError = io_err.into();
        assert!(format!("{err}").starts_with("failed to read configuration:"));
    }
}
