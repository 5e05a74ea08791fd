//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::KilnConfig;
use std::path::Path;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE: &str = "kiln.toml";

/// Loads and validates a `kiln.toml` configuration from a project directory.
///
/// Reads `<project_dir>/kiln.toml`, parses it, and validates required fields.
pub fn load_config(project_dir: &Path) -> Result<KilnConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `kiln.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<KilnConfig, ConfigError> {
    let config: KilnConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and values are consistent.
fn validate_config(config: &KilnConfig) -> Result<(), ConfigError> {
    if config.loader.output_dir.trim().is_empty() {
        return Err(ConfigError::MissingField("loader.output_dir".to_string()));
    }
    if config.compiler.program.trim().is_empty() {
        return Err(ConfigError::MissingField("compiler.program".to_string()));
    }
    if let Some(root) = config.loader.search_roots.iter().find(|r| r.trim().is_empty()) {
        return Err(ConfigError::ValidationError(format!(
            "empty search root in loader.search_roots: {root:?}"
        )));
    }

    let layout = &config.layout;
    for (field, ext) in [
        ("layout.source_extension", &layout.source_extension),
        ("layout.artifact_extension", &layout.artifact_extension),
    ] {
        if ext.is_empty() {
            return Err(ConfigError::MissingField(field.to_string()));
        }
        if ext.starts_with('.') || ext.contains(['/', '\\']) {
            return Err(ConfigError::ValidationError(format!(
                "{field} must be a bare extension, got {ext:?}"
            )));
        }
    }
    // Source units may be staged in the output directory, so the two must
    // never be confused during artifact discovery.
    if layout.source_extension == layout.artifact_extension {
        return Err(ConfigError::ValidationError(
            "source and artifact extensions must differ".to_string(),
        ));
    }
    Ok(())
}
