//! Parsing and validation of `kiln.toml` loader configuration.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`KilnConfig`], resolves its relative paths against the directory the file
//! lives in, and exposes the [`HostFacts`] provider that isolates every
//! host-dependent decision (path-list separator, ambient search path).

#![warn(missing_docs)]

pub mod error;
pub mod host;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use host::{ConfiguredHost, HostFacts, StaticHost};
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::{is_url_location, resolve_config, ResolvedConfig};
pub use types::*;
