//! Error types for loading.

use kiln_artifact::ArtifactError;
use kiln_common::NameError;
use kiln_compile::CompileError;
use kiln_config::ConfigError;
use kiln_source::SourceError;

/// Errors returned by a [`CompilerLoader`](crate::CompilerLoader).
///
/// [`NotFound`](Self::NotFound) is the only recoverable outcome: it means
/// "not one of mine" and a caller may try another loader. Everything else
/// is fatal for the request.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The requested name is not a valid type name.
    #[error("invalid type name: {0}")]
    InvalidName(#[from] NameError),

    /// No source unit backs the name, or the compile produced no artifact
    /// for it.
    #[error("type `{name}` not found")]
    NotFound {
        /// The requested name.
        name: String,
    },

    /// The compiler could not be run or reported errors.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// The output directory could not be scanned for artifacts.
    #[error("artifact discovery failed: {0}")]
    Discovery(#[source] ArtifactError),

    /// A discovered artifact could not be read or defined.
    #[error("type definition failed: {0}")]
    Definition(#[source] ArtifactError),

    /// A generated source unit could not be staged.
    #[error(transparent)]
    Stage(#[from] SourceError),

    /// The loader configuration could not be read.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A parent lookup failed.
    #[error("parent lookup for `{name}` failed: {source}")]
    Parent {
        /// The requested name.
        name: String,
        /// The parent's error.
        source: Box<LoadError>,
    },
}

impl LoadError {
    /// Returns `true` for [`NotFound`](Self::NotFound).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` for every error a caller should not recover from by
    /// trying elsewhere.
    pub fn is_fatal(&self) -> bool {
        !self.is_not_found()
    }

    /// Compiler diagnostics carried by this error, if any.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            Self::Compile(e) => e.diagnostics(),
            Self::Parent { source, .. } => source.diagnostics(),
            _ => None,
        }
    }
}
