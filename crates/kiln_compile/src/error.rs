//! Error types for compiler invocation.

use std::time::Duration;

use kiln_common::TypeName;
use kiln_source::SourceError;

/// Errors raised while compiling a source unit.
///
/// Every variant that got as far as running the compiler carries the merged
/// diagnostic text it produced.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The compiler process could not be started or waited on.
    #[error("failed to launch compiler `{program}`: {source}")]
    Launch {
        /// The program that was executed.
        program: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The compiler ran and exited with a nonzero status.
    #[error("compiling `{name}` failed with exit status {exit_status}:\n{diagnostics}")]
    Failed {
        /// The type whose source unit was compiled.
        name: TypeName,
        /// The compiler's exit status.
        exit_status: i32,
        /// Merged standard output and standard error.
        diagnostics: String,
    },

    /// The compiler exceeded its timeout and was killed.
    #[error("compiling `{name}` timed out after {timeout:?}:\n{diagnostics}")]
    TimedOut {
        /// The type whose source unit was compiled.
        name: TypeName,
        /// The bound that was exceeded.
        timeout: Duration,
        /// Output captured before the compiler was killed.
        diagnostics: String,
    },

    /// The output directory could not be prepared.
    #[error(transparent)]
    OutputDir(#[from] SourceError),
}

impl CompileError {
    /// The compiler's diagnostic text, if it ran far enough to produce any.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            Self::Failed { diagnostics, .. } | Self::TimedOut { diagnostics, .. } => {
                Some(diagnostics)
            }
            Self::Launch { .. } | Self::OutputDir(_) => None,
        }
    }
}
