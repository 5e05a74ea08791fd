//! Request stages, as reported in logs.

use std::fmt;

/// Where a load request is in its lifecycle.
///
/// ```text
/// Resolving -> NotFound
///           -> Compiling -> CompileFailed
///                        -> Discovering -> Defining -> Found | NotFound
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    /// Looking for the source unit.
    Resolving,
    /// Running the compiler.
    Compiling,
    /// The compiler failed.
    CompileFailed,
    /// Walking the output directory.
    Discovering,
    /// Defining the discovered artifacts.
    Defining,
    /// The requested type is available.
    Found,
    /// No source, or no artifact for the requested name.
    NotFound,
}

impl LoadStage {
    /// Lowercase stage name used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Resolving => "resolving",
            Self::Compiling => "compiling",
            Self::CompileFailed => "compile_failed",
            Self::Discovering => "discovering",
            Self::Defining => "defining",
            Self::Found => "found",
            Self::NotFound => "not_found",
        }
    }
}

impl fmt::Display for LoadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(LoadStage::CompileFailed.to_string(), "compile_failed");
        assert_eq!(LoadStage::Resolving.to_string(), "resolving");
    }
}
