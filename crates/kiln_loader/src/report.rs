//! Detailed results of a load request.

use std::sync::Arc;
use std::time::Duration;

use kiln_artifact::{LoadedType, SkippedArtifact};
use kiln_source::SourceUnit;

/// How the requested type was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Already in this loader's type space.
    Cached,
    /// Supplied by the parent lookup.
    Parent,
    /// Compiled and defined by this request.
    Compiled,
}

/// Everything a load request did.
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// The requested type.
    pub loaded: Arc<LoadedType>,
    /// How it was obtained.
    pub origin: LoadOrigin,
    /// The source unit that was compiled, for [`LoadOrigin::Compiled`].
    pub source: Option<SourceUnit>,
    /// Other types defined alongside the requested one (nested and companion
    /// types).
    pub companions: Vec<Arc<LoadedType>>,
    /// Artifacts that were discovered but could not be read.
    pub skipped: Vec<SkippedArtifact>,
    /// Compiler output from a successful compile, usually warnings.
    pub diagnostics: String,
    /// Time spent in the compiler.
    pub compile_time: Duration,
}

impl LoadReport {
    pub(crate) fn without_compile(loaded: Arc<LoadedType>, origin: LoadOrigin) -> Self {
        Self {
            loaded,
            origin,
            source: None,
            companions: Vec::new(),
            skipped: Vec::new(),
            diagnostics: String::new(),
            compile_time: Duration::ZERO,
        }
    }
}
