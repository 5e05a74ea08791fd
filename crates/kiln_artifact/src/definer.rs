//! The type-definition capability and the artifact-to-type step built on it.

use std::path::PathBuf;
use std::sync::Arc;

use kiln_common::TypeName;
use tracing::{debug, warn};

use crate::artifact::CompiledArtifact;
use crate::error::{ArtifactError, DefineError};
use crate::loaded::LoadedType;

/// Something that can turn artifact bytes into loaded types.
pub trait TypeDefiner: Send + Sync {
    /// Defines `name` from `bytes[offset..offset + len]`.
    fn define(
        &self,
        name: &TypeName,
        bytes: &[u8],
        offset: usize,
        len: usize,
    ) -> Result<Arc<LoadedType>, DefineError>;

    /// Returns the type already defined under `name`, if any.
    fn find_loaded(&self, name: &TypeName) -> Option<Arc<LoadedType>>;
}

/// What to do with an artifact that was discovered but cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadPolicy {
    /// Log a warning, record the artifact as skipped, and carry on.
    #[default]
    WarnAndSkip,
    /// Fail the whole request.
    FailFast,
}

impl ReadPolicy {
    /// `FailFast` when `strict` is set, otherwise `WarnAndSkip`.
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::FailFast
        } else {
            Self::WarnAndSkip
        }
    }
}

/// An artifact left out of a [`DefineReport`] because it could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedArtifact {
    /// The artifact's logical name.
    pub name: TypeName,
    /// The artifact file.
    pub path: PathBuf,
    /// The read error, as text.
    pub reason: String,
}

/// The outcome of [`define_artifacts`].
#[derive(Debug, Default)]
pub struct DefineReport {
    /// Types defined by this call, in artifact order.
    pub defined: Vec<Arc<LoadedType>>,
    /// Types that were already defined and were reused as they were.
    pub reused: Vec<Arc<LoadedType>>,
    /// Artifacts that could not be read.
    pub skipped: Vec<SkippedArtifact>,
}

impl DefineReport {
    /// Looks up `name` among the defined and reused types.
    pub fn find(&self, name: &TypeName) -> Option<&Arc<LoadedType>> {
        self.defined
            .iter()
            .chain(&self.reused)
            .find(|t| t.name() == name)
    }
}

/// Reads every artifact and defines it over its whole buffer.
///
/// Names the definer already knows are reused, not redefined. All artifacts
/// are read before any is defined, so a read failure under
/// [`ReadPolicy::FailFast`] leaves the definer untouched. Definition failures
/// always abort.
pub fn define_artifacts(
    definer: &dyn TypeDefiner,
    artifacts: &[CompiledArtifact],
    policy: ReadPolicy,
) -> Result<DefineReport, ArtifactError> {
    let mut report = DefineReport::default();
    let mut pending = Vec::with_capacity(artifacts.len());

    for artifact in artifacts {
        if let Some(existing) = definer.find_loaded(&artifact.name) {
            debug!(name = %artifact.name, "artifact already defined, reusing");
            report.reused.push(existing);
            continue;
        }

        match artifact.read() {
            Ok(bytes) => pending.push((artifact, bytes)),
            Err(source) if policy == ReadPolicy::FailFast => {
                return Err(ArtifactError::Read {
                    path: artifact.path.clone(),
                    source,
                });
            }
            Err(source) => {
                warn!(
                    name = %artifact.name,
                    path = %artifact.path.display(),
                    error = %source,
                    "skipping unreadable artifact"
                );
                report.skipped.push(SkippedArtifact {
                    name: artifact.name.clone(),
                    path: artifact.path.clone(),
                    reason: source.to_string(),
                });
            }
        }
    }

    for (artifact, bytes) in pending {
        let loaded = definer.define(&artifact.name, &bytes, 0, bytes.len())?;
        debug!(name = %artifact.name, digest = %loaded.digest().short(), "defined type");
        report.defined.push(loaded);
    }

    Ok(report)
}
