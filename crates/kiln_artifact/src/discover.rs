//! Finding the artifacts produced for a requested name.

use std::path::Path;

use kiln_common::TypeName;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::artifact::CompiledArtifact;
use crate::error::ArtifactError;

/// Walks `output_dir` for artifacts belonging to `requested`.
///
/// Only regular files with `artifact_extension` are considered, so source
/// units staged in the same directory are never picked up. An artifact
/// belongs to the request when its logical name equals it or is nested under
/// it (`Outer.Inner`, `Outer$1`); an unrelated sibling such as `OuterBar` is
/// not included. Results are sorted by name.
///
/// A missing output directory yields an empty list.
pub fn discover(
    output_dir: &Path,
    requested: &TypeName,
    artifact_extension: &str,
) -> Result<Vec<CompiledArtifact>, ArtifactError> {
    if !output_dir.is_dir() {
        debug!(dir = %output_dir.display(), "output directory missing, nothing to discover");
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(output_dir).follow_links(false) {
        let entry = entry.map_err(|e| ArtifactError::Walk {
            path: e.path().unwrap_or(output_dir).to_path_buf(),
            source: e,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(output_dir) else {
            continue;
        };
        let Some(name) = TypeName::from_relative_path(relative, artifact_extension) else {
            continue;
        };
        if requested.is_self_or_nested(&name) {
            trace!(artifact = %name, "matched artifact");
            found.push(CompiledArtifact {
                name,
                path: entry.into_path(),
            });
        }
    }

    found.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
    debug!(name = %requested, count = found.len(), "discovered artifacts");
    Ok(found)
}
