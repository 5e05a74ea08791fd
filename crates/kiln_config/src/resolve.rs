//! Path resolution: anchoring the configuration's relative paths.

use crate::types::{CompilerConfig, HostConfig, KilnConfig, LayoutConfig};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A configuration whose filesystem paths have been made absolute.
///
/// Relative search roots and the output directory are joined onto the
/// directory that held `kiln.toml`. URL-style roots are kept verbatim; they
/// are decoded later by the source resolver.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Ordered search root locations.
    pub search_roots: Vec<String>,
    /// Absolute output directory.
    pub output_dir: PathBuf,
    /// Whether unreadable artifacts fail the request.
    pub strict_artifacts: bool,
    /// Compiler invocation settings.
    pub compiler: CompilerConfig,
    /// Source and artifact extensions.
    pub layout: LayoutConfig,
    /// Host overrides.
    pub host: HostConfig,
}

impl ResolvedConfig {
    /// The compile timeout, or `None` when it is disabled.
    pub fn compile_timeout(&self) -> Option<Duration> {
        match self.compiler.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// Returns `true` if a search root location is URL-style (`file:/x`,
/// `file:///x`, `jar:file:/x!/`), as opposed to a plain filesystem path.
pub fn is_url_location(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("file:") || lower.starts_with("jar:") || location.contains("://")
}

/// Resolves relative paths in `config` against `base_dir`.
pub fn resolve_config(config: &KilnConfig, base_dir: &Path) -> ResolvedConfig {
    let search_roots = config
        .loader
        .search_roots
        .iter()
        .map(|root| {
            if is_url_location(root) {
                root.clone()
            } else {
                anchor(base_dir, root).to_string_lossy().into_owned()
            }
        })
        .collect();

    ResolvedConfig {
        search_roots,
        output_dir: anchor(base_dir, &config.loader.output_dir),
        strict_artifacts: config.loader.strict_artifacts,
        compiler: config.compiler.clone(),
        layout: config.layout.clone(),
        host: config.host.clone(),
    }
}

fn anchor(base_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}
