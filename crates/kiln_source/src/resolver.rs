//! Source resolution: mapping a requested name to its source unit.

use std::path::{Path, PathBuf};

use kiln_common::TypeName;
use tracing::{debug, trace};

use crate::output_dir::OutputDirectory;
use crate::search_root::SearchRoot;
use crate::source_unit::{SourceOrigin, SourceUnit};

/// Finds the source unit for a name on an ordered list of search roots,
/// falling back to the output directory.
///
/// The root list is fixed at construction.
#[derive(Debug, Clone)]
pub struct SourceResolver {
    roots: Vec<SearchRoot>,
    output: OutputDirectory,
    source_extension: String,
}

impl SourceResolver {
    /// Creates a resolver over `roots` with `output` as the fallback location.
    pub fn new(
        roots: Vec<SearchRoot>,
        output: OutputDirectory,
        source_extension: impl Into<String>,
    ) -> Self {
        Self {
            roots,
            output,
            source_extension: source_extension.into(),
        }
    }

    /// The search roots, in lookup order.
    pub fn roots(&self) -> &[SearchRoot] {
        &self.roots
    }

    /// The fallback output directory.
    pub fn output(&self) -> &OutputDirectory {
        &self.output
    }

    /// The source file extension, without the dot.
    pub fn source_extension(&self) -> &str {
        &self.source_extension
    }

    /// Resolves `name` to a source unit.
    ///
    /// Each search root is checked in order and the first regular file found
    /// wins. If no root has it, the output directory is checked. `None` means
    /// the name is not backed by any source this resolver knows about, which
    /// callers may treat as "not one of mine".
    pub fn resolve(&self, name: &TypeName) -> Option<SourceUnit> {
        let relative = name.to_relative_path(&self.source_extension);

        for (index, root) in self.roots.iter().enumerate() {
            let candidate = root.fs_path().join(&relative);
            trace!(name = %name, candidate = %candidate.display(), "probing search root");
            if candidate.is_file() {
                return Some(self.found(name, candidate, SourceOrigin::SearchRoot(index)));
            }
        }

        let candidate = self.output.path().join(&relative);
        trace!(name = %name, candidate = %candidate.display(), "probing output directory");
        if candidate.is_file() {
            return Some(self.found(name, candidate, SourceOrigin::OutputDirectory));
        }

        debug!(name = %name, roots = self.roots.len(), "no source unit found");
        None
    }

    fn found(&self, name: &TypeName, path: PathBuf, origin: SourceOrigin) -> SourceUnit {
        let path = absolute(&path);
        debug!(name = %name, path = %path.display(), ?origin, "resolved source unit");
        SourceUnit {
            name: name.clone(),
            path,
            origin,
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn name(s: &str) -> TypeName {
        TypeName::new(s).unwrap()
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "class X {}").unwrap();
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        root_a: PathBuf,
        root_b: PathBuf,
        out: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let root_a = dir.path().join("a");
        let root_b = dir.path().join("b");
        let out = dir.path().join("out");
        for d in [&root_a, &root_b, &out] {
            fs::create_dir_all(d).unwrap();
        }
        Fixture {
            _dir: dir,
            root_a,
            root_b,
            out,
        }
    }

    fn resolver(f: &Fixture) -> SourceResolver {
        SourceResolver::new(
            vec![SearchRoot::from_path(&f.root_a), SearchRoot::from_path(&f.root_b)],
            OutputDirectory::new(&f.out),
            "java",
        )
    }

    #[test]
    fn finds_in_first_matching_root() {
        let f = fixture();
        touch(&f.root_b.join("org/x/Token.java"));
        let unit = resolver(&f).resolve(&name("org.x.Token")).unwrap();
        assert_eq!(unit.origin, SourceOrigin::SearchRoot(1));
        assert_eq!(unit.path, f.root_b.join("org/x/Token.java"));
        assert_eq!(unit.name, name("org.x.Token"));
    }

    #[test]
    fn earlier_root_wins() {
        let f = fixture();
        touch(&f.root_a.join("Token.java"));
        touch(&f.root_b.join("Token.java"));
        let unit = resolver(&f).resolve(&name("Token")).unwrap();
        assert_eq!(unit.origin, SourceOrigin::SearchRoot(0));
    }

    #[test]
    fn roots_win_over_output_directory() {
        let f = fixture();
        touch(&f.root_b.join("Token.java"));
        touch(&f.out.join("Token.java"));
        let unit = resolver(&f).resolve(&name("Token")).unwrap();
        assert_eq!(unit.origin, SourceOrigin::SearchRoot(1));
    }

    #[test]
    fn falls_back_to_output_directory() {
        let f = fixture();
        touch(&f.out.join("gen/Bytes20.java"));
        let unit = resolver(&f).resolve(&name("gen.Bytes20")).unwrap();
        assert_eq!(unit.origin, SourceOrigin::OutputDirectory);
        assert!(unit.path.is_absolute());
    }

    #[test]
    fn missing_everywhere_is_none() {
        let f = fixture();
        assert!(resolver(&f).resolve(&name("org.x.Missing")).is_none());
    }

    #[test]
    fn directory_with_source_name_is_ignored() {
        let f = fixture();
        fs::create_dir_all(f.root_a.join("Weird.java")).unwrap();
        assert!(resolver(&f).resolve(&name("Weird")).is_none());
    }

    #[test]
    fn extension_is_respected() {
        let f = fixture();
        touch(&f.root_a.join("Token.kt"));
        assert!(resolver(&f).resolve(&name("Token")).is_none());
        let kt = SourceResolver::new(
            vec![SearchRoot::from_path(&f.root_a)],
            OutputDirectory::new(&f.out),
            "kt",
        );
        assert!(kt.resolve(&name("Token")).is_some());
    }

    #[cfg(unix)]
    #[test]
    fn percent_encoded_url_root_resolves() {
        let f = fixture();
        let spaced = f.root_a.join("with space");
        touch(&spaced.join("Token.java"));
        let location = format!("file://{}", spaced.display()).replace(' ', "%20");
        let r = SourceResolver::new(
            vec![SearchRoot::new(location)],
            OutputDirectory::new(&f.out),
            "java",
        );
        let unit = r.resolve(&name("Token")).unwrap();
        assert_eq!(unit.path, spaced.join("Token.java"));
    }
}
