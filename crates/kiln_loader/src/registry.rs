//! Process-wide loaders for callers that do not manage their own.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use kiln_artifact::{LoadedType, TypeSpace};
use kiln_source::OutputDirectory;
use tracing::debug;

use crate::builder::LoaderBuilder;
use crate::error::LoadError;
use crate::loader::CompilerLoader;

type Configure = Box<dyn Fn(LoaderBuilder) -> LoaderBuilder + Send + Sync>;

/// State shared by every loader that compiles into one output directory.
struct OutputSlot {
    space: Arc<TypeSpace>,
    lock: Arc<Mutex<()>>,
    loaders: HashMap<Vec<String>, Arc<CompilerLoader>>,
}

impl OutputSlot {
    fn new() -> Self {
        Self {
            space: Arc::new(TypeSpace::new()),
            lock: Arc::new(Mutex::new(())),
            loaders: HashMap::new(),
        }
    }
}

/// Hands out loaders keyed by output directory.
///
/// Output directories are compared after canonicalization, so `out`,
/// `./out` and `out/x/..` are one entry. Loaders for the same directory share
/// its compile lock and its type space, whatever their search roots: a name
/// is compiled once per directory, and two compiles never write into the
/// same directory at once.
pub struct LoaderRegistry {
    configure: Configure,
    slots: Mutex<HashMap<PathBuf, OutputSlot>>,
}

impl std::fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("LoaderRegistry")
            .field("output_dirs", &slots.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LoaderRegistry {
    /// A registry whose loaders use default settings.
    pub fn new() -> Self {
        Self::with_template(|builder| builder)
    }

    /// A registry that passes every new loader's builder through `configure`
    /// before building it. The output directory, search roots, compile lock
    /// and type space are set by the registry.
    pub fn with_template(
        configure: impl Fn(LoaderBuilder) -> LoaderBuilder + Send + Sync + 'static,
    ) -> Self {
        Self {
            configure: Box::new(configure),
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// The registry behind [`shared_loader`] and [`resolve_and_load`].
    pub fn global() -> &'static LoaderRegistry {
        static GLOBAL: OnceLock<LoaderRegistry> = OnceLock::new();
        GLOBAL.get_or_init(LoaderRegistry::new)
    }

    /// Returns the loader for this output directory and root list, creating
    /// the directory and the loader on first use.
    pub fn loader<S: AsRef<str>>(
        &self,
        search_roots: &[S],
        output_dir: &Path,
    ) -> Result<Arc<CompilerLoader>, LoadError> {
        OutputDirectory::new(output_dir).ensure()?;
        let dir = canonical_dir(output_dir);
        let roots: Vec<String> = search_roots.iter().map(|r| r.as_ref().to_string()).collect();

        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = slots.entry(dir.clone()).or_insert_with(OutputSlot::new);
        if let Some(loader) = slot.loaders.get(&roots) {
            return Ok(Arc::clone(loader));
        }

        debug!(
            output_dir = %dir.display(),
            roots = roots.len(),
            sharing = slot.loaders.len(),
            "creating shared loader"
        );
        let builder = LoaderBuilder::new(dir.clone()).search_roots(roots.iter().cloned());
        let builder = (self.configure)(builder);
        let loader = Arc::new(
            builder
                .definer(slot.space.clone())
                .compile_lock(Arc::clone(&slot.lock))
                .build(),
        );
        slot.loaders.insert(roots, Arc::clone(&loader));
        Ok(loader)
    }

    /// Loads `name` through the loader for `search_roots` and `output_dir`.
    pub fn load<S: AsRef<str>>(
        &self,
        name: &str,
        search_roots: &[S],
        output_dir: &Path,
    ) -> Result<Arc<LoadedType>, LoadError> {
        self.loader(search_roots, output_dir)?.load(name)
    }
}

fn canonical_dir(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Returns the process-wide loader for this output directory and root list,
/// creating it with default settings on first use.
///
/// Loaders live until the process exits, so every type they define stays
/// cached for the process lifetime.
pub fn shared_loader<S: AsRef<str>>(
    search_roots: &[S],
    output_dir: &Path,
) -> Result<Arc<CompilerLoader>, LoadError> {
    LoaderRegistry::global().loader(search_roots, output_dir)
}

/// Loads `name` through the shared loader for `search_roots` and `output_dir`.
pub fn resolve_and_load<S: AsRef<str>>(
    name: &str,
    search_roots: &[S],
    output_dir: &Path,
) -> Result<Arc<LoadedType>, LoadError> {
    LoaderRegistry::global().load(name, search_roots, output_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_shares_a_loader() {
        let dir = tempfile::tempdir().unwrap();
        let roots = [dir.path().join("src").to_string_lossy().into_owned()];
        let out = dir.path().join("out");
        let a = shared_loader(&roots, &out).unwrap();
        let b = shared_loader(&roots, &out).unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let other = shared_loader::<&str>(&[], &out).unwrap();
        assert!(!Arc::ptr_eq(&a, &other));
        assert!(Arc::ptr_eq(&a.compile_lock, &other.compile_lock));
    }

    #[test]
    fn spellings_of_one_output_dir_share_a_loader() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir_all(out.join("x")).unwrap();
        let registry = LoaderRegistry::new();
        let roots = ["src"];
        let plain = registry.loader(&roots, &out).unwrap();
        let dotted = registry.loader(&roots, &out.join(".")).unwrap();
        let detour = registry.loader(&roots, &out.join("x").join("..")).unwrap();
        assert!(Arc::ptr_eq(&plain, &dotted));
        assert!(Arc::ptr_eq(&plain, &detour));
        assert_eq!(registry.slots.lock().unwrap().len(), 1);
    }

    #[test]
    fn unwritable_output_dir_is_a_stage_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"").unwrap();
        let err = LoaderRegistry::new()
            .loader::<&str>(&[], &blocker.join("out"))
            .unwrap_err();
        assert!(matches!(err, LoadError::Stage(_)));
    }

    #[test]
    fn unknown_name_is_not_found_without_compiling() {
        let dir = tempfile::tempdir().unwrap();
        let roots = [dir.path().to_string_lossy().into_owned()];
        let out = dir.path().join("out");
        let err = resolve_and_load("org.example.Missing", &roots, &out).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(shared_loader(&roots, &out).unwrap().compile_count(), 0);
    }
}
