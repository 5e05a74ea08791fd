//! The compile-on-demand loader.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use kiln_artifact::{define_artifacts, discover, LoadedType, ReadPolicy, TypeDefiner};
use kiln_common::TypeName;
use kiln_compile::{CompileError, CompilerInvoker, CompilerSettings};
use kiln_config::{load_config, resolve_config, ConfiguredHost, HostFacts, ResolvedConfig};
use kiln_source::{OutputDirectory, SourceResolver};
use tracing::{debug, info, info_span, warn};

use crate::builder::LoaderBuilder;
use crate::error::LoadError;
use crate::lookup::TypeLookup;
use crate::report::{LoadOrigin, LoadReport};
use crate::stage::LoadStage;

/// Loads types by compiling their source units on first request.
///
/// A request is answered, in order, from this loader's type space, from the
/// parent lookup (if any), and finally by resolving, compiling, discovering
/// and defining. Only the last path takes the compile lock, so at most one
/// compile runs per lock at a time and cache hits never wait behind one.
/// Loaders handed out by a [`LoaderRegistry`](crate::LoaderRegistry) share
/// one lock per output directory.
pub struct CompilerLoader {
    pub(crate) resolver: SourceResolver,
    pub(crate) classpath: String,
    pub(crate) invoker: CompilerInvoker,
    pub(crate) artifact_extension: String,
    pub(crate) definer: Arc<dyn TypeDefiner>,
    pub(crate) parent: Option<Arc<dyn TypeLookup>>,
    pub(crate) policy: ReadPolicy,
    pub(crate) compile_lock: Arc<Mutex<()>>,
    pub(crate) compiles: AtomicUsize,
}

impl std::fmt::Debug for CompilerLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompilerLoader")
            .field("resolver", &self.resolver)
            .field("classpath", &self.classpath)
            .field("invoker", &self.invoker)
            .field("policy", &self.policy)
            .field("has_parent", &self.parent.is_some())
            .finish_non_exhaustive()
    }
}

impl CompilerLoader {
    /// Starts building a loader that writes into `output_dir`.
    pub fn builder(output_dir: impl Into<PathBuf>) -> LoaderBuilder {
        LoaderBuilder::new(output_dir)
    }

    /// Builds a loader from resolved configuration.
    pub fn from_config(config: &ResolvedConfig, host: Arc<dyn HostFacts>) -> Self {
        LoaderBuilder::new(config.output_dir.clone())
            .search_roots(config.search_roots.iter().cloned())
            .host(host)
            .compiler(CompilerSettings::from_config(
                &config.compiler,
                config.compile_timeout(),
            ))
            .layout(
                config.layout.source_extension.clone(),
                config.layout.artifact_extension.clone(),
            )
            .read_policy(ReadPolicy::from_strict(config.strict_artifacts))
            .build()
    }

    /// Reads `kiln.toml` from `project_dir` and builds a loader from it.
    pub fn open(project_dir: &Path) -> Result<Self, LoadError> {
        let config = load_config(project_dir)?;
        let resolved = resolve_config(&config, project_dir);
        let host = Arc::new(ConfiguredHost::from_config(&resolved.host));
        Ok(Self::from_config(&resolved, host))
    }

    /// The classpath handed to the compiler.
    pub fn classpath(&self) -> &str {
        &self.classpath
    }

    /// The output directory.
    pub fn output_dir(&self) -> &OutputDirectory {
        self.resolver.output()
    }

    /// The source resolver.
    pub fn resolver(&self) -> &SourceResolver {
        &self.resolver
    }

    /// The type definer backing this loader.
    pub fn definer(&self) -> &Arc<dyn TypeDefiner> {
        &self.definer
    }

    /// How many compiles this loader has started.
    pub fn compile_count(&self) -> usize {
        self.compiles.load(Ordering::SeqCst)
    }

    /// Stages a generated source unit in the output directory so that a later
    /// [`load`](Self::load) of `name` finds and compiles it.
    pub fn write_source(&self, name: &str, contents: &str) -> Result<PathBuf, LoadError> {
        let name = TypeName::new(name)?;
        let path = self
            .resolver
            .output()
            .write_source(&name, self.resolver.source_extension(), contents)?;
        Ok(path)
    }

    /// Loads the type named `name`.
    pub fn load(&self, name: &str) -> Result<Arc<LoadedType>, LoadError> {
        self.load_with_report(name).map(|report| report.loaded)
    }

    /// Loads the type named `name`, reporting how it was obtained and what
    /// else was defined along the way.
    pub fn load_with_report(&self, name: &str) -> Result<LoadReport, LoadError> {
        let name = TypeName::new(name)?;
        let span = info_span!("load", name = %name);
        let _enter = span.enter();

        if let Some(loaded) = self.definer.find_loaded(&name) {
            debug!("served from type space");
            return Ok(LoadReport::without_compile(loaded, LoadOrigin::Cached));
        }

        if let Some(parent) = &self.parent {
            match parent.lookup(&name) {
                Ok(Some(loaded)) => {
                    debug!("served by parent");
                    return Ok(LoadReport::without_compile(loaded, LoadOrigin::Parent));
                }
                Ok(None) => {}
                Err(e) if e.is_not_found() => {}
                Err(e) => {
                    return Err(LoadError::Parent {
                        name: name.to_string(),
                        source: Box::new(e),
                    });
                }
            }
        }

        let _guard = self
            .compile_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Another request may have defined it while we waited.
        if let Some(loaded) = self.definer.find_loaded(&name) {
            debug!("defined while waiting for the compile lock");
            return Ok(LoadReport::without_compile(loaded, LoadOrigin::Cached));
        }

        self.compile_and_define(name)
    }

    fn compile_and_define(&self, name: TypeName) -> Result<LoadReport, LoadError> {
        debug!(stage = %LoadStage::Resolving);
        let Some(unit) = self.resolver.resolve(&name) else {
            debug!(stage = %LoadStage::NotFound, "no source unit");
            return Err(LoadError::NotFound {
                name: name.to_string(),
            });
        };

        debug!(stage = %LoadStage::Compiling, source = %unit.path.display());
        self.compiles.fetch_add(1, Ordering::SeqCst);
        let output = self
            .invoker
            .compile(&unit, &self.classpath, self.resolver.output())
            .inspect_err(|e: &CompileError| {
                warn!(stage = %LoadStage::CompileFailed, error = %e, "compile failed");
            })?;

        debug!(stage = %LoadStage::Discovering);
        let artifacts = discover(
            self.resolver.output().path(),
            &name,
            &self.artifact_extension,
        )
        .map_err(LoadError::Discovery)?;

        debug!(stage = %LoadStage::Defining, artifacts = artifacts.len());
        let defined = define_artifacts(self.definer.as_ref(), &artifacts, self.policy)
            .map_err(LoadError::Definition)?;

        let Some(loaded) = defined.find(&name).cloned() else {
            warn!(stage = %LoadStage::NotFound, "compile produced no artifact for the requested name");
            return Err(LoadError::NotFound {
                name: name.to_string(),
            });
        };

        let companions = defined
            .defined
            .iter()
            .filter(|t| !Arc::ptr_eq(t, &loaded))
            .cloned()
            .collect();
        info!(
            stage = %LoadStage::Found,
            digest = %loaded.digest().short(),
            defined = defined.defined.len(),
            skipped = defined.skipped.len(),
            "loaded"
        );

        Ok(LoadReport {
            loaded,
            origin: LoadOrigin::Compiled,
            source: Some(unit),
            companions,
            skipped: defined.skipped,
            diagnostics: output.diagnostics,
            compile_time: output.elapsed,
        })
    }
}

impl TypeLookup for CompilerLoader {
    fn lookup(&self, name: &TypeName) -> Result<Option<Arc<LoadedType>>, LoadError> {
        match self.load(name.as_str()) {
            Ok(loaded) => Ok(Some(loaded)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
