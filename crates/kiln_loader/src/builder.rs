//! Programmatic construction of a [`CompilerLoader`].

use std::path::PathBuf;
use std::sync::atomic::AtomicUsize;
use std::sync::{Arc, Mutex};

use kiln_artifact::{ReadPolicy, TypeDefiner, TypeSpace};
use kiln_compile::{CommandRunner, CompilerInvoker, CompilerSettings, ProcessRunner};
use kiln_config::{ConfiguredHost, HostFacts, LayoutConfig};
use kiln_source::{build_classpath, OutputDirectory, SearchRoot, SourceResolver};

use crate::loader::CompilerLoader;
use crate::lookup::TypeLookup;

/// Builder for [`CompilerLoader`].
///
/// Everything except the output directory has a default: no search roots,
/// host facts from the process environment, `javac` run as a child process,
/// a fresh [`TypeSpace`], no parent, and [`ReadPolicy::WarnAndSkip`].
pub struct LoaderBuilder {
    output_dir: PathBuf,
    search_roots: Vec<String>,
    host: Option<Arc<dyn HostFacts>>,
    settings: CompilerSettings,
    runner: Option<Arc<dyn CommandRunner>>,
    definer: Option<Arc<dyn TypeDefiner>>,
    parent: Option<Arc<dyn TypeLookup>>,
    policy: ReadPolicy,
    layout: LayoutConfig,
    compile_lock: Option<Arc<Mutex<()>>>,
}

impl LoaderBuilder {
    /// Starts a builder for a loader that compiles into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            search_roots: Vec::new(),
            host: None,
            settings: CompilerSettings::default(),
            runner: None,
            definer: None,
            parent: None,
            policy: ReadPolicy::default(),
            layout: LayoutConfig::default(),
            compile_lock: None,
        }
    }

    /// Appends a search root (a path or a `file:` URL).
    pub fn search_root(mut self, location: impl Into<String>) -> Self {
        self.search_roots.push(location.into());
        self
    }

    /// Appends several search roots, in order.
    pub fn search_roots<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_roots
            .extend(locations.into_iter().map(Into::into));
        self
    }

    /// Sets the host facts used for the classpath.
    pub fn host(mut self, host: Arc<dyn HostFacts>) -> Self {
        self.host = Some(host);
        self
    }

    /// Sets the compiler invocation.
    pub fn compiler(mut self, settings: CompilerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Runs the compiler through `runner` instead of a child process.
    pub fn runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    /// Defines types through `definer` instead of a private [`TypeSpace`].
    pub fn definer(mut self, definer: Arc<dyn TypeDefiner>) -> Self {
        self.definer = Some(definer);
        self
    }

    /// Consults `parent` before compiling anything.
    pub fn parent(mut self, parent: Arc<dyn TypeLookup>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets how unreadable artifacts are handled.
    pub fn read_policy(mut self, policy: ReadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the source and artifact extensions (without the dot).
    pub fn layout(
        mut self,
        source_extension: impl Into<String>,
        artifact_extension: impl Into<String>,
    ) -> Self {
        self.layout = LayoutConfig {
            source_extension: source_extension.into(),
            artifact_extension: artifact_extension.into(),
        };
        self
    }

    /// Serializes compiles with every other loader holding the same lock.
    /// Loaders that share an output directory must share its lock.
    pub(crate) fn compile_lock(mut self, lock: Arc<Mutex<()>>) -> Self {
        self.compile_lock = Some(lock);
        self
    }

    /// Builds the loader. The classpath is assembled once, here.
    pub fn build(self) -> CompilerLoader {
        let roots: Vec<SearchRoot> = self.search_roots.into_iter().map(SearchRoot::new).collect();
        let host = self
            .host
            .unwrap_or_else(|| Arc::new(ConfiguredHost::from_env()));
        let classpath = build_classpath(&roots, host.as_ref());

        let runner = self
            .runner
            .unwrap_or_else(|| Arc::new(ProcessRunner::new()));
        let invoker = CompilerInvoker::with_runner(self.settings, runner);
        let resolver = SourceResolver::new(
            roots,
            OutputDirectory::new(self.output_dir),
            self.layout.source_extension,
        );

        CompilerLoader {
            resolver,
            classpath,
            invoker,
            artifact_extension: self.layout.artifact_extension,
            definer: self
                .definer
                .unwrap_or_else(|| Arc::new(TypeSpace::new())),
            parent: self.parent,
            policy: self.policy,
            compile_lock: self.compile_lock.unwrap_or_default(),
            compiles: AtomicUsize::new(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_config::StaticHost;

    #[test]
    fn classpath_is_built_from_roots_and_host() {
        let loader = LoaderBuilder::new("/out")
            .search_root("/a")
            .search_root("file:/b")
            .host(Arc::new(StaticHost::new("linux", "/opt/ambient.jar")))
            .build();
        assert_eq!(loader.classpath(), "/a:/b:/opt/ambient.jar");
        assert_eq!(loader.resolver().roots().len(), 2);
        assert_eq!(loader.compile_count(), 0);
    }

    #[test]
    fn windows_host_uses_semicolons() {
        let loader = LoaderBuilder::new("C:/out")
            .search_roots(["C:/a", "C:/b"])
            .host(Arc::new(StaticHost::new("Windows 11", "")))
            .build();
        assert_eq!(loader.classpath(), "C:/a;C:/b");
    }

    #[test]
    fn layout_controls_extensions() {
        let loader = LoaderBuilder::new("/out")
            .host(Arc::new(StaticHost::new("linux", "")))
            .layout("kt", "bin")
            .build();
        assert_eq!(loader.resolver().source_extension(), "kt");
        assert_eq!(loader.artifact_extension, "bin");
    }
}
