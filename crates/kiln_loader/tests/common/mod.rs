#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use kiln_compile::{CommandRunner, CommandSpec, ExecResult};
use kiln_config::StaticHost;
use kiln_loader::{CompilerLoader, LoaderBuilder, TypeName};
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// A compiler stand-in.
///
/// Reads the source file (last argument) line by line. `type <Name>` writes an
/// artifact for `<Name>` under the `-d` directory, holding the line itself.
/// A line reading `error` makes it fail with exit status 1 and a javac-style
/// message on the merged output.
#[derive(Default)]
pub struct StubCompiler {
    pub calls: AtomicUsize,
    pub active: AtomicUsize,
    pub overlaps: AtomicUsize,
    pub delay: Option<Duration>,
    pub seen: Mutex<Vec<CommandSpec>>,
}

impl StubCompiler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CommandRunner for StubCompiler {
    fn run(&self, spec: &CommandSpec) -> std::io::Result<ExecResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.active.fetch_add(1, Ordering::SeqCst) != 0 {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        self.seen.lock().unwrap().push(spec.clone());
        let result = compile_stub(spec);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

fn compile_stub(spec: &CommandSpec) -> std::io::Result<ExecResult> {
    let out_pos = spec.args.iter().position(|a| a == "-d").unwrap();
    let out = PathBuf::from(&spec.args[out_pos + 1]);
    let source = PathBuf::from(spec.args.last().unwrap());
    let text = fs::read_to_string(&source)?;

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line == "error" {
            let msg = format!("{}:{}: error: illegal start of type\n1 error\n", source.display(), i + 1);
            return Ok(ExecResult::failure(1, msg));
        }
        if let Some(name) = line.strip_prefix("type ") {
            let name = TypeName::new(name.trim()).unwrap();
            let path = out.join(name.to_relative_path("class"));
            fs::create_dir_all(path.parent().unwrap())?;
            fs::write(path, line)?;
        }
    }
    Ok(ExecResult::success(""))
}

/// Writes a source unit under `root`.
pub fn write_source(root: &Path, name: &str, body: &str) -> PathBuf {
    let path = root.join(TypeName::new(name).unwrap().to_relative_path("java"));
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, body).unwrap();
    path
}

/// A scratch project: one search root and an output directory.
pub struct Project {
    pub dir: tempfile::TempDir,
    pub compiler: Arc<StubCompiler>,
}

impl Project {
    pub fn new() -> Self {
        Self::with_compiler(StubCompiler::new())
    }

    pub fn with_compiler(compiler: Arc<StubCompiler>) -> Self {
        init_tracing();
        Self {
            dir: tempfile::tempdir().unwrap(),
            compiler,
        }
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("src")
    }

    pub fn out(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    pub fn source(&self, name: &str, body: &str) -> PathBuf {
        write_source(&self.root(), name, body)
    }

    pub fn builder(&self) -> LoaderBuilder {
        LoaderBuilder::new(self.out())
            .search_root(self.root().to_string_lossy())
            .host(Arc::new(StaticHost::new("linux", "")))
            .runner(self.compiler.clone())
    }

    pub fn loader(&self) -> CompilerLoader {
        self.builder().build()
    }
}
