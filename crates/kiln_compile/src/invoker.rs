//! Building and running the compiler command for one source unit.

use std::ffi::OsString;
use std::sync::Arc;
use std::time::{Duration, Instant};

use kiln_config::CompilerConfig;
use kiln_source::{OutputDirectory, SourceUnit};
use tracing::{info, warn};

use crate::command::{CommandRunner, CommandSpec};
use crate::error::CompileError;
use crate::process::ProcessRunner;

/// How the compiler is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerSettings {
    /// Executable name or path.
    pub program: String,
    /// Flag preceding the output directory.
    pub output_flag: String,
    /// Flag preceding the classpath.
    pub classpath_flag: String,
    /// Extra arguments placed before the source file.
    pub extra_args: Vec<String>,
    /// Upper bound on one compile; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl CompilerSettings {
    /// Settings from the `[compiler]` section and an already-resolved timeout.
    pub fn from_config(config: &CompilerConfig, timeout: Option<Duration>) -> Self {
        Self {
            program: config.program.clone(),
            output_flag: config.output_flag.clone(),
            classpath_flag: config.classpath_flag.clone(),
            extra_args: config.extra_args.clone(),
            timeout,
        }
    }
}

impl Default for CompilerSettings {
    fn default() -> Self {
        let config = CompilerConfig::default();
        let timeout = Some(Duration::from_secs(config.timeout_secs));
        Self::from_config(&config, timeout)
    }
}

/// The result of a successful compile.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    /// Whatever the compiler printed, usually warnings. Often empty.
    pub diagnostics: String,
    /// Wall-clock time the compile took.
    pub elapsed: Duration,
}

/// Runs the external compiler for one source unit at a time.
#[derive(Clone)]
pub struct CompilerInvoker {
    runner: Arc<dyn CommandRunner>,
    settings: CompilerSettings,
}

impl std::fmt::Debug for CompilerInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompilerInvoker")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl CompilerInvoker {
    /// Creates an invoker that runs real child processes.
    pub fn new(settings: CompilerSettings) -> Self {
        Self::with_runner(settings, Arc::new(ProcessRunner::new()))
    }

    /// Creates an invoker that executes through `runner`.
    pub fn with_runner(settings: CompilerSettings, runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner, settings }
    }

    /// The invocation settings.
    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    /// The command that compiles `unit`:
    /// `<program> <output_flag> <out> <classpath_flag> <classpath> [extra...] <source>`.
    pub fn command_for(
        &self,
        unit: &SourceUnit,
        classpath: &str,
        output: &OutputDirectory,
    ) -> CommandSpec {
        let s = &self.settings;
        CommandSpec::new(&s.program)
            .arg(&s.output_flag)
            .arg(output.absolute_path())
            .arg(&s.classpath_flag)
            .arg(classpath)
            .args(s.extra_args.iter().map(OsString::from))
            .arg(&unit.path)
            .timeout(s.timeout)
    }

    /// Compiles `unit` into `output`, blocking until the compiler exits.
    ///
    /// Diagnostics are only inspected when the compile fails; the compiler's
    /// exit status alone decides success.
    pub fn compile(
        &self,
        unit: &SourceUnit,
        classpath: &str,
        output: &OutputDirectory,
    ) -> Result<CompileOutput, CompileError> {
        output.ensure()?;
        let spec = self.command_for(unit, classpath, output);
        info!(name = %unit.name, source = %unit.path.display(), "compiling");

        let started = Instant::now();
        let result = self.runner.run(&spec).map_err(|source| CompileError::Launch {
            program: self.settings.program.clone(),
            source,
        })?;
        let elapsed = started.elapsed();
        let diagnostics = result.output_text();

        if result.timed_out {
            let timeout = spec.timeout.unwrap_or(elapsed);
            warn!(name = %unit.name, ?timeout, "compiler timed out");
            return Err(CompileError::TimedOut {
                name: unit.name.clone(),
                timeout,
                diagnostics,
            });
        }
        if !result.ok() {
            warn!(name = %unit.name, exit_status = result.exit_status, "compiler reported errors");
            return Err(CompileError::Failed {
                name: unit.name.clone(),
                exit_status: result.exit_status,
                diagnostics,
            });
        }

        info!(name = %unit.name, elapsed_ms = elapsed.as_millis() as u64, "compiled");
        Ok(CompileOutput {
            diagnostics,
            elapsed,
        })
    }
}
