//! The command-execution abstraction the compiler invoker runs through.

use std::ffi::OsString;
use std::time::Duration;

/// A command to execute: program, arguments, and an optional wall-clock bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable name or path.
    pub program: OsString,
    /// Arguments, in order.
    pub args: Vec<OsString>,
    /// Maximum time to wait for the child. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    /// Creates a spec for `program` with no arguments and no timeout.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the wall-clock bound.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The command as a single shell-like line, for logs and diagnostics.
    pub fn display_line(&self) -> String {
        let mut line = self.program.to_string_lossy().into_owned();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

/// The outcome of running a [`CommandSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Exit code. A child killed by signal `n` reports `128 + n`.
    pub exit_status: i32,
    /// Whether the child was killed for exceeding its timeout.
    pub timed_out: bool,
    /// Standard output and standard error, merged in the order written.
    pub output: Vec<u8>,
    /// Whether `output` was cut short at the runner's capture limit.
    pub truncated: bool,
}

impl ExecResult {
    /// A successful result with the given output.
    pub fn success(output: impl Into<Vec<u8>>) -> Self {
        Self {
            exit_status: 0,
            timed_out: false,
            output: output.into(),
            truncated: false,
        }
    }

    /// A failed result with the given exit status and output.
    pub fn failure(exit_status: i32, output: impl Into<Vec<u8>>) -> Self {
        Self {
            exit_status,
            timed_out: false,
            output: output.into(),
            truncated: false,
        }
    }

    /// Returns `true` if the command exited with status 0 before its timeout.
    pub fn ok(&self) -> bool {
        !self.timed_out && self.exit_status == 0
    }

    /// The merged output as text, with a marker when it was truncated.
    pub fn output_text(&self) -> String {
        let mut text = String::from_utf8_lossy(&self.output).into_owned();
        if self.truncated {
            if !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str("...<output truncated>...\n");
        }
        text
    }
}

/// Something that can execute a [`CommandSpec`] and block until it finishes.
///
/// An `Err` means the command could not be started or waited on at all; a
/// command that ran and failed is an `Ok` with a nonzero
/// [`exit_status`](ExecResult::exit_status).
pub trait CommandRunner: Send + Sync {
    /// Runs the command to completion (or until its timeout expires).
    fn run(&self, spec: &CommandSpec) -> std::io::Result<ExecResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_args() {
        let spec = CommandSpec::new("javac")
            .arg("-d")
            .arg("/out")
            .args(["-cp", "/a:/b"])
            .timeout(Some(Duration::from_secs(5)));
        assert_eq!(spec.args.len(), 4);
        assert_eq!(spec.timeout, Some(Duration::from_secs(5)));
        assert_eq!(spec.display_line(), "javac -d /out -cp /a:/b");
    }

    #[test]
    fn ok_requires_zero_and_no_timeout() {
        assert!(ExecResult::success("").ok());
        assert!(!ExecResult::failure(1, "").ok());
        let mut timed_out = ExecResult::success("");
        timed_out.timed_out = true;
        assert!(!timed_out.ok());
    }

    #[test]
    fn output_text_marks_truncation() {
        let mut r = ExecResult::failure(2, "Token.java:3: error: ';' expected");
        assert_eq!(r.output_text(), "Token.java:3: error: ';' expected");
        r.truncated = true;
        assert!(r.output_text().ends_with("...<output truncated>...\n"));
    }

    #[test]
    fn output_text_is_lossy() {
        let r = ExecResult::failure(1, vec![b'o', b'k', 0xff]);
        assert!(r.output_text().starts_with("ok"));
    }
}
