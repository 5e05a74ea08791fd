//! Running real child processes with merged output and a bounded wait.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::command::{CommandRunner, CommandSpec, ExecResult};

/// Default cap on captured output (1 MiB).
pub const DEFAULT_OUTPUT_CAP: usize = 1024 * 1024;

/// How often a child with a deadline is polled.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// How long to wait for the output pipe to reach EOF once the child is gone.
/// A grandchild that inherited the pipe can keep it open indefinitely.
const DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Runs commands as child processes.
///
/// Standard output and standard error share one pipe, so diagnostics arrive
/// as a single stream in the order the child wrote them. Output is drained on
/// a helper thread (the child never blocks on a full pipe) and retained up to
/// the capture cap. When the command has a timeout, the child is killed once it
/// expires and the result is flagged [`timed_out`](ExecResult::timed_out).
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    output_cap: usize,
}

impl ProcessRunner {
    /// Creates a runner with the default capture cap.
    pub fn new() -> Self {
        Self {
            output_cap: DEFAULT_OUTPUT_CAP,
        }
    }

    /// Creates a runner that retains at most `output_cap` bytes of output.
    pub fn with_output_cap(output_cap: usize) -> Self {
        Self { output_cap }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct Captured {
    bytes: Vec<u8>,
    truncated: bool,
}

impl CommandRunner for ProcessRunner {
    fn run(&self, spec: &CommandSpec) -> std::io::Result<ExecResult> {
        let (reader, writer) = std::io::pipe()?;

        // The command owns the write ends; it must be dropped right after
        // spawning or the reader never sees EOF.
        let mut child = {
            let mut cmd = Command::new(&spec.program);
            cmd.args(&spec.args);
            cmd.stdin(Stdio::null());
            cmd.stderr(writer.try_clone()?);
            cmd.stdout(writer);
            cmd.spawn()?
        };
        debug!(pid = child.id(), command = %spec.display_line(), "spawned child");

        let captured = Arc::new(Mutex::new(Captured::default()));
        let (done_tx, done_rx) = mpsc::channel();
        {
            let captured = Arc::clone(&captured);
            let cap = self.output_cap;
            thread::spawn(move || {
                drain_capped(reader, cap, &captured);
                let _ = done_tx.send(());
            });
        }

        let (status, timed_out) = wait_with_deadline(&mut child, spec.timeout)?;
        if timed_out {
            warn!(pid = child.id(), timeout = ?spec.timeout, "child exceeded its timeout and was killed");
        }

        if done_rx.recv_timeout(DRAIN_GRACE).is_err() {
            debug!("output pipe still open after child exit, keeping partial output");
        }
        let captured = std::mem::take(&mut *captured.lock().unwrap_or_else(PoisonError::into_inner));

        Ok(ExecResult {
            exit_status: exit_code(status),
            timed_out,
            output: captured.bytes,
            truncated: captured.truncated,
        })
    }
}

/// Reads `reader` to EOF, retaining the first `cap` bytes.
fn drain_capped<R: Read>(mut reader: R, cap: usize, captured: &Mutex<Captured>) {
    let mut chunk = [0u8; 8192];
    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        let mut out = captured.lock().unwrap_or_else(PoisonError::into_inner);
        let room = cap.saturating_sub(out.bytes.len());
        if n > room {
            out.truncated = true;
        }
        let keep = n.min(room);
        out.bytes.extend_from_slice(&chunk[..keep]);
    }
}

fn wait_with_deadline(
    child: &mut Child,
    timeout: Option<Duration>,
) -> std::io::Result<(ExitStatus, bool)> {
    let Some(timeout) = timeout else {
        return Ok((child.wait()?, false));
    };
    let deadline = Instant::now().checked_add(timeout);

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok((status, false));
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            let _ = child.kill();
            let status = child.wait()?;
            return Ok((status, true));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    let signal = {
        use std::os::unix::process::ExitStatusExt as _;
        status.signal()
    };
    #[cfg(not(unix))]
    let signal: Option<i32> = None;

    match status.code() {
        Some(code) => code,
        None => signal.map(|s| 128 + s).unwrap_or(1),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandSpec {
        CommandSpec::new("sh").arg("-c").arg(script)
    }

    #[test]
    fn success_captures_stdout() {
        let r = ProcessRunner::new().run(&sh("echo compiled")).unwrap();
        assert!(r.ok());
        assert_eq!(r.output_text(), "compiled\n");
    }

    #[test]
    fn stderr_is_merged_in_order() {
        let r = ProcessRunner::new()
            .run(&sh("echo first; echo second 1>&2; echo third"))
            .unwrap();
        assert_eq!(r.output_text(), "first\nsecond\nthird\n");
    }

    #[test]
    fn nonzero_exit_is_reported() {
        let r = ProcessRunner::new()
            .run(&sh("echo 'Token.java:1: error: boom' 1>&2; exit 1"))
            .unwrap();
        assert!(!r.ok());
        assert!(!r.timed_out);
        assert_eq!(r.exit_status, 1);
        assert!(r.output_text().contains("error: boom"));
    }

    #[test]
    fn missing_program_is_launch_error() {
        let err = ProcessRunner::new()
            .run(&CommandSpec::new("kiln-definitely-not-a-compiler"))
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn timeout_kills_child() {
        let spec = CommandSpec::new("sleep")
            .arg("10")
            .timeout(Some(Duration::from_millis(100)));
        let started = Instant::now();
        let r = ProcessRunner::new().run(&spec).unwrap();
        assert!(r.timed_out);
        assert!(!r.ok());
        assert!(started.elapsed() < Duration::from_secs(5));
        // SIGKILL
        assert_eq!(r.exit_status, 128 + 9);
    }

    #[test]
    fn fast_child_beats_timeout() {
        let spec = sh("exit 0").timeout(Some(Duration::from_secs(10)));
        let r = ProcessRunner::new().run(&spec).unwrap();
        assert!(r.ok());
    }

    #[test]
    fn output_is_capped() {
        let r = ProcessRunner::with_output_cap(16)
            .run(&sh("printf '0123456789abcdefXYZ'"))
            .unwrap();
        assert!(r.ok());
        assert!(r.truncated);
        assert_eq!(r.output, b"0123456789abcdef");
    }
}
