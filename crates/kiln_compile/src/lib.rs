//! External compiler invocation.
//!
//! Compilation is modelled as command execution: a [`CommandSpec`] goes in,
//! an [`ExecResult`] (exit status plus the merged stdout/stderr stream) comes
//! out. [`ProcessRunner`] runs real child processes with a bounded wait;
//! tests substitute their own [`CommandRunner`]. [`CompilerInvoker`] builds
//! the compiler's argument list and turns results into [`CompileError`]s.

#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod invoker;
pub mod process;

pub use command::{CommandRunner, CommandSpec, ExecResult};
pub use error::CompileError;
pub use invoker::{CompileOutput, CompilerInvoker, CompilerSettings};
pub use process::ProcessRunner;
