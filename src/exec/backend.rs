// src/exec/backend.rs

//! Pluggable executor abstraction.
//!
//! The prep sequencer talks to an `Executor` instead of spawning processes
//! itself. Production uses [`ShellExecutor`]; tests can provide their own
//! implementation that records commands and decides the outcome.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use crate::errors::PrepError;
use crate::log_sink::LogSink;
use crate::types::Shell;

use super::process::run_proc;

/// Boxed future returned by [`Executor::run`].
pub type ExecFuture<'a> = Pin<Box<dyn Future<Output = Result<(), PrepError>> + Send + 'a>>;

/// Trait abstracting how a rendered command is run.
pub trait Executor: Send + Sync {
    /// Run `cmd` to completion.
    ///
    /// Implementations must follow the error contract of
    /// [`run_proc`]: `Launch` when nothing ran, `Process` (with output) when
    /// the command failed.
    fn run<'a>(
        &'a self,
        cmd: &'a str,
        shell: Shell,
        dir: &'a Path,
        log: &'a dyn LogSink,
    ) -> ExecFuture<'a>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellExecutor;

impl Executor for ShellExecutor {
    fn run<'a>(
        &'a self,
        cmd: &'a str,
        shell: Shell,
        dir: &'a Path,
        log: &'a dyn LogSink,
    ) -> ExecFuture<'a> {
        Box::pin(run_proc(cmd, shell, dir, log))
    }
}
