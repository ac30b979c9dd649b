// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the rendered prep
//! commands, using `tokio::process::Command`.
//!
//! - [`process`] runs one command, streams its output and classifies
//!   failures.
//! - [`backend`] provides the `Executor` trait and the `ShellExecutor` used
//!   in production, which tests can replace with a fake.

pub mod backend;
pub mod process;

pub use backend::{ExecFuture, Executor, ShellExecutor};
pub use process::run_proc;
