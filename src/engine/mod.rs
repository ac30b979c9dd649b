// src/engine/mod.rs

//! Dispatch engine for prepwatch.
//!
//! This module ties together:
//! - the planner that decides which blocks a batch triggers ([`core`])
//! - the prep sequencer that runs one block's commands ([`prep`])
//! - the dispatch loop that performs the initial run and then reacts to
//!   change batches and shutdown requests ([`runtime`])
//!
//! Planning is pure and synchronous; all IO lives in the sequencer and the
//! runner.

use std::path::PathBuf;
use std::sync::Arc;

use crate::log_sink::LogSink;
use crate::notifier::Notifiers;
use crate::watch::ChangeBatch;

pub mod core;
pub mod prep;
pub mod runtime;

pub use self::core::{plan_batch, plan_initial, BlockRun, DispatchPlan};
pub use prep::{PrepSequencer, NOTIFY_TITLE};
pub use runtime::Runner;

/// Events flowing into the dispatch loop.
#[derive(Debug, Clone)]
pub enum DispatchEvent {
    /// A coalesced set of filesystem changes.
    Batch(ChangeBatch),
    /// Graceful shutdown requested (e.g. Ctrl-C). Observed between batches.
    Shutdown,
}

/// Options for the dispatch loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunnerOptions {
    /// Return right after the initial dispatch (`--prep-only`).
    pub prep_only: bool,
}

/// Handles shared by every dispatch: where commands run and where their
/// activity is reported.
#[derive(Debug, Clone)]
pub struct DispatchContext {
    /// Watch root; block `in_dir`s are resolved against it.
    pub root: PathBuf,
    pub log: Arc<dyn LogSink>,
    pub notifiers: Notifiers,
}

impl DispatchContext {
    pub fn new(root: impl Into<PathBuf>, log: Arc<dyn LogSink>, notifiers: Notifiers) -> Self {
        Self {
            root: root.into(),
            log,
            notifiers,
        }
    }
}
