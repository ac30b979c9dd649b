// src/log_sink/mod.rs

//! Where dispatch activity is reported.
//!
//! The dispatch loop and the prep sequencer only ever talk to a
//! [`LogSink`]. Production uses [`TracingLog`]; tests use
//! [`memory::MemoryLog`] and assert on the recorded entries.

use std::fmt::Debug;

use tracing::{error, info};

pub mod memory;

pub use memory::{LogEntry, MemoryLog};

pub trait LogSink: Send + Sync + Debug {
    /// Marks the start of a command (`prep: <cmd>`).
    fn header(&self, label: &str);
    /// Plain informational line (`skipping prep: <cmd>`).
    fn say(&self, line: &str);
    /// Completion notices (`>> done (..)`).
    fn notice(&self, line: &str);
    /// Elevated line, used for command failures.
    fn shout(&self, line: &str);
    /// One line of command output, as it is produced.
    fn output(&self, line: &str);
}

/// Sends labels through `tracing` (stderr) and command output to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl LogSink for TracingLog {
    fn header(&self, label: &str) {
        info!(target: "prepwatch::prep", "{label}");
    }

    fn say(&self, line: &str) {
        info!(target: "prepwatch::prep", "{line}");
    }

    fn notice(&self, line: &str) {
        info!(target: "prepwatch::prep", "{line}");
    }

    fn shout(&self, line: &str) {
        error!(target: "prepwatch::prep", "{line}");
    }

    fn output(&self, line: &str) {
        println!("{line}");
    }
}
