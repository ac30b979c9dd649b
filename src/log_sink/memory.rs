// src/log_sink/memory.rs

use std::sync::{Arc, Mutex, MutexGuard};

use super::LogSink;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Header(String),
    Say(String),
    Notice(String),
    Shout(String),
    Output(String),
}

impl LogEntry {
    pub fn text(&self) -> &str {
        match self {
            LogEntry::Header(s)
            | LogEntry::Say(s)
            | LogEntry::Notice(s)
            | LogEntry::Shout(s)
            | LogEntry::Output(s) => s,
        }
    }
}

/// Records every entry in order. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Command output lines only.
    pub fn output_lines(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                LogEntry::Output(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn push(&self, entry: LogEntry) {
        self.lock().push(entry);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl LogSink for MemoryLog {
    fn header(&self, label: &str) {
        self.push(LogEntry::Header(label.to_string()));
    }

    fn say(&self, line: &str) {
        self.push(LogEntry::Say(line.to_string()));
    }

    fn notice(&self, line: &str) {
        self.push(LogEntry::Notice(line.to_string()));
    }

    fn shout(&self, line: &str) {
        self.push(LogEntry::Shout(line.to_string()));
    }

    fn output(&self, line: &str) {
        self.push(LogEntry::Output(line.to_string()));
    }
}
