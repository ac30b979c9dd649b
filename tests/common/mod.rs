#![allow(dead_code)]

pub use prepwatch_test_utils::builders;
pub use prepwatch_test_utils::{init_tracing, marker_events, with_timeout};

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;

use prepwatch::config::Config;
use prepwatch::engine::{
    DispatchContext, DispatchEvent, PrepSequencer, Runner, RunnerOptions,
};
use prepwatch::exec::Executor;
use prepwatch::fs::FileSystem;
use prepwatch::log_sink::MemoryLog;
use prepwatch::notifier::Notifiers;

/// Append to `root/rel`, creating parent directories as needed.
pub fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .unwrap();
    f.write_all(b"teststring").unwrap();
}

/// Runner wired to a memory log, plus the sender feeding it.
pub fn runner_with(
    config: Config,
    root: &Path,
    executor: Arc<dyn Executor>,
    fs: Arc<dyn FileSystem>,
    notifiers: Notifiers,
    options: RunnerOptions,
) -> (Runner, mpsc::Sender<DispatchEvent>, MemoryLog) {
    let log = MemoryLog::new();
    let ctx = DispatchContext::new(root, Arc::new(log.clone()), notifiers);
    let sequencer = PrepSequencer::new(ctx, executor, root);
    let (tx, rx) = mpsc::channel(16);
    let runner = Runner::new(Arc::new(config), sequencer, fs, rx, options);
    (runner, tx, log)
}
