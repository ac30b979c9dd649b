// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::DispatchEvent;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::watch::batch::{BatchBuilder, RawChange};
use crate::watch::path_utils::relative_str;
use crate::watch::patterns::WatchFilter;

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching, which also ends the coalescing task.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
    root: PathBuf,
}

impl WatcherHandle {
    /// Canonical root being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("root", &self.root)
            .finish()
    }
}

/// Spawn a filesystem watcher that observes `root` recursively and sends
/// one `DispatchEvent::Batch` per burst of changes.
///
/// - `filter` drops paths no block includes and common excludes.
/// - `settle` is the quiet period that closes a burst.
/// - `fs` answers existence queries when a burst is classified.
///
/// Changes made before this call returns are never reported. Failing to
/// register the watch is returned as an error; everything after that is
/// logged.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    filter: WatchFilter,
    dispatch_tx: mpsc::Sender<DispatchEvent>,
    settle: Duration,
    fs: Arc<dyn FileSystem>,
) -> Result<WatcherHandle> {
    let root = root.into();
    // Canonicalize once so we have a stable base path.
    let root = root.canonicalize().unwrap_or(root);

    // Channel from the blocking notify callback into the async world.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                // Receiver gone means the coalescing task has stopped.
                let _ = event_tx.send(event);
            }
            Err(err) => {
                warn!("file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", root);

    tokio::spawn(coalesce_events(
        root.clone(),
        filter,
        event_rx,
        dispatch_tx,
        settle,
        fs,
    ));

    Ok(WatcherHandle {
        _inner: watcher,
        root,
    })
}

/// Group raw events into batches and forward them.
///
/// A burst starts with the first relevant event and ends once `settle` has
/// passed without another one.
async fn coalesce_events(
    root: PathBuf,
    filter: WatchFilter,
    mut event_rx: mpsc::UnboundedReceiver<Event>,
    dispatch_tx: mpsc::Sender<DispatchEvent>,
    settle: Duration,
    fs: Arc<dyn FileSystem>,
) {
    let mut builder = BatchBuilder::new();

    loop {
        let next = if builder.is_empty() {
            event_rx.recv().await
        } else {
            match tokio::time::timeout(settle, event_rx.recv()).await {
                Ok(next) => next,
                Err(_elapsed) => {
                    if !flush(&root, &mut builder, &dispatch_tx, fs.as_ref()).await {
                        break;
                    }
                    continue;
                }
            }
        };

        let Some(event) = next else {
            flush(&root, &mut builder, &dispatch_tx, fs.as_ref()).await;
            break;
        };

        debug!(?event, "received notify event");
        record_event(&root, &filter, fs.as_ref(), &event, &mut builder);
    }

    debug!("watcher event loop finished");
}

fn record_event(
    root: &Path,
    filter: &WatchFilter,
    fs: &dyn FileSystem,
    event: &Event,
    builder: &mut BatchBuilder,
) {
    let Some(change) = RawChange::from_event_kind(&event.kind) else {
        return;
    };

    for path in &event.paths {
        if fs.is_dir(path) {
            continue;
        }
        let Some(rel) = relative_str(root, path) else {
            warn!("could not relativize path {:?} against root {:?}", path, root);
            continue;
        };
        if rel.is_empty() || !filter.is_relevant(&rel) {
            continue;
        }
        builder.record(&rel, change);
    }
}

/// Send the pending batch, if any. Returns false once the dispatch side is
/// gone.
async fn flush(
    root: &Path,
    builder: &mut BatchBuilder,
    dispatch_tx: &mpsc::Sender<DispatchEvent>,
    fs: &dyn FileSystem,
) -> bool {
    if builder.is_empty() {
        return true;
    }

    let batch = builder.finish(|rel| fs.exists(&root.join(rel)));
    if batch.is_empty() {
        return true;
    }

    debug!(
        added = batch.added().len(),
        modified = batch.modified().len(),
        deleted = batch.deleted().len(),
        "change batch ready"
    );

    if let Err(err) = dispatch_tx.send(DispatchEvent::Batch(batch)).await {
        warn!("failed to send change batch: {err}");
        return false;
    }
    true
}
