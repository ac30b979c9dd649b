// src/watch/listing.rs

use std::path::Path;

use anyhow::Result;
use tracing::{debug, warn};

use crate::fs::FileSystem;
use crate::watch::batch::ChangeBatch;
use crate::watch::patterns::WatchFilter;

/// Walk `root` and collect the files some block is interested in.
///
/// Directories under a common exclude and symlinked directories are not
/// descended into. A subdirectory that cannot be read is logged and skipped;
/// only an unreadable `root` is an error. Returned paths are root-relative
/// with forward slashes, sorted.
pub fn list_files(fs: &dyn FileSystem, root: &Path, filter: &WatchFilter) -> Result<Vec<String>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if dir == root => return Err(err),
            Err(err) => {
                warn!(dir = ?dir, error = %err, "skipping unreadable directory");
                continue;
            }
        };

        for path in entries {
            let Ok(rel) = path.strip_prefix(root) else {
                continue;
            };
            let rel_str = rel.to_string_lossy().replace('\\', "/");

            if fs.is_dir(&path) {
                if fs.is_symlink(&path) {
                    debug!(path = %rel_str, "not following symlinked directory");
                } else if !filter.is_ignored(&rel_str) {
                    stack.push(path);
                }
            } else if fs.is_file(&path) && filter.is_relevant(&rel_str) {
                files.push(rel_str);
            }
        }
    }

    files.sort();
    debug!(count = files.len(), "listed existing files for initial run");
    Ok(files)
}

/// The synthetic batch for the initial dispatch.
pub fn initial_batch(fs: &dyn FileSystem, root: &Path, filter: &WatchFilter) -> Result<ChangeBatch> {
    Ok(ChangeBatch::listing(list_files(fs, root, filter)?))
}
