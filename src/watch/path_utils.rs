// src/watch/path_utils.rs

//! Path helpers shared by the watcher and the initial listing.

use std::path::Path;

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// - First try a direct `strip_prefix(root)`.
/// - If that fails (symlinked temp dirs, `/private/var` on macOS), try again
///   with both sides canonicalized. A deleted path cannot be canonicalized,
///   so its parent is canonicalized instead and the file name re-attached.
///
/// Returns `None` if the path is not under `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(to_slash(rel));
    }

    let root_canon = root.canonicalize().ok()?;
    let path_canon = match path.canonicalize() {
        Ok(p) => p,
        Err(_) => {
            let parent = path.parent()?.canonicalize().ok()?;
            parent.join(path.file_name()?)
        }
    };

    path_canon.strip_prefix(&root_canon).ok().map(to_slash)
}

fn to_slash(rel: &Path) -> String {
    rel.to_string_lossy().replace('\\', "/")
}
