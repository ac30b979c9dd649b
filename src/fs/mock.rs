// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File,
    Dir(Vec<String>), // List of child names
}

/// In-memory tree for listing and watcher tests. Paths are used as given, so
/// tests should stick to one root (usually `.`).
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    unreadable: Arc<Mutex<HashSet<PathBuf>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            entries: Arc::new(Mutex::new(entries)),
            unreadable: Arc::default(),
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>) {
        let path = key(path.as_ref());
        let mut entries = self.lock();
        entries.insert(path.clone(), MockEntry::File);
        Self::link_to_parent(&mut entries, &path);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut entries = self.lock();
        Self::ensure_dir_entry(&mut entries, &key(path.as_ref()));
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = key(path.as_ref());
        let mut entries = self.lock();
        entries.remove(&path);
        if let (Some(parent), Some(name)) = (parent_of(&path), path.file_name()) {
            if let Some(MockEntry::Dir(children)) = entries.get_mut(&parent) {
                children.retain(|c| c.as_str() != name.to_string_lossy());
            }
        }
    }

    /// Keep `path` as a directory but make `read_dir` on it fail.
    pub fn deny_read(&self, path: impl AsRef<Path>) {
        let path = key(path.as_ref());
        Self::ensure_dir_entry(&mut self.lock(), &path);
        self.unreadable
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(path);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        self.entries.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn ensure_dir_entry(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if entries.contains_key(path) {
            return;
        }
        entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        Self::link_to_parent(entries, path);
    }

    fn link_to_parent(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        let Some(parent) = parent_of(path) else {
            return;
        };
        if parent == path {
            return;
        }
        Self::ensure_dir_entry(entries, &parent);
        if let (Some(MockEntry::Dir(children)), Some(name)) =
            (entries.get_mut(&parent), path.file_name().and_then(|n| n.to_str()))
        {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_string());
            }
        }
    }
}

/// `./a/b` and `a/b` name the same entry.
fn key(path: &Path) -> PathBuf {
    match path.strip_prefix(".") {
        Ok(rest) if !rest.as_os_str().is_empty() => rest.to_path_buf(),
        _ => path.to_path_buf(),
    }
}

fn parent_of(path: &Path) -> Option<PathBuf> {
    path.parent().map(|parent| {
        if parent.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            parent.to_path_buf()
        }
    })
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(&key(path))
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lock().get(&key(path)), Some(MockEntry::File))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().get(&key(path)), Some(MockEntry::Dir(_)))
    }

    fn is_symlink(&self, _path: &Path) -> bool {
        false
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if self
            .unreadable
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .contains(&key(path))
        {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        match self.lock().get(&key(path)) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
