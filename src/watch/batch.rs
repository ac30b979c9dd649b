// src/watch/batch.rs

//! Change batches and the coalescing logic that builds them.

use std::collections::{BTreeSet, HashMap};

use notify::EventKind;

use crate::watch::patterns::{normalize, BlockPatterns};

/// A coalesced, deduplicated set of root-relative paths that changed since
/// the previous dispatch.
///
/// Each list is sorted and free of duplicates, and a path appears in at most
/// one list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeBatch {
    added: Vec<String>,
    modified: Vec<String>,
    deleted: Vec<String>,
}

impl ChangeBatch {
    pub fn new<A, M, D>(added: A, modified: M, deleted: D) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        M: IntoIterator,
        M::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        let deleted = sorted_set(deleted);
        let added: BTreeSet<String> = sorted_set(added)
            .into_iter()
            .filter(|p| !deleted.contains(p))
            .collect();
        let modified: BTreeSet<String> = sorted_set(modified)
            .into_iter()
            .filter(|p| !deleted.contains(p) && !added.contains(p))
            .collect();

        Self {
            added: added.into_iter().collect(),
            modified: modified.into_iter().collect(),
            deleted: deleted.into_iter().collect(),
        }
    }

    /// A batch of files that already exist, used for the initial dispatch.
    pub fn listing<I>(paths: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self::new(paths, Vec::<String>::new(), Vec::<String>::new())
    }

    pub fn added(&self) -> &[String] {
        &self.added
    }

    pub fn modified(&self) -> &[String] {
        &self.modified
    }

    pub fn deleted(&self) -> &[String] {
        &self.deleted
    }

    /// Added and modified paths, sorted. Deleted paths are left out since
    /// there is nothing left to run a command against.
    pub fn all(&self) -> Vec<String> {
        let mut all: Vec<String> = self
            .added
            .iter()
            .chain(self.modified.iter())
            .cloned()
            .collect();
        all.sort();
        all
    }

    /// Every path in the batch, deleted ones included.
    pub fn paths(&self) -> Vec<&str> {
        self.added
            .iter()
            .chain(self.modified.iter())
            .chain(self.deleted.iter())
            .map(String::as_str)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }

    pub fn len(&self) -> usize {
        self.added.len() + self.modified.len() + self.deleted.len()
    }

    /// The part of this batch a block cares about.
    pub fn filter(&self, patterns: &BlockPatterns) -> ChangeBatch {
        ChangeBatch {
            added: patterns.match_paths(&self.added),
            modified: patterns.match_paths(&self.modified),
            deleted: patterns.match_paths(&self.deleted),
        }
    }
}

fn sorted_set<I>(paths: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    paths
        .into_iter()
        .map(|p| normalize(p.as_ref()))
        .filter(|p| !p.is_empty())
        .collect()
}

/// Raw change reported for a path, before coalescing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawChange {
    Created,
    Modified,
    Removed,
}

impl RawChange {
    /// Map a `notify` event kind. Access events and the like are dropped.
    pub fn from_event_kind(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(RawChange::Created),
            EventKind::Modify(_) | EventKind::Any => Some(RawChange::Modified),
            EventKind::Remove(_) => Some(RawChange::Removed),
            EventKind::Access(_) | EventKind::Other => None,
        }
    }
}

/// Accumulates raw changes during one burst and turns them into a batch.
///
/// Only the first change seen for a path is remembered: the final kind is
/// decided when the burst ends, from whether the file still exists.
#[derive(Debug, Default)]
pub struct BatchBuilder {
    first_seen: HashMap<String, RawChange>,
}

impl BatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, rel_path: &str, change: RawChange) {
        let rel_path = normalize(rel_path);
        if rel_path.is_empty() {
            return;
        }
        self.first_seen.entry(rel_path).or_insert(change);
    }

    pub fn is_empty(&self) -> bool {
        self.first_seen.is_empty()
    }

    /// Close the burst.
    ///
    /// - gone now: deleted
    /// - first seen as a create: added
    /// - otherwise: modified
    pub fn finish(&mut self, exists: impl Fn(&str) -> bool) -> ChangeBatch {
        let mut added = Vec::new();
        let mut modified = Vec::new();
        let mut deleted = Vec::new();

        for (path, first) in self.first_seen.drain() {
            if !exists(&path) {
                deleted.push(path);
            } else if first == RawChange::Created {
                added.push(path);
            } else {
                modified.push(path);
            }
        }

        ChangeBatch::new(added, modified, deleted)
    }
}
