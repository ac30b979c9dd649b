// src/watch/patterns.rs

use std::collections::HashSet;
use std::fmt;

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::config::model::Block;

/// Paths that are never reported as changes when common excludes are on.
///
/// VCS metadata, vendored JS dependencies and the temp/backup files editors
/// write next to the file being saved.
pub const COMMON_EXCLUDES: &[&str] = &[
    "**/.git",
    "**/.git/**",
    "**/.hg",
    "**/.hg/**",
    "**/.svn",
    "**/.svn/**",
    "**/node_modules",
    "**/node_modules/**",
    "**/.DS_Store",
    "**/.#*",
    "**/*~",
    "**/*.swp",
    "**/*.swx",
    "**/4913",
];

/// Compiled include/exclude patterns for a single block.
///
/// Patterns are relative to the watch root. `*` stays inside one path
/// segment; `**` crosses segments. Callers pass root-relative paths such as
/// `"src/main.rs"` (see [`normalize`]).
#[derive(Clone)]
pub struct BlockPatterns {
    includes: Vec<String>,
    excludes: Vec<String>,
    include_set: GlobSet,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for BlockPatterns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockPatterns")
            .field("includes", &self.includes)
            .field("excludes", &self.excludes)
            .finish_non_exhaustive()
    }
}

impl BlockPatterns {
    /// Compile a block's pattern list. A leading `!` marks an exclude.
    pub fn compile(patterns: &[String]) -> Result<Self> {
        let (excludes, includes): (Vec<String>, Vec<String>) = patterns
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .partition(|p| p.starts_with('!'));

        let excludes: Vec<String> = excludes
            .into_iter()
            .map(|p| p.trim_start_matches('!').to_string())
            .collect();

        let include_set = build_globset(&includes).context("building include globset")?;
        let exclude_set = if excludes.is_empty() {
            None
        } else {
            Some(build_globset(&excludes).context("building exclude globset")?)
        };

        Ok(Self {
            includes,
            excludes,
            include_set,
            exclude_set,
        })
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }

    /// Returns true if the block cares about `rel_path`.
    ///
    /// With no include pattern this is always false.
    pub fn matches(&self, rel_path: &str) -> bool {
        let rel_path = normalize(rel_path);
        if !self.include_set.is_match(&rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude_set {
            if exclude.is_match(&rel_path) {
                return false;
            }
        }
        true
    }

    /// The ordered subset of `paths` this block cares about, duplicates
    /// removed, input order kept.
    pub fn match_paths<'a, I, S>(&self, paths: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a S>,
        S: AsRef<str> + ?Sized + 'a,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for path in paths {
            let path = normalize(path.as_ref());
            if self.matches(&path) && seen.insert(path.clone()) {
                out.push(path);
            }
        }
        out
    }
}

/// Block-level convenience around [`BlockPatterns::match_paths`].
pub fn match_paths<S: AsRef<str>>(block: &Block, changed: &[S]) -> Vec<String> {
    block.patterns.match_paths(changed)
}

/// Filter applied by the watcher and the initial listing: drop common
/// excludes, keep paths that at least one block includes.
#[derive(Clone)]
pub struct WatchFilter {
    blocks: Vec<BlockPatterns>,
    common: Option<GlobSet>,
}

impl fmt::Debug for WatchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchFilter")
            .field("blocks", &self.blocks.len())
            .field("common_excludes", &self.common.is_some())
            .finish()
    }
}

impl WatchFilter {
    pub fn new(blocks: Vec<BlockPatterns>, common_excludes: bool) -> Result<Self> {
        let common = if common_excludes {
            let pats: Vec<String> = COMMON_EXCLUDES.iter().map(|s| s.to_string()).collect();
            Some(build_globset(&pats).context("building common exclude globset")?)
        } else {
            None
        };
        Ok(Self { blocks, common })
    }

    pub fn from_config(cfg: &crate::config::Config) -> Result<Self> {
        Self::new(
            cfg.blocks.iter().map(|b| b.patterns.clone()).collect(),
            cfg.settings.common_excludes,
        )
    }

    /// True if `rel_path` is under a common exclude.
    pub fn is_ignored(&self, rel_path: &str) -> bool {
        match &self.common {
            Some(set) => set.is_match(normalize(rel_path)),
            None => false,
        }
    }

    /// True if some block could be interested in `rel_path`.
    pub fn is_relevant(&self, rel_path: &str) -> bool {
        !self.is_ignored(rel_path) && self.blocks.iter().any(|b| b.matches(rel_path))
    }
}

/// Normalize a path for matching: forward slashes, no leading `./`.
pub fn normalize(path: &str) -> String {
    let mut s = path.replace('\\', "/");
    while let Some(rest) = s.strip_prefix("./") {
        s = rest.to_string();
    }
    s
}

/// Build a GlobSet where `*` does not cross `/`.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = GlobBuilder::new(pat)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
