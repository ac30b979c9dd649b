// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Compiling each block's include/exclude glob patterns and matching
//!   changed paths against them.
//! - Wiring up a cross-platform filesystem watcher (`notify`) and
//!   coalescing bursts of raw events into [`ChangeBatch`]es.
//! - Listing the files that already exist, for the initial run.
//!
//! It does **not** run commands; it only turns filesystem state into
//! batches for the dispatch loop.

pub mod batch;
pub mod listing;
pub mod path_utils;
pub mod patterns;
pub mod watcher;

pub use batch::{BatchBuilder, ChangeBatch, RawChange};
pub use listing::{initial_batch, list_files};
pub use patterns::{match_paths, normalize, BlockPatterns, WatchFilter, COMMON_EXCLUDES};
pub use watcher::{spawn_watcher, WatcherHandle};
