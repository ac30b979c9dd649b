// src/engine/core.rs

//! Pure dispatch planning.
//!
//! Given the config and a batch, decide which blocks run and with which
//! files. No Tokio, no processes, no filesystem; the runner executes the
//! resulting plan in order.

use crate::config::Config;
use crate::watch::ChangeBatch;

/// One block to run, with the part of the batch it matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRun {
    /// Index into `Config::blocks`.
    pub index: usize,
    pub batch: ChangeBatch,
}

/// Ordered list of block runs for one dispatch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchPlan {
    pub initial: bool,
    pub runs: Vec<BlockRun>,
}

impl DispatchPlan {
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn block_indices(&self) -> Vec<usize> {
        self.runs.iter().map(|r| r.index).collect()
    }
}

/// Plan the initial dispatch.
///
/// Every block runs, in declaration order, whether or not any existing file
/// matches it. Each block still only sees the existing files it includes.
/// This stays a separate branch from [`plan_batch`]: folding the two
/// together would make blocks with no matching files skip their startup run.
pub fn plan_initial(config: &Config, listing: &ChangeBatch) -> DispatchPlan {
    let runs = config
        .blocks
        .iter()
        .enumerate()
        .map(|(index, block)| BlockRun {
            index,
            batch: listing.filter(&block.patterns),
        })
        .collect();

    DispatchPlan {
        initial: true,
        runs,
    }
}

/// Plan a dispatch for a change batch: the blocks with a non-empty match,
/// in declaration order.
pub fn plan_batch(config: &Config, batch: &ChangeBatch) -> DispatchPlan {
    let runs = config
        .blocks
        .iter()
        .enumerate()
        .filter_map(|(index, block)| {
            let matched = batch.filter(&block.patterns);
            (!matched.is_empty()).then_some(BlockRun {
                index,
                batch: matched,
            })
        })
        .collect();

    DispatchPlan {
        initial: false,
        runs,
    }
}
