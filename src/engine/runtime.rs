// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::{PrepError, Result};
use crate::fs::FileSystem;
use crate::watch::{initial_batch, ChangeBatch, WatchFilter};

use super::core::{plan_batch, plan_initial, DispatchPlan};
use super::prep::PrepSequencer;
use super::{DispatchEvent, RunnerOptions};

/// The dispatch loop.
///
/// Runs the initial dispatch once, then consumes `DispatchEvent`s until a
/// shutdown request or until the channel closes. Every batch is fully
/// dispatched (all matching blocks, all their preps) before the next event
/// is read, so a shutdown never interrupts a running block.
pub struct Runner {
    config: Arc<Config>,
    sequencer: PrepSequencer,
    fs: Arc<dyn FileSystem>,
    event_rx: mpsc::Receiver<DispatchEvent>,
    options: RunnerOptions,
}

impl fmt::Debug for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("blocks", &self.config.blocks.len())
            .field("sequencer", &self.sequencer)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Runner {
    pub fn new(
        config: Arc<Config>,
        sequencer: PrepSequencer,
        fs: Arc<dyn FileSystem>,
        event_rx: mpsc::Receiver<DispatchEvent>,
        options: RunnerOptions,
    ) -> Self {
        Self {
            config,
            sequencer,
            fs,
            event_rx,
            options,
        }
    }

    /// Initial dispatch, then the watch loop.
    pub async fn run(mut self) -> Result<()> {
        info!(blocks = self.config.blocks.len(), "prepwatch runner started");

        let filter = WatchFilter::from_config(&self.config)?;
        let listing = initial_batch(
            self.fs.as_ref(),
            &self.sequencer.context().root,
            &filter,
        )?;
        self.dispatch_initial(&listing).await;

        if self.options.prep_only {
            info!("initial run complete; exiting (prep-only)");
            return Ok(());
        }

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("dispatch channel closed; exiting");
                    break;
                }
            };

            match event {
                DispatchEvent::Batch(batch) => self.dispatch_batch(batch).await,
                DispatchEvent::Shutdown => {
                    info!("shutdown requested; stopping runner");
                    break;
                }
            }
        }

        info!("runner exiting");
        Ok(())
    }

    /// Run every block once against the files that already exist.
    pub async fn dispatch_initial(&self, listing: &ChangeBatch) {
        let plan = plan_initial(&self.config, listing);
        self.execute(plan).await;
    }

    /// Run the blocks matching `batch`. The batch is dropped afterwards.
    pub async fn dispatch_batch(&self, batch: ChangeBatch) {
        debug!(paths = batch.len(), "dispatching change batch");
        let plan = plan_batch(&self.config, &batch);
        if plan.is_empty() {
            debug!("no block matched change batch");
            return;
        }
        self.execute(plan).await;
    }

    /// Run the planned blocks in order. A failing block is logged and the
    /// next one runs anyway.
    async fn execute(&self, plan: DispatchPlan) {
        for run in plan.runs {
            let block = &self.config.blocks[run.index];
            let vars = self.config.vars_for(block);

            match self
                .sequencer
                .run_preps(block, &vars, Some(&run.batch), plan.initial)
                .await
            {
                Ok(()) => debug!(block = %block.label, "block finished"),
                Err(err) => {
                    warn!(block = %block.label, error = %err, "block failed");
                    // Process failures are shouted by the executor itself.
                    if !matches!(err, PrepError::Process { .. }) {
                        self.sequencer
                            .context()
                            .log
                            .shout(&format!("{}: {err}", block.label));
                    }
                }
            }
        }
    }
}
