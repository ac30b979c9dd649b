// src/engine/prep.rs

//! Runs one block's preps in order.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::Block;
use crate::engine::DispatchContext;
use crate::errors::PrepError;
use crate::exec::Executor;
use crate::render::render;
use crate::types::{Shell, SHELL_VAR};
use crate::watch::ChangeBatch;

/// Title of the notification pushed when a prep command fails.
pub const NOTIFY_TITLE: &str = "prepwatch error";

/// Executes a block's prep commands, one after the other.
pub struct PrepSequencer {
    ctx: DispatchContext,
    executor: Arc<dyn Executor>,
    config_dir: PathBuf,
}

impl std::fmt::Debug for PrepSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrepSequencer")
            .field("root", &self.ctx.root)
            .field("config_dir", &self.config_dir)
            .finish_non_exhaustive()
    }
}

impl PrepSequencer {
    pub fn new(ctx: DispatchContext, executor: Arc<dyn Executor>, config_dir: impl Into<PathBuf>) -> Self {
        Self {
            ctx,
            executor,
            config_dir: config_dir.into(),
        }
    }

    pub fn context(&self) -> &DispatchContext {
        &self.ctx
    }

    /// Run every prep of `block` in declared order.
    ///
    /// - The shell comes from `vars["shell"]`; an unknown or missing shell
    ///   fails before anything runs.
    /// - `@mods` expands to `batch.all()`, or nothing without a batch.
    /// - During the initial run, `onchange` preps are logged as skipped and
    ///   do not count as failures.
    /// - The first render or command failure stops the block. A failed
    ///   command also notifies every notifier with its captured output.
    pub async fn run_preps(
        &self,
        block: &Block,
        vars: &BTreeMap<String, String>,
        batch: Option<&ChangeBatch>,
        initial: bool,
    ) -> Result<(), PrepError> {
        let shell = resolve_shell(vars)?;
        let modified = batch.map(ChangeBatch::all).unwrap_or_default();
        let dir = self.work_dir(block);

        for prep in &block.preps {
            let cmd = render(&prep.command, vars, &modified, &self.config_dir)?;

            if initial && prep.onchange {
                self.ctx.log.say(&format!("skipping prep: {cmd}"));
                continue;
            }

            debug!(block = %block.label, cmd = %cmd, "running prep");
            if let Err(err) = self
                .executor
                .run(&cmd, shell, &dir, self.ctx.log.as_ref())
                .await
            {
                if let PrepError::Process { output, .. } = &err {
                    warn!(block = %block.label, cmd = %cmd, error = %err, "prep command failed");
                    self.ctx.notifiers.push_all(NOTIFY_TITLE, output, "");
                }
                return Err(err);
            }
        }

        Ok(())
    }

    fn work_dir(&self, block: &Block) -> PathBuf {
        match &block.in_dir {
            Some(dir) if dir != Path::new(".") => self.ctx.root.join(dir),
            _ => self.ctx.root.clone(),
        }
    }
}

fn resolve_shell(vars: &BTreeMap<String, String>) -> Result<Shell, PrepError> {
    let shell = Shell::resolve(vars.get(SHELL_VAR).map(String::as_str))
        .map_err(|message| PrepError::Config { message })?;
    shell
        .ensure_installed()
        .map_err(|message| PrepError::Config { message })?;
    Ok(shell)
}
