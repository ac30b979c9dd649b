// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod log_sink;
pub mod logging;
pub mod notifier;
pub mod render;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::{config_dir_of, load_and_validate};
use crate::config::Config;
use crate::engine::{DispatchContext, DispatchEvent, PrepSequencer, Runner, RunnerOptions};
use crate::exec::ShellExecutor;
use crate::fs::{FileSystem, RealFileSystem};
use crate::log_sink::TracingLog;
use crate::notifier::{BellNotifier, CommandNotifier, Notifiers};
use crate::watch::{WatchFilter, COMMON_EXCLUDES};

/// Capacity of the channel between the watcher and the dispatch loop.
const DISPATCH_CHANNEL_CAPACITY: usize = 64;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - log sink and notifiers
/// - the dispatch loop with the real shell executor
/// - (optional) file watcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    if args.ignores {
        print_ignores();
        return Ok(());
    }

    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)
        .with_context(|| format!("loading config from {:?}", config_path))?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let root = watch_root(&config_path);
    let cfg = Arc::new(cfg);
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    let ctx = DispatchContext::new(root.clone(), Arc::new(TracingLog), build_notifiers(&args));
    let sequencer = PrepSequencer::new(ctx, Arc::new(ShellExecutor), cfg.config_dir.clone());

    let (tx, rx) = mpsc::channel::<DispatchEvent>(DISPATCH_CHANNEL_CAPACITY);

    // Register the watch before the initial run so changes made by the
    // initial preps are picked up.
    let _watcher_handle = if !args.prep_only {
        let filter = WatchFilter::from_config(&cfg)?;
        Some(
            crate::watch::spawn_watcher(
                root.clone(),
                filter,
                tx.clone(),
                Duration::from_millis(cfg.settings.settle_ms),
                Arc::clone(&fs),
            )
            .with_context(|| format!("watching {:?}", root))?,
        )
    } else {
        None
    };

    // Ctrl-C → graceful shutdown.
    {
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(DispatchEvent::Shutdown).await;
        });
    }

    let options = RunnerOptions {
        prep_only: args.prep_only,
    };

    info!(root = ?root, blocks = cfg.blocks.len(), "starting prepwatch");
    let runner = Runner::new(cfg, sequencer, fs, rx, options);
    runner.run().await?;
    Ok(())
}

fn build_notifiers(args: &CliArgs) -> Notifiers {
    let mut notifiers = Notifiers::new();
    if args.bell {
        notifiers.add(Arc::new(BellNotifier));
    }
    if args.notify {
        match CommandNotifier::detect() {
            Some(n) => notifiers.add(Arc::new(n)),
            None => tracing::warn!("--notify given but no desktop notifier was found"),
        }
    }
    notifiers
}

/// The watch root is the directory holding the config file.
///
/// A bare file name like "prepwatch.toml" means the current directory.
fn watch_root(config_path: &Path) -> PathBuf {
    let dir = config_dir_of(config_path);
    if dir == Path::new(".") {
        std::env::current_dir().unwrap_or(dir)
    } else {
        dir
    }
}

fn print_ignores() {
    for pattern in COMMON_EXCLUDES {
        println!("{pattern}");
    }
}

/// Simple dry-run output: print settings, vars and blocks.
fn print_dry_run(cfg: &Config) {
    println!("prepwatch dry-run");
    println!("  settings.settle_ms = {}", cfg.settings.settle_ms);
    println!("  settings.common_excludes = {}", cfg.settings.common_excludes);
    if !cfg.vars.is_empty() {
        println!("  vars: {:?}", cfg.vars);
    }
    println!();

    println!("blocks ({}):", cfg.blocks.len());
    for block in &cfg.blocks {
        println!("  - {}", block.label);
        if !block.patterns.excludes().is_empty() {
            println!("      exclude: {:?}", block.patterns.excludes());
        }
        if let Some(dir) = &block.in_dir {
            println!("      in_dir: {}", dir.display());
        }
        if !block.vars.is_empty() {
            println!("      vars: {:?}", block.vars);
        }
        for prep in &block.preps {
            let marker = if prep.onchange { " (onchange)" } else { "" };
            println!("      prep{marker}: {}", prep.command);
        }
    }

    debug!("dry-run complete (no execution)");
}
