// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::config::DEFAULT_CONFIG_FILE;

/// Command-line arguments for `prepwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "prepwatch",
    version,
    about = "Run command blocks whenever the files they watch change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// The directory holding it is the watch root.
    #[arg(short = 'f', long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Run the initial preps once and exit, without watching.
    #[arg(short = 'p', long)]
    pub prep_only: bool,

    /// Send a desktop notification when a prep command fails.
    #[arg(short = 'n', long)]
    pub notify: bool,

    /// Ring the terminal bell when a prep command fails.
    #[arg(short = 'b', long)]
    pub bell: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PREPWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the blocks, but don't run any commands.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the common exclude patterns and exit.
    #[arg(long)]
    pub ignores: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
