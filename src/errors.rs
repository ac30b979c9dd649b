// src/errors.rs

//! Crate-wide error types.
//!
//! - [`PrepwatchError`] covers loading config and starting up.
//! - [`PrepError`] is the block-scoped failure of a prep sequence. Every
//!   variant is handled by the dispatch loop; none of them stop it.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrepwatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Watch error: {0}")]
    WatchError(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure while expanding a command template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("no such variable: @{0}")]
    UnknownVariable(String),
}

/// Why a block's prep sequence stopped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrepError {
    /// The block asked for a shell that is unknown or not installed.
    #[error("{message}")]
    Config { message: String },

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// The command could not be started at all.
    #[error("could not run command: {message}")]
    Launch { message: String },

    /// The command ran and exited unsuccessfully.
    #[error("{summary}")]
    Process { summary: String, output: String },
}

impl PrepError {
    /// Captured error output, only present for process failures.
    pub fn output(&self) -> Option<&str> {
        match self {
            PrepError::Process { output, .. } => Some(output),
            _ => None,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PrepwatchError>;
