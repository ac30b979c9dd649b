// src/config/mod.rs

//! Configuration loading and validation for prepwatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model and the validated `Config` (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate blocks, variables and settings (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, parse_str, DEFAULT_CONFIG_FILE};
pub use model::{
    Block, BlockConfig, Config, Prep, PrepConfig, RawConfigFile, Settings, SettingsSection,
};
pub use validate::validate_config;
