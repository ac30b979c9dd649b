// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{Config, RawConfigFile};
use crate::errors::Result;

/// Default config file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "prepwatch.toml";

/// Parse raw TOML text. No semantic validation.
pub fn parse_str(contents: &str) -> Result<RawConfigFile> {
    Ok(toml::from_str(contents)?)
}

/// Load a configuration file from a given path and return the raw file.
///
/// This only performs TOML deserialization; use [`load_and_validate`] to
/// also validate and compile patterns.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    parse_str(&contents)
}

/// Load, validate and compile a configuration file.
///
/// `@confdir` in commands resolves to the directory holding the file.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let raw = load_from_path(path)?;
    let config = Config::try_from(raw)?;
    Ok(config.with_config_dir(config_dir_of(path)))
}

/// Directory holding `path`, or `.` for a bare file name.
pub fn config_dir_of(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
