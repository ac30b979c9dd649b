// src/config/validate.rs

use std::collections::BTreeMap;
use std::path::{Component, Path};

use crate::config::model::RawConfigFile;
use crate::errors::{PrepwatchError, Result};
use crate::render::{is_reserved_var, is_valid_var_name};
use crate::types::{Shell, SHELL_VAR};

/// Run semantic validation against a raw configuration.
///
/// This checks:
/// - there is at least one block, and every block has patterns and preps
/// - every block has at least one include pattern
/// - `settle_ms >= 1`
/// - variable names are well formed and do not shadow built-in tokens
/// - a `shell` variable, if set, names a known shell
/// - `in_dir` stays inside the watch root
///
/// It does **not** check that the shell is installed; that happens each time
/// a block runs. Glob syntax is checked when patterns are compiled.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_blocks(cfg)?;
    validate_settings(cfg)?;
    validate_vars("[vars]", &cfg.vars)?;
    validate_blocks(cfg)?;
    Ok(())
}

fn ensure_has_blocks(cfg: &RawConfigFile) -> Result<()> {
    if cfg.block.is_empty() {
        return Err(config_error(
            "config must contain at least one [[block]] section",
        ));
    }
    Ok(())
}

fn validate_settings(cfg: &RawConfigFile) -> Result<()> {
    if cfg.settings.settle_ms == 0 {
        return Err(config_error("[settings].settle_ms must be >= 1 (got 0)"));
    }
    Ok(())
}

fn validate_blocks(cfg: &RawConfigFile) -> Result<()> {
    for (idx, block) in cfg.block.iter().enumerate() {
        let name = format!("block #{}", idx + 1);

        if block.patterns.is_empty() {
            return Err(config_error(format!("{name} has no patterns")));
        }
        let has_include = block
            .patterns
            .iter()
            .map(|p| p.trim())
            .any(|p| !p.is_empty() && !p.starts_with('!'));
        if !has_include {
            return Err(config_error(format!(
                "{name} has only exclude patterns and would never match"
            )));
        }
        if block.prep.is_empty() {
            return Err(config_error(format!("{name} has no [[block.prep]] entries")));
        }
        if let Some(p) = block.prep.iter().find(|p| p.cmd.trim().is_empty()) {
            return Err(config_error(format!(
                "{name} has an empty prep command (onchange = {})",
                p.onchange
            )));
        }

        validate_vars(&name, &block.vars)?;

        if let Some(dir) = &block.in_dir {
            let escapes = Path::new(dir)
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
            if escapes {
                return Err(config_error(format!(
                    "{name}: in_dir '{dir}' must be a relative path inside the watch root"
                )));
            }
        }
    }
    Ok(())
}

fn validate_vars(scope: &str, vars: &BTreeMap<String, String>) -> Result<()> {
    for (key, value) in vars {
        if !is_valid_var_name(key) {
            return Err(config_error(format!(
                "{scope}: invalid variable name '{key}'"
            )));
        }
        if is_reserved_var(key) {
            return Err(config_error(format!(
                "{scope}: variable '{key}' is built in and cannot be set"
            )));
        }
        if key == SHELL_VAR {
            Shell::resolve(Some(value))
                .map_err(|e| config_error(format!("{scope}: {e}")))?;
        }
    }
    Ok(())
}

fn config_error(msg: impl Into<String>) -> PrepwatchError {
    PrepwatchError::ConfigError(msg.into())
}
