// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::validate::validate_config;
use crate::errors::PrepwatchError;
use crate::watch::patterns::BlockPatterns;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [settings]
/// settle_ms = 100
///
/// [vars]
/// shell = "bash"
///
/// [[block]]
/// patterns = ["src/**/*.rs", "!src/generated/**"]
///
/// [[block.prep]]
/// cmd = "cargo test @mods"
/// onchange = true
/// ```
///
/// This is the raw, unvalidated shape. Convert it into a [`Config`] with
/// `Config::try_from`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub settings: SettingsSection,

    /// Process-wide variables, visible to every block.
    #[serde(default)]
    pub vars: BTreeMap<String, String>,

    /// Blocks in declaration order (`[[block]]`).
    #[serde(default)]
    pub block: Vec<BlockConfig>,
}

/// `[settings]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsSection {
    /// Quiet period (milliseconds) that closes a batch of filesystem events.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Skip VCS directories, `node_modules` and editor temp files.
    #[serde(default = "default_common_excludes")]
    pub common_excludes: bool,
}

fn default_settle_ms() -> u64 {
    100
}

fn default_common_excludes() -> bool {
    true
}

impl Default for SettingsSection {
    fn default() -> Self {
        Self {
            settle_ms: default_settle_ms(),
            common_excludes: default_common_excludes(),
        }
    }
}

/// `[[block]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockConfig {
    /// Glob patterns; a leading `!` marks an exclude.
    pub patterns: Vec<String>,

    /// Commands, run in order (`[[block.prep]]`).
    #[serde(default)]
    pub prep: Vec<PrepConfig>,

    /// Block-scoped variables; these win over `[vars]`.
    #[serde(default)]
    pub vars: BTreeMap<String, String>,

    /// Working directory for the block's commands, relative to the watch root.
    #[serde(default)]
    pub in_dir: Option<String>,
}

/// `[[block.prep]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrepConfig {
    pub cmd: String,

    /// Skip this command during the initial run.
    #[serde(default)]
    pub onchange: bool,
}

/// A single command in a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prep {
    pub command: String,
    pub onchange: bool,
}

/// A validated block: compiled patterns plus its ordered preps.
#[derive(Debug, Clone)]
pub struct Block {
    /// Short label (the pattern list) used in logs and notifications.
    pub label: String,
    pub patterns: BlockPatterns,
    pub preps: Vec<Prep>,
    pub vars: BTreeMap<String, String>,
    pub in_dir: Option<PathBuf>,
}

/// Global settings after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub settle_ms: u64,
    pub common_excludes: bool,
}

/// Validated, immutable configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    pub vars: BTreeMap<String, String>,
    pub blocks: Vec<Block>,
    /// Directory holding the config file; exposed to commands as `@confdir`.
    pub config_dir: PathBuf,
}

impl Config {
    /// Variables for `block`: `[vars]` overlaid with the block's own.
    pub fn vars_for(&self, block: &Block) -> BTreeMap<String, String> {
        let mut vars = self.vars.clone();
        vars.extend(block.vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        vars
    }

    pub fn with_config_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config_dir = dir.as_ref().to_path_buf();
        self
    }
}

impl TryFrom<RawConfigFile> for Config {
    type Error = PrepwatchError;

    fn try_from(raw: RawConfigFile) -> Result<Self, Self::Error> {
        validate_config(&raw)?;

        let mut blocks = Vec::with_capacity(raw.block.len());
        for (idx, b) in raw.block.into_iter().enumerate() {
            let patterns = BlockPatterns::compile(&b.patterns).map_err(|e| {
                PrepwatchError::ConfigError(format!("block #{}: {e:#}", idx + 1))
            })?;

            blocks.push(Block {
                label: b.patterns.join(" "),
                patterns,
                preps: b
                    .prep
                    .into_iter()
                    .map(|p| Prep {
                        command: p.cmd,
                        onchange: p.onchange,
                    })
                    .collect(),
                vars: b.vars,
                in_dir: b.in_dir.map(PathBuf::from),
            });
        }

        Ok(Config {
            settings: Settings {
                settle_ms: raw.settings.settle_ms,
                common_excludes: raw.settings.common_excludes,
            },
            vars: raw.vars,
            blocks,
            config_dir: PathBuf::from("."),
        })
    }
}
