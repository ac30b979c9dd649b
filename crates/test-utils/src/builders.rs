#![allow(dead_code)]

use prepwatch::config::{BlockConfig, Config, PrepConfig, RawConfigFile};

/// Builder for `Config` to simplify test setup.
pub struct ConfigBuilder {
    config: RawConfigFile,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn with_block(mut self, block: BlockConfig) -> Self {
        self.config.block.push(block);
        self
    }

    pub fn with_var(mut self, name: &str, value: &str) -> Self {
        self.config.vars.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_settle_ms(mut self, ms: u64) -> Self {
        self.config.settings.settle_ms = ms;
        self
    }

    pub fn with_common_excludes(mut self, val: bool) -> Self {
        self.config.settings.common_excludes = val;
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> Config {
        Config::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `BlockConfig`.
pub struct BlockBuilder {
    block: BlockConfig,
}

impl BlockBuilder {
    pub fn new(pattern: &str) -> Self {
        Self {
            block: BlockConfig {
                patterns: vec![pattern.to_string()],
                prep: vec![],
                vars: Default::default(),
                in_dir: None,
            },
        }
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        self.block.patterns.push(pattern.to_string());
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.block.patterns.push(format!("!{pattern}"));
        self
    }

    pub fn prep(mut self, cmd: &str) -> Self {
        self.block.prep.push(PrepConfig {
            cmd: cmd.to_string(),
            onchange: false,
        });
        self
    }

    pub fn onchange(mut self, cmd: &str) -> Self {
        self.block.prep.push(PrepConfig {
            cmd: cmd.to_string(),
            onchange: true,
        });
        self
    }

    pub fn var(mut self, name: &str, value: &str) -> Self {
        self.block.vars.insert(name.to_string(), value.to_string());
        self
    }

    pub fn in_dir(mut self, dir: &str) -> Self {
        self.block.in_dir = Some(dir.to_string());
        self
    }

    pub fn build(self) -> BlockConfig {
        self.block
    }
}
