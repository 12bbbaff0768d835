//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`:
//!
//! ```yaml
//! fee: "1eth"          # or a decimal wei string such as "500000000000000000"
//! min_age: 18
//! state_file: .sreg/ledger.json
//! ```
//!
//! Every key is optional. `fee` and `min_age` only matter at `deploy`; after
//! that they live in the state file with the registry.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use sreg_core::Wei;
use sreg_state::RegistryConfig;

/// State file used when neither `--state` nor `state_file` is given.
pub const DEFAULT_STATE_FILE: &str = ".sreg/ledger.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub fee: Option<Wei>,
    pub min_age: Option<u8>,
    pub state_file: Option<PathBuf>,
}

impl CliConfig {
    /// Load from `path`, or return the empty configuration when no file was
    /// given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            bail!("config file not found: {}", path.display());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("failed to parse config YAML: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document parses as unit, not as a mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Deployment parameters, with defaults for unset keys.
    pub fn registry_config(&self) -> Result<RegistryConfig> {
        let defaults = RegistryConfig::default();
        let config = RegistryConfig {
            fee: self.fee.unwrap_or(defaults.fee),
            min_age: self.min_age.unwrap_or(defaults.min_age),
        };
        config.validate()?;
        Ok(config)
    }

    /// `--state` wins over `state_file`, which wins over the default.
    pub fn state_path(&self, cli_override: Option<&Path>) -> PathBuf {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.state_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE))
    }
}
