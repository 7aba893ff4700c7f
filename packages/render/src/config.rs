use anyhow::Context;
use mailforge_common::RenderOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "mailforge.config.json";

/// Mailforge project configuration file format
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Options every render starts from; request options override them
    pub render: RenderOptions,

    pub history: HistoryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryConfig {
    /// Undo levels kept by the editor; 0 keeps every level
    pub max_levels: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_levels: 100 }
    }
}

impl Config {
    /// Load config from a directory; a missing file yields the defaults
    pub fn load(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            Self::from_json(&content).with_context(|| format!("Invalid config in {}", config_path.display()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
