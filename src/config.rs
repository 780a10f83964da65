//! Editor configuration
//!
//! Loaded from JSON. Every section is optional and falls back to its
//! defaults; unknown keys are rejected so typos do not go unnoticed.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::runtime::RunnerConfig;
use crate::storage::StorageKeys;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub runner: RunnerConfig,
    pub storage: StorageKeys,
    /// Write the autosave slot on every workspace edit
    pub autosave: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            runner: RunnerConfig::default(),
            storage: StorageKeys::default(),
            autosave: true,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Override the run time limit
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.runner.timeout_secs = secs;
        self
    }
}
