use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("invalid yaml options: {0}")]
    Yaml(String),
    #[error("invalid json options: {0}")]
    Json(String),
}

/// Tunables for the engine. Defaults match the observed behavior: settle
/// after 500 ms of quiet typing, hold the dropdown 200 ms past a blur, and
/// leave the typed text in place on Escape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub debounce_ms: u64,
    pub blur_grace_ms: u64,
    pub escape_clears_query: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            blur_grace_ms: 200,
            escape_clears_query: false,
        }
    }
}

impl SearchOptions {
    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn grace_delay(&self) -> Duration {
        Duration::from_millis(self.blur_grace_ms)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(|err| ConfigError::Yaml(err.to_string()))
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|err| ConfigError::Json(err.to_string()))
    }
}
