//! Engine configuration

use crate::core::history::History;
use serde::{Deserialize, Serialize};

/// Settings applied when an engine is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How many completed evaluations the history keeps
    pub history_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_limit: History::DEFAULT_LIMIT,
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the history limit (clamped to at least one entry)
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    /// Parses a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(json)?;
        config.history_limit = config.history_limit.max(1);
        Ok(config)
    }
}
