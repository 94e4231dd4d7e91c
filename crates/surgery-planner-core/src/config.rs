//! Planner configuration.
//!
//! ```json
//! {
//!   "sessions": { "morning_rooms": 2, "afternoon_rooms": 1, "max_per_room": 3 },
//!   "model_path": "priority_model.json",
//!   "registry_path": "planner.db"
//! }
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{InvalidConfigError, SessionConfig};

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid session configuration: {0}")]
    Sessions(#[from] InvalidConfigError),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlannerConfig {
    /// Default room counts used by `plan`
    pub sessions: SessionConfig,
    /// Tree-ensemble artifact for the priority classifier; unset leaves it unloaded
    pub model_path: Option<PathBuf>,
    /// SQLite file backing the registry; unset keeps it in memory
    pub registry_path: Option<PathBuf>,
}

impl PlannerConfig {
    /// Parse and check a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.sessions.capacity()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }
}
