//! Gateway configuration
//!
//! Loaded from a JSON file. Every field is optional; missing fields take the
//! defaults below.
//!
//! ```json
//! {
//!   "data_file": "./records.json",
//!   "allocation_mode": "serialized",
//!   "max_conflict_retries": 8,
//!   "log_level": "warn",
//!   "notify_prefix": "RecordGateway"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::Severity;
use crate::sequence::AllocationMode;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Backing file; `None` keeps everything in memory
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    #[serde(default)]
    pub allocation_mode: AllocationMode,

    /// Counter conflicts tolerated per allocation in serialized mode
    #[serde(default = "default_max_conflict_retries")]
    pub max_conflict_retries: u32,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Prepended to every notification
    #[serde(default = "default_notify_prefix")]
    pub notify_prefix: String,
}

fn default_max_conflict_retries() -> u32 {
    8
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_notify_prefix() -> String {
    "RecordGateway".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            allocation_mode: AllocationMode::default(),
            max_conflict_retries: default_max_conflict_retries(),
            log_level: default_log_level(),
            notify_prefix: default_notify_prefix(),
        }
    }
}

impl GatewayConfig {
    /// Read, parse and validate a config file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    /// Parse and validate config text
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.allocation_mode == AllocationMode::Serialized && self.max_conflict_retries == 0 {
            return Err(ConfigError::Invalid(
                "max_conflict_retries must be at least 1 in serialized mode".to_string(),
            ));
        }
        self.severity()?;
        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> ConfigResult<Severity> {
        self.log_level.parse().map_err(ConfigError::Invalid)
    }

    pub fn with_allocation_mode(mut self, mode: AllocationMode) -> Self {
        self.allocation_mode = mode;
        self
    }

    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = Some(path.into());
        self
    }
}
