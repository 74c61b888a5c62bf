//! Engine and server configuration.
//!
//! [`EngineConfig`] carries the knobs the core reads; [`ServerConfig`] is the
//! TOML file `saiserver` loads, with an `[engine]` and a `[server]` section.
//! Every field has a serde default, so a partial file (or none) is valid.

use crate::bulk::BulkMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default location of the server configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/sonic/saiserver.toml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Knobs of the object engine and its decision engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Bucket count of a fine-grained ECMP group created without
    /// `CONFIGURED_SIZE`.
    #[serde(default = "default_fine_grained_size")]
    pub fine_grained_default_size: u32,

    /// Seed mixed into flow hashes computed by the forwarding pipeline.
    #[serde(default = "default_flow_hash_seed")]
    pub flow_hash_seed: u64,

    /// Failure policy of bulk requests that do not name one.
    #[serde(default = "default_bulk_mode")]
    pub default_bulk_mode: BulkMode,

    /// Upper bound on live objects; creates beyond it fail with `TableFull`.
    #[serde(default = "default_max_objects")]
    pub max_objects: usize,
}

/// Request server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Requests executed concurrently.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Log filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Complete `saiserver` configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub server: ServerSettings,
}

fn default_fine_grained_size() -> u32 {
    64
}

fn default_flow_hash_seed() -> u64 {
    0x5341_4956_5348_4153
}

fn default_bulk_mode() -> BulkMode {
    BulkMode::StopOnError
}

fn default_max_objects() -> usize {
    1 << 20
}

fn default_workers() -> usize {
    4
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fine_grained_default_size: default_fine_grained_size(),
            flow_hash_seed: default_flow_hash_seed(),
            default_bulk_mode: default_bulk_mode(),
            max_objects: default_max_objects(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            log_level: default_log_level(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fine_grained_default_size == 0 {
            return Err(ConfigError::Invalid(
                "fine_grained_default_size must be > 0".to_string(),
            ));
        }
        if self.max_objects == 0 {
            return Err(ConfigError::Invalid("max_objects must be > 0".to_string()));
        }
        Ok(())
    }
}

impl ServerConfig {
    /// Loads configuration from `path`, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Config file {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::Io(e)),
        }
    }

    /// Loads from [`DEFAULT_CONFIG_PATH`] or defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_or_default(DEFAULT_CONFIG_PATH)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        if self.server.workers == 0 {
            return Err(ConfigError::Invalid("workers must be > 0".to_string()));
        }
        Ok(())
    }
}
