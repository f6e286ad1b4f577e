//! Configuration System
//!
//! Loads `ledgerfs.toml` from an explicit path, the current directory, or the
//! user config directory. Transport credentials are stored encrypted and only
//! usable together with the `--secret` key.

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("configuration error: {0}")]
    Invalid(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerfsConfig {
    /// Durable queue settings; absent means in-memory only.
    #[serde(default)]
    pub transport: Option<TransportConfig>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Durable queue connection settings.
///
/// `encrypted_addr` and `encrypted_password` are hex ciphertexts produced by
/// [`crate::crypto::encrypt`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    pub encrypted_addr: String,

    #[serde(default)]
    pub encrypted_password: Option<String>,

    /// Redis database index.
    #[serde(default)]
    pub db: i64,

    /// Queue key the event log appends to.
    #[serde(default = "default_queue_key")]
    pub queue_key: String,
}

fn default_queue_key() -> String {
    crate::event::EVENTS_KEY.to_string()
}

impl LedgerfsConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist and parse. Otherwise `./ledgerfs.toml`
    /// is tried, then `<config dir>/ledgerfs/ledgerfs.toml`; if neither
    /// exists, defaults are returned.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        for candidate in Self::default_locations() {
            if candidate.exists() {
                return Self::load_from_file(&candidate);
            }
        }
        Ok(Self::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: LedgerfsConfig =
            toml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    fn default_locations() -> Vec<PathBuf> {
        let mut locations = vec![PathBuf::from("ledgerfs.toml")];
        if let Some(dirs) = directories::ProjectDirs::from("", "", "ledgerfs") {
            locations.push(dirs.config_dir().join("ledgerfs.toml"));
        }
        locations
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(transport) = &self.transport {
            if transport.encrypted_addr.is_empty() {
                return Err(ConfigError::Invalid(
                    "transport.encrypted_addr must not be empty".to_string(),
                ));
            }
            if transport.queue_key.is_empty() {
                return Err(ConfigError::Invalid(
                    "transport.queue_key must not be empty".to_string(),
                ));
            }
        }
        self.logging.validate().map_err(ConfigError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_transport() {
        let config = LedgerfsConfig::default();
        assert!(config.transport.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parses_full_config() {
        let raw = r#"
            [transport]
            encrypted_addr = "0a0b"
            encrypted_password = "0c0d"
            db = 2

            [logging]
            level = "debug"
            format = "json"
        "#;
        let config: LedgerfsConfig = toml::from_str(raw).unwrap();
        let transport = config.transport.unwrap();
        assert_eq!(transport.encrypted_addr, "0a0b");
        assert_eq!(transport.db, 2);
        assert_eq!(transport.queue_key, crate::event::EVENTS_KEY);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn empty_addr_fails_validation() {
        let config = LedgerfsConfig {
            transport: Some(TransportConfig {
                encrypted_addr: String::new(),
                encrypted_password: None,
                db: 0,
                queue_key: default_queue_key(),
            }),
            logging: LoggingConfig::default(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_files_fall_back_to_defaults() {
        let config = LedgerfsConfig::load(None);
        // Loading may pick up a real config on a developer machine, but must
        // not error when nothing exists.
        assert!(config.is_ok());
    }
}
