//! Configuration module for the ledger engine.
//!
//! Loads YAML configuration with defaults suitable for a data directory
//! next to the binary, and validates the venue time zone and close hour.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ledger_engine::config::load_config;
//!
//! // Load from the default path (config.yaml), falling back to defaults.
//! let config = load_config(None)?;
//!
//! // Load from a custom path.
//! let config = load_config(Some("custom/config.yaml"))?;
//! ```

use std::path::PathBuf;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse the YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the ledger files and recordings.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Venue time zone for ledger date/time keys.
    #[serde(default = "default_venue_timezone")]
    pub venue_timezone: String,
    /// Venue-local hour after which the run applies expiry adjustments.
    #[serde(default = "default_close_hour")]
    pub close_hour: u32,
    /// Holiday file; defaults to `<data_dir>/holidays.txt`.
    #[serde(default)]
    pub holidays_file: Option<PathBuf>,
    /// Optional early-close file; half days stay trading days when unset.
    #[serde(default)]
    pub half_days_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            venue_timezone: default_venue_timezone(),
            close_hour: default_close_hour(),
            holidays_file: None,
            half_days_file: None,
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_venue_timezone() -> String {
    "America/New_York".to_string()
}

const fn default_close_hour() -> u32 {
    16
}

impl Config {
    /// Parse the configured venue time zone.
    pub fn venue_tz(&self) -> Result<Tz, ConfigError> {
        self.venue_timezone.parse().map_err(|_| {
            ConfigError::ValidationError(format!(
                "unknown venue time zone '{}'",
                self.venue_timezone
            ))
        })
    }

    /// The holiday file path, explicit or defaulted into the data dir.
    #[must_use]
    pub fn holidays_path(&self) -> PathBuf {
        self.holidays_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("holidays.txt"))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.venue_tz()?;
        if self.close_hour > 23 {
            return Err(ConfigError::ValidationError(format!(
                "close_hour must be 0-23, got {}",
                self.close_hour
            )));
        }
        Ok(())
    }
}

/// Load configuration from a YAML file.
///
/// With an explicit path the file must exist. Without one, `config.yaml` is
/// read when present and built-in defaults apply otherwise.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let config = match path {
        Some(path) => {
            let body =
                std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
                    path: path.to_string(),
                    source,
                })?;
            serde_yaml_bw::from_str(&body)?
        }
        None => match std::fs::read_to_string("config.yaml") {
            Ok(body) => serde_yaml_bw::from_str(&body)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Config::default(),
            Err(source) => {
                return Err(ConfigError::ReadError {
                    path: "config.yaml".to_string(),
                    source,
                });
            }
        },
    };
    config.validate()?;
    Ok(config)
}
