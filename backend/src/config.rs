//! # Configuration
//!
//! Application configuration loaded from a YAML file. Every field has a
//! default, so a missing file or a partial file is valid.
//!
//! ```yaml
//! server:
//!   bind_address: "127.0.0.1:3000"
//!   data_directory: "./data"
//!   allowed_origin: "http://localhost:8080"
//! calendar:
//!   min_date: "2024-06-01"
//!   max_date: "2025-06-01"
//!   max_advance_days: 365
//!   checkout_only_policy: block_check_in
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::domain::classifier::{BookingRules, CheckoutOnlyPolicy, SelectionBounds};

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "BOOKING_CALENDAR_CONFIG";
/// Config file used when the environment variable is unset
pub const DEFAULT_CONFIG_FILE: &str = "booking_calendar.yaml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("calendar.min_date {min} is after calendar.max_date {max}")]
    InvalidBounds { min: NaiveDate, max: NaiveDate },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub calendar: CalendarConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub data_directory: PathBuf,
    /// Origin allowed by CORS (the host page serving the calendar)
    pub allowed_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            data_directory: PathBuf::from("./data"),
            allowed_origin: "http://localhost:8080".to_string(),
        }
    }
}

/// Booking rules applied by every calendar built from this config
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    /// Furthest bookable day, counted from today
    pub max_advance_days: Option<u32>,
    pub checkout_only_policy: CheckoutOnlyPolicy,
}

impl CalendarConfig {
    /// Resolve the rules for a given today; the tighter maximum wins
    pub fn rules(&self, today: NaiveDate) -> BookingRules {
        BookingRules {
            bounds: SelectionBounds::new(self.min_date, self.max_date)
                .with_max_advance(today, self.max_advance_days),
            checkout_only_policy: self.checkout_only_policy,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match (self.min_date, self.max_date) {
            (Some(min), Some(max)) if min > max => Err(ConfigError::InvalidBounds { min, max }),
            _ => Ok(()),
        }
    }
}

impl AppConfig {
    /// Load config from a YAML file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.calendar.validate()?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load config from `$BOOKING_CALENDAR_CONFIG`, falling back to `booking_calendar.yaml`
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load(&path)
    }
}
