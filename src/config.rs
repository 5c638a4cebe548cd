// src/config.rs
use crate::error::ConfigError;
use crate::models::Interval;
use crate::patterns::InvalidBarPolicy;
use crate::source::MAX_LIMIT;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings file looked up in the working directory when no path is given.
pub const DEFAULT_SETTINGS_FILE: &str = "detector";

/// Prefix for environment overrides, e.g. `DETECTOR_SCAN__LIMIT=250`.
pub const ENV_PREFIX: &str = "DETECTOR";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub binance: BinanceSettings,
    pub scan: ScanSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BinanceSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for BinanceSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanSettings {
    pub symbol: String,
    pub interval: Interval,
    pub limit: u16,
    pub refresh_secs: u64,
    pub on_invalid_bar: InvalidBarPolicy,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            symbol: "BTCUSDT".to_string(),
            interval: Interval::OneHour,
            limit: 100,
            refresh_secs: 15,
            on_invalid_bar: InvalidBarPolicy::Skip,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter used when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load defaults, then the settings file, then `DETECTOR_*` environment variables.
    ///
    /// An explicit `path` must exist; the default `detector.{toml,json,yaml}` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_SETTINGS_FILE).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.limit == 0 || self.scan.limit > MAX_LIMIT {
            return Err(ConfigError::Invalid {
                key: "scan.limit",
                message: format!("{} is outside 1..={}", self.scan.limit, MAX_LIMIT),
            });
        }
        if self.scan.refresh_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "scan.refresh_secs",
                message: "must be at least 1".to_string(),
            });
        }
        if self.scan.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "scan.symbol",
                message: "must not be empty".to_string(),
            });
        }
        if self.binance.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "binance.timeout_secs",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
