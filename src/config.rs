//! Machine configuration, loaded from JSON.

use crate::catalog::Catalog;
use crate::core::DEFAULT_HISTORY_LIMIT;
use crate::vending::SimulatedDispenser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "COINOP_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON or an invalid catalog
    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Every field is optional in the file; missing ones take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub catalog: Catalog,
    /// Seconds of inactivity in `AddCoins` before credit is refunded
    pub idle_timeout_secs: Option<u64>,
    pub history_limit: usize,
    pub dispense_pulses: u32,
    pub dispense_pulse_ms: u64,
    /// How often a hosting loop should tick the machine
    pub tick_interval_ms: u64,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            catalog: Catalog::standard(),
            idle_timeout_secs: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
            dispense_pulses: 3,
            dispense_pulse_ms: 600,
            tick_interval_ms: 10,
        }
    }
}

impl MachineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load the file named by `COINOP_CONFIG`, or use defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_secs.map(Duration::from_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Dispenser that blocks for the configured pulses.
    pub fn simulated_dispenser(&self) -> SimulatedDispenser {
        SimulatedDispenser::new(
            self.dispense_pulses,
            Duration::from_millis(self.dispense_pulse_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = MachineConfig::from_json("{}").unwrap();
        assert_eq!(config, MachineConfig::default());
        assert_eq!(config.idle_timeout(), None);
        assert_eq!(config.tick_interval(), Duration::from_millis(10));
        assert_eq!(config.catalog, Catalog::standard());
    }

    #[test]
    fn custom_catalog_is_loaded() {
        let config = MachineConfig::from_json(
            r#"{
                "catalog": {
                    "coins": [{"id": "1", "label": "1¢", "value": 1}],
                    "products": [{"id": "gum", "name": "GUM", "price": 3}]
                },
                "idle_timeout_secs": 90
            }"#,
        )
        .unwrap();

        assert_eq!(config.catalog.denominations(), vec![1]);
        assert_eq!(config.catalog.product_info("gum").unwrap().price, 3);
        assert_eq!(config.idle_timeout(), Some(Duration::from_secs(90)));
    }

    #[test]
    fn invalid_catalog_is_rejected() {
        let result = MachineConfig::from_json(r#"{"catalog": {"coins": []}}"#);
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().contains("no coins"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = MachineConfig::load("/nonexistent/coinop.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/coinop.json"));
    }
}
