//! Startup configuration.
//!
//! Loaded once from the JSON file named by `MARKET_PULSE_CONFIG`; every
//! missing field falls back to its default. There is no runtime
//! reconfiguration.

use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the config file path.
pub const CONFIG_ENV_VAR: &str = "MARKET_PULSE_CONFIG";

/// A tracked asset: display name plus provider symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct Ticker {
    pub name: String,
    pub symbol: String,
}

impl Ticker {
    pub fn new(name: &str, symbol: &str) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub title: String,
    /// Rendered top to bottom in this order; the tape uses it too.
    pub assets: Vec<Ticker>,
    pub refresh_interval_secs: u64,
    /// Provider lookback range, e.g. "1d".
    pub lookback_period: String,
    /// Fraction of the extreme price added beyond it when bounds widen.
    pub padding_fraction: f64,
    /// Ticker tape scroll speed in pixels per second.
    pub tape_speed: f32,
    pub request_timeout_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            title: "MarketPulse.Monitor".to_string(),
            assets: vec![
                Ticker::new("Ibovespa", "^BVSP"),
                Ticker::new("Euro (EUR/BRL)", "EURBRL=X"),
                Ticker::new("Dollar (USD/BRL)", "BRL=X"),
            ],
            refresh_interval_secs: 60,
            lookback_period: "1d".to_string(),
            padding_fraction: 0.03,
            tape_speed: 60.0,
            request_timeout_secs: 10,
        }
    }
}

impl MonitorConfig {
    /// Reads `MARKET_PULSE_CONFIG` if set, otherwise returns the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.assets.is_empty() {
            return Err(ConfigError::Invalid("no assets configured".into()));
        }
        let mut names = HashSet::new();
        for ticker in &self.assets {
            if ticker.symbol.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "asset '{}' has an empty symbol",
                    ticker.name
                )));
            }
            if !names.insert(ticker.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate asset name '{}'",
                    ticker.name
                )));
            }
        }
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::Invalid("refresh interval must be positive".into()));
        }
        if !(0.0..1.0).contains(&self.padding_fraction) {
            return Err(ConfigError::Invalid(format!(
                "padding fraction {} outside [0, 1)",
                self.padding_fraction
            )));
        }
        if !self.tape_speed.is_finite() || self.tape_speed < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "tape speed {} must be non-negative",
                self.tape_speed
            )));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_track_three_assets() {
        let config = MonitorConfig::default();
        assert!(config.validate().is_ok());
        let symbols: Vec<_> = config.assets.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, ["^BVSP", "EURBRL=X", "BRL=X"]);
        assert_eq!(config.refresh_interval(), Duration::from_secs(60));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = MonitorConfig::from_json(
            r#"{ "assets": [{ "name": "Apple", "symbol": "AAPL" }], "refresh_interval_secs": 30 }"#,
        )
        .unwrap();
        assert_eq!(config.assets, vec![Ticker::new("Apple", "AAPL")]);
        assert_eq!(config.refresh_interval_secs, 30);
        assert_eq!(config.lookback_period, "1d");
        assert_eq!(config.padding_fraction, 0.03);
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = MonitorConfig::from_json(
            r#"{ "assets": [{ "name": "A", "symbol": "X" }, { "name": "A", "symbol": "Y" }] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_bad_numbers() {
        let mut config = MonitorConfig::default();
        config.refresh_interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = MonitorConfig::default();
        config.padding_fraction = 1.5;
        assert!(config.validate().is_err());

        let mut config = MonitorConfig::default();
        config.tape_speed = -1.0;
        assert!(config.validate().is_err());

        let mut config = MonitorConfig::default();
        config.assets.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            MonitorConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
