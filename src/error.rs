// error.rs
use thiserror::Error;

/// Per-asset fetch failure. Never fatal: the loop skips the asset for the tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("no usable data for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },
    #[error("network error for {symbol}: {message}")]
    Network { symbol: String, message: String },
}

impl FetchError {
    pub fn unavailable(symbol: &str, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }

    pub fn network(symbol: &str, err: impl std::fmt::Display) -> Self {
        Self::Network {
            symbol: symbol.to_string(),
            message: err.to_string(),
        }
    }
}

/// The render surface is unusable. Terminates the loop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("chart slot {index} does not exist (surface has {count})")]
    MissingSlot { index: usize, count: usize },
    #[error("invalid axis bounds {lower}..{upper} for chart {index}")]
    InvalidBounds { index: usize, lower: f64, upper: f64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}

/// Startup failures surface through `eframe::Result` so `main` exits
/// through the same path as a failed window creation.
impl From<MonitorError> for eframe::Error {
    fn from(err: MonitorError) -> Self {
        eframe::Error::AppCreation(Box::new(err))
    }
}
