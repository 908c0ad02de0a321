use crate::error::ConfigError;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section has defaults, so an empty or missing `candleview.toml` is valid.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisSettings,
    pub history: HistorySettings,
    pub market_data: MarketDataSettings,
    pub server: ServerSettings,
    pub logging: LoggingSettings,
}

/// Defaults for an analysis when the caller does not give them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// The starting capital used when none is given.
    pub default_capital: Decimal,
    /// The ticker used when none is given (e.g., "AAPL").
    pub default_symbol: String,
}

/// Where past analyses are kept.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// SQLite connection string, e.g. `sqlite://candleview.db`.
    pub database_url: String,
    /// How many analyses to keep. Older ones are dropped along with their trades.
    pub limit: usize,
}

/// The daily market data provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketDataSettings {
    /// Base URL of the chart endpoint. The symbol is appended as a path segment.
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Maximum request body size in megabytes. Trade files are uploaded inline.
    pub body_limit_mb: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            default_capital: Decimal::from(10_000),
            default_symbol: "AAPL".to_string(),
        }
    }
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://candleview.db".to_string(),
            limit: 10,
        }
    }
}

impl Default for MarketDataSettings {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            body_limit_mb: 50,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl Config {
    /// Rejects values that would make the application misbehave at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analysis.default_capital <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(format!(
                "analysis.default_capital must be positive, got {}",
                self.analysis.default_capital
            )));
        }
        if self.history.limit == 0 {
            return Err(ConfigError::ValidationError(
                "history.limit must be at least 1".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must not be 0".to_string(),
            ));
        }
        if self.market_data.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "market_data.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
