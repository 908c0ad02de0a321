use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AnalysisSettings, Config, HistorySettings, LoggingSettings, MarketDataSettings, ServerSettings,
};

/// The file read by [`load_config`] when no other path is given.
pub const DEFAULT_CONFIG_FILE: &str = "candleview.toml";

/// Loads the application configuration from `candleview.toml` and the environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// Loads the application configuration, layering sources from lowest to highest priority:
///
/// 1. built-in defaults,
/// 2. the TOML file at `path`, if it exists,
/// 3. `CANDLEVIEW__<SECTION>__<KEY>` environment variables
///    (e.g. `CANDLEVIEW__SERVER__PORT=8080`).
///
/// The result is validated before it is returned.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("CANDLEVIEW")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(path = %path.display(), "Configuration loaded.");
    Ok(config)
}
