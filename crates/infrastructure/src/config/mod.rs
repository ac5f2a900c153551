//! Application configuration
//!
//! Split into focused sub-modules:
//! - `database`: SQLite database settings
//! - `collector`: collection interval and timestamp zone
//! - `telemetry`: log filter and output format
//!
//! Weather API settings reuse [`integration_weather::WeatherConfig`].

mod collector;
mod database;
mod telemetry;

use std::{path::Path, time::Duration};

use application::error::ApplicationError;
use domain::Timezone;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use collector::CollectorConfig;
pub use database::DatabaseConfig;
pub use integration_weather::WeatherConfig;
pub use telemetry::TelemetryAppConfig;

/// Prefix for environment overrides, e.g. `WEATHER_COLLECTOR_DATABASE__URL`
pub const ENV_PREFIX: &str = "WEATHER_COLLECTOR";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Open-Meteo client configuration
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Collection schedule configuration
    #[serde(default)]
    pub collector: CollectorConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryAppConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (optional) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, reading `path` instead of `config.toml` when given
    ///
    /// An explicitly named file must exist; the implicit `config.toml` is optional.
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with_env(path, Self::env_source())
    }

    fn env_source() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn load_with_env(
        path: Option<&Path>,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder()
            // Start with defaults
            .set_default("database.url", "sqlite:weather.db")?
            .set_default("collector.timezone", "Asia/Kolkata")?
            // Load from file if present
            .add_source(file)
            // Override with environment variables
            .add_source(env);

        let config: Self = builder.build()?.try_deserialize()?;
        debug!(
            database = %config.database.url,
            interval_secs = config.collector.interval_secs,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Reject values the collector cannot run with
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.collector.interval_secs == 0 {
            return Err(ApplicationError::Configuration(
                "collector.interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ApplicationError::Configuration(
                "database.max_connections must be greater than zero".to_string(),
            ));
        }
        if self.weather.base_url.trim().is_empty() {
            return Err(ApplicationError::Configuration(
                "weather.base_url cannot be empty".to_string(),
            ));
        }
        self.timezone()?;
        Ok(())
    }

    /// Parsed collection time zone
    pub fn timezone(&self) -> Result<Timezone, ApplicationError> {
        Timezone::parse(&self.collector.timezone)
            .map_err(|e| ApplicationError::Configuration(format!("collector.timezone: {e}")))
    }

    /// Period between collection passes
    #[must_use]
    pub const fn collection_interval(&self) -> Duration {
        Duration::from_secs(self.collector.interval_secs)
    }
}
