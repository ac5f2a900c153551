//! Tracing subscriber initialization

use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::TelemetryAppConfig;

/// Error type for telemetry initialization
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to initialize tracing subscriber
    #[error("Failed to initialize tracing: {0}")]
    Init(String),

    /// Log filter directive could not be parsed
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },
}

/// Resolve the active filter
///
/// `RUST_LOG` wins when set and valid; otherwise `override_filter` (from the
/// command line) and finally the configured filter.
pub fn build_env_filter(
    config: &TelemetryAppConfig,
    override_filter: Option<&str>,
) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let directives = override_filter.unwrap_or(&config.log_filter);
    EnvFilter::try_new(directives).map_err(|e| TelemetryError::InvalidFilter {
        filter: directives.to_string(),
        reason: e.to_string(),
    })
}

/// Initialize the global subscriber
///
/// Fails if a global subscriber has already been installed.
pub fn init_telemetry(
    config: &TelemetryAppConfig,
    override_filter: Option<&str>,
) -> Result<(), TelemetryError> {
    let env_filter = build_env_filter(config, override_filter)?;

    if config.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true),
            )
            .try_init()
            .map_err(|e| TelemetryError::Init(e.to_string()))?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true),
            )
            .try_init()
            .map_err(|e| TelemetryError::Init(e.to_string()))?;
    }

    info!(json = config.json, "Telemetry initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_override_is_rejected() {
        // RUST_LOG may be set by the developer running the tests
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = TelemetryAppConfig::default();
        let result = build_env_filter(&config, Some("application=notalevel"));
        assert!(matches!(result, Err(TelemetryError::InvalidFilter { .. })));
    }

    #[test]
    fn test_default_filter_parses() {
        let config = TelemetryAppConfig::default();
        assert!(build_env_filter(&config, None).is_ok());
        assert!(build_env_filter(&config, Some("debug")).is_ok());
    }

    #[test]
    fn test_second_init_fails() {
        let config = TelemetryAppConfig::default();
        // The first call may or may not win depending on other tests in this binary
        let _ = init_telemetry(&config, None);
        assert!(matches!(
            init_telemetry(&config, None),
            Err(TelemetryError::Init(_))
        ));
    }

    #[test]
    fn test_error_display() {
        let err = TelemetryError::InvalidFilter {
            filter: "x=bad".to_string(),
            reason: "invalid level".to_string(),
        };
        assert!(err.to_string().contains("x=bad"));
    }
}
