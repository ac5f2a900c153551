//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// External service error (HTTP failure, bad response body)
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// The record store rejected or failed a query
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_converts_transparently() {
        let err: ApplicationError = DomainError::ValidationError("bad".to_string()).into();
        assert!(matches!(err, ApplicationError::Domain(_)));
        assert_eq!(err.to_string(), "Validation failed: bad");
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            ApplicationError::ExternalService("timeout".into()).to_string(),
            "External service error: timeout"
        );
        assert_eq!(ApplicationError::RateLimited.to_string(), "Rate limit exceeded");
        assert_eq!(
            ApplicationError::Storage("disk I/O error".into()).to_string(),
            "Storage error: disk I/O error"
        );
        assert_eq!(
            ApplicationError::Configuration("interval".into()).to_string(),
            "Configuration error: interval"
        );
    }
}
