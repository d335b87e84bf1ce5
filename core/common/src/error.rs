//! Common error types for jobstore.

use thiserror::Error;

/// Top-level error type for jobstore operations.
///
/// Variants fall into two groups: configuration-time failures
/// ([`Error::Validation`], [`Error::Configuration`]) mean the backend setup
/// itself is broken, everything else belongs to one specific request.
#[derive(Debug, Error)]
pub enum Error {
    /// Login information does not match the backend's credential schema.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Provider could not establish a usable backend connection.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Operation rejected because the provider is not active.
    #[error("Operation rejected: {0}")]
    Inactive(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Backend operation failed after the provider was constructed.
    #[error("Backend error: {0}")]
    Backend(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Whether this error says the backend setup is broken rather than
    /// the individual request.
    pub fn is_configuration_time(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::Configuration(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_time_split() {
        assert!(Error::Validation("x".into()).is_configuration_time());
        assert!(Error::Configuration("x".into()).is_configuration_time());
        assert!(!Error::Inactive("x".into()).is_configuration_time());
        assert!(!Error::NotFound("x".into()).is_configuration_time());
        assert!(!Error::Backend("x".into()).is_configuration_time());
    }

    #[test]
    fn test_inactive_display() {
        let err = Error::Inactive("provider 'main' is not active".into());
        assert_eq!(
            err.to_string(),
            "Operation rejected: provider 'main' is not active"
        );
    }
}
