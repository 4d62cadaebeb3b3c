//! Error types for the Samanage client.
//!
//! This module defines `SamanageError`, the unified error type used throughout
//! the library for consistent error handling and propagation.
//!
//! HTTP responses with a non-accepted status are *not* errors: they come back
//! as [`ApiResponse::Failed`](crate::samanage_client::ApiResponse::Failed) so
//! callers check the outcome instead of catching a failure.
//!
//! # Security
//!
//! Error messages must never carry the account password. Use
//! `sanitize_message()` when building messages from external text.

use std::time::Duration;
use thiserror::Error;

/// Unified error type for all Samanage operations.
#[derive(Error, Debug)]
pub enum SamanageError {
    /// Configuration error - missing or invalid connection settings.
    #[error("configuration error: {0}")]
    Config(String),

    /// The requested endpoint is not in the resource-type registry.
    #[error("{0} not supported")]
    UnsupportedResourceType(String),

    /// Input validation failed (bad id, bad search filter, bad payload).
    #[error("validation error: {0}")]
    Validation(String),

    /// HTTP request failed during transmission.
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// Request timed out.
    #[error("request timed out after {duration:?} - the server may be slow or unreachable")]
    Timeout {
        /// How long we waited before timing out.
        duration: Duration,
        /// The operation that timed out.
        operation: String,
    },

    /// A URI could not be built from the base URL and path.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The server's Digest challenge could not be parsed or answered.
    #[error("digest authentication error: {0}")]
    DigestAuth(String),
}

impl SamanageError {
    /// Creates a configuration error for a missing setting.
    pub fn missing_setting(name: &str) -> Self {
        SamanageError::Config(format!("missing required setting: {}", name))
    }

    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        SamanageError::Config(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        SamanageError::Validation(message.into())
    }

    /// Creates an unsupported resource type error.
    pub fn unsupported(resource_type: impl Into<String>) -> Self {
        SamanageError::UnsupportedResourceType(resource_type.into())
    }

    /// Creates a timeout error.
    pub fn timeout(duration: Duration, operation: impl Into<String>) -> Self {
        SamanageError::Timeout {
            duration,
            operation: operation.into(),
        }
    }

    /// Replaces every occurrence of `secret` in `message` with `[REDACTED]`.
    #[must_use]
    pub fn sanitize_message(message: &str, secret: &str) -> String {
        if secret.is_empty() {
            return message.to_string();
        }
        message.replace(secret, "[REDACTED]")
    }
}

impl From<digest_auth::Error> for SamanageError {
    fn from(err: digest_auth::Error) -> Self {
        SamanageError::DigestAuth(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_setting_error() {
        let err = SamanageError::missing_setting("SAMANAGE_USERNAME");
        assert!(err.to_string().contains("SAMANAGE_USERNAME"));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_unsupported_resource_type_message() {
        let err = SamanageError::unsupported("printers");
        assert_eq!(err.to_string(), "printers not supported");
    }

    #[test]
    fn test_validation_error() {
        let err = SamanageError::validation("id must be an integer");
        assert_eq!(err.to_string(), "validation error: id must be an integer");
    }

    #[test]
    fn test_timeout_error() {
        let err = SamanageError::timeout(Duration::from_secs(30), "GET hardwares");
        let msg = err.to_string();
        assert!(msg.contains("timed out"));
        assert!(msg.contains("30s"));
    }

    #[test]
    fn test_serialization_error_from_serde() {
        let err: SamanageError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, SamanageError::Serialization(_)));
    }

    #[test]
    fn test_sanitize_message_removes_password() {
        let password = "hunter2-but-longer";
        let message = format!("login failed for admin:{}", password);
        let sanitized = SamanageError::sanitize_message(&message, password);
        assert!(!sanitized.contains(password));
        assert!(sanitized.contains("[REDACTED]"));
    }

    #[test]
    fn test_sanitize_message_empty_secret() {
        let message = "Some error message";
        assert_eq!(SamanageError::sanitize_message(message, ""), message);
    }
}
