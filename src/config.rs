//! Connection settings for the Samanage API.
//!
//! The binary fills these from flags or the `SAMANAGE_*` environment
//! variables (see [`crate::cli`]); library callers build them directly.
//! Both paths go through the same validation.

use std::fmt;
use std::time::Duration;

use crate::error::SamanageError;

/// The vendor's production API host.
pub const DEFAULT_BASE_URL: &str = "https://api.samanage.com";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to Samanage.
///
/// The password is stored but never logged; the `Debug` output redacts it.
#[derive(Clone)]
pub struct Config {
    /// Account user name used for Digest authentication.
    pub username: String,

    /// Account password. Must never be logged or included in error messages.
    password: String,

    /// Base URL for the API (e.g., `https://api.samanage.com`), without a
    /// trailing slash.
    pub base_url: String,

    /// Timeout applied to every request by the HTTP transport.
    pub timeout: Duration,
}

impl Config {
    /// Builds a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `SamanageError::Config` if the username or password is empty,
    /// or if the base URL has no `http://`/`https://` scheme.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, SamanageError> {
        let username = Self::require("username", username.into())?;
        let password = Self::require("password", password.into())?;
        let base_url = Self::validate_base_url(base_url.into())?;

        Ok(Config {
            username,
            password,
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Overrides the transport timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the password. Only the Digest authenticator should call this.
    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    fn require(name: &str, value: String) -> Result<String, SamanageError> {
        if value.trim().is_empty() {
            Err(SamanageError::missing_setting(name))
        } else {
            Ok(value)
        }
    }

    /// Validates and normalizes the base URL.
    fn validate_base_url(url: String) -> Result<String, SamanageError> {
        let url = url.trim().trim_end_matches('/').to_string();

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(SamanageError::invalid_config(
                "base URI must start with http:// or https://",
            ));
        }

        url::Url::parse(&url)
            .map_err(|e| SamanageError::invalid_config(format!("invalid base URI: {}", e)))?;

        Ok(url)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_base_url_removes_trailing_slash() {
        let result = Config::validate_base_url("https://api.samanage.com/".to_string()).unwrap();
        assert_eq!(result, "https://api.samanage.com");
    }

    #[test]
    fn test_validate_base_url_requires_scheme() {
        let result = Config::validate_base_url("api.samanage.com".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_blank_credentials() {
        assert!(Config::new("", "secret", DEFAULT_BASE_URL).is_err());
        assert!(Config::new("admin", "   ", DEFAULT_BASE_URL).is_err());
    }

    #[test]
    fn test_new_uses_default_timeout() {
        let config = Config::new("admin", "secret", DEFAULT_BASE_URL).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.password(), "secret");
    }

    #[test]
    fn test_with_timeout_overrides_default() {
        let config = Config::new("admin", "secret", DEFAULT_BASE_URL)
            .unwrap()
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = Config::new("admin", "topsecret", DEFAULT_BASE_URL).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("topsecret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
