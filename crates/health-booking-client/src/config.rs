//! Deployment configuration.

use thiserror::Error;

/// Environment variable carrying the API base URL.
pub const API_URL_ENV: &str = "HEALTH_BOOKING_API_URL";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{API_URL_ENV} is not set")]
    MissingBaseUrl,
}

/// Client configuration. The base URL comes from deployment, never from
/// code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Build a config from an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Read the base URL from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Ok(Self::new(url.trim())),
            _ => Err(ConfigError::MissingBaseUrl),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
