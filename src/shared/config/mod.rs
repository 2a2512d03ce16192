//! Application configuration module
//!
//! Provides the validated connection settings for the remote auth API.

use std::time::Duration;

use thiserror::Error;

/// Application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// API base URL, without a trailing slash
    pub server_url: Option<String>,
    /// Transport timeout handed to the HTTP client; `None` keeps reqwest's default
    pub request_timeout: Option<Duration>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.server_url {
            validate_url(url)?;
        }
        if self.request_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::MissingValue("request_timeout must be non-zero"));
        }
        Ok(())
    }
}

fn validate_url(url: &str) -> Result<(), ConfigError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| ConfigError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidUrl(format!("{url}: unsupported scheme '{other}'"))),
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    request_timeout: Option<Duration>,
}

impl AppConfigBuilder {
    /// Set the API base URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Bound every request made with this configuration
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let server_url = match self.server_url {
            Some(url) if url.trim().is_empty() => return Err(ConfigError::MissingValue("server_url")),
            Some(url) => Some(url.trim().trim_end_matches('/').to_string()),
            None => None,
        };
        let config = AppConfig {
            server_url,
            request_timeout: self.request_timeout,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}
