use std::time::Duration;

use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};

/// Environment variable holding the API base URL
pub const API_URL_ENV: &str = "FOLIO_API_URL";

/// Default server URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Client configuration wrapper.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
}

impl Default for Config {
    fn default() -> Self {
        let builder = match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => AppConfig::builder().server_url(url),
            _ => AppConfig::builder(),
        };
        match Self::with_builder(builder) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring {}: {}; using {}", API_URL_ENV, e, DEFAULT_SERVER_URL);
                Self { app: AppConfig::default() }
            }
        }
    }
}

impl Config {
    /// Create a new configuration from the environment
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        let app = builder.build()?;
        Ok(Self { app })
    }

    /// Shorthand for a config pointed at `url`
    pub fn for_url(url: impl Into<String>) -> Result<Self, ConfigError> {
        Self::with_builder(AppConfig::builder().server_url(url))
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url(), path)
    }

    pub fn server_url(&self) -> &str {
        self.app.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.app.request_timeout
    }
}
