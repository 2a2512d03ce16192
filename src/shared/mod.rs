//! Shared Module
//!
//! Types used across the crate that do not depend on the HTTP client:
//! configuration and the error taxonomy surfaced to callers.

/// Session error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use error::AuthError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
