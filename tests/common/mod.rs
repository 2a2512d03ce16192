//! Common test utilities and helpers
//!
//! - Mock auth API helpers (wiremock)
//! - Session fixtures

#![allow(dead_code)]

pub mod auth_helpers;
pub mod mock_server;

// Re-export commonly used utilities
pub use auth_helpers::*;
pub use mock_server::*;
