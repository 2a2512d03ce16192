//! Session Error Types
//!
//! Every failure a credential operation can surface to its caller. Each variant's
//! `Display` is a complete sentence that can be shown to an end user as-is.
//!
//! # Error Categories
//!
//! - `NetworkError` - the API could not be reached at all
//! - `ProtocolError` - the API answered with something that is not the expected JSON envelope
//! - `RequestError` - the API rejected the request; the message comes from the response body
//! - `StorageError` - the local session store could not be written
//!
//! # Usage
//!
//! ```rust
//! use folio::shared::error::AuthError;
//!
//! let error = AuthError::request(401, "invalid credentials");
//! assert_eq!(error.to_string(), "invalid credentials");
//! ```
use thiserror::Error;

/// Failures surfaced by `SessionManager` credential operations
///
/// All variants are recoverable: show the message, let the user retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Transport failure before any HTTP response arrived
    #[error("Cannot reach the API at {api_url} ({message}). Check that the server is running and FOLIO_API_URL is set correctly.")]
    NetworkError {
        /// The configured API base URL
        api_url: String,
        /// Transport-level detail
        message: String,
    },

    /// Response body was not the expected JSON envelope
    #[error("The server sent an unexpected response (HTTP {status}): {message}")]
    ProtocolError {
        /// HTTP status code of the response
        status: u16,
        /// Parser detail
        message: String,
    },

    /// The server rejected the request
    #[error("{message}")]
    RequestError {
        /// HTTP status code of the response
        status: u16,
        /// Server-supplied message, or an operation-specific fallback
        message: String,
    },

    /// The local session store could not be written
    #[error("Could not save the session on this device: {message}")]
    StorageError {
        /// Store backend detail
        message: String,
    },
}

impl AuthError {
    /// Create a new network error
    pub fn network(api_url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkError {
            api_url: api_url.into(),
            message: message.into(),
        }
    }

    /// Create a new protocol error
    pub fn protocol(status: u16, message: impl Into<String>) -> Self {
        Self::ProtocolError {
            status,
            message: message.into(),
        }
    }

    /// Create a new request error
    pub fn request(status: u16, message: impl Into<String>) -> Self {
        Self::RequestError {
            status,
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageError {
            message: message.into(),
        }
    }

    /// HTTP status of the response that caused this error, if one arrived
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ProtocolError { status, .. } | Self::RequestError { status, .. } => Some(*status),
            Self::NetworkError { .. } | Self::StorageError { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_mentions_api_url() {
        let error = AuthError::network("http://api.internal:8080", "connection refused");
        let display = error.to_string();
        assert!(display.contains("http://api.internal:8080"));
        assert!(display.contains("connection refused"));
    }

    #[test]
    fn test_protocol_error_mentions_status() {
        let error = AuthError::protocol(502, "expected value at line 1 column 1");
        assert!(error.to_string().contains("HTTP 502"));
        assert_eq!(error.status(), Some(502));
    }

    #[test]
    fn test_request_error_displays_server_message_verbatim() {
        let error = AuthError::request(401, "invalid credentials");
        assert_eq!(error.to_string(), "invalid credentials");
        assert_eq!(error.status(), Some(401));
    }

    #[test]
    fn test_storage_error_has_no_status() {
        let error = AuthError::storage("disk full");
        assert!(error.to_string().contains("disk full"));
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_error_clone() {
        let error = AuthError::request(409, "email already registered");
        assert_eq!(error.clone(), error);
    }
}
