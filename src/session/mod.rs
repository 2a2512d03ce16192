//! Client Session Module
//!
//! Client side of authentication: talks to the remote auth API and keeps the
//! persisted session (bearer token plus user profile) in step with it.
//!
//! # Architecture
//!
//! - **`config`** - API base URL and transport settings
//! - **`auth`** - HTTP client for the `/auth/*` endpoints
//! - **`admin`** - Admin-status collaborator injected into the manager
//! - **`types`** - Wire types, the persisted profile and the session pair
//! - **`store`** - Persisted key-value store (in-memory and file-backed)
//! - **`manager`** - `SessionManager`, the single owner of session state
//! - **`state`** - View state for login/signup forms
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use folio::session::{Config, FileStore, HttpAdminCheck, SessionManager};
//!
//! # async fn example() {
//! let config = Config::new();
//! let manager = SessionManager::new(config.clone(), FileStore::open_default())
//!     .with_admin_check(Arc::new(HttpAdminCheck::new(config)));
//! if manager.restore().await {
//!     manager.refresh_admin_status().await;
//! }
//! # }
//! ```

pub mod admin;
pub mod auth;
pub mod config;
pub mod manager;
pub mod state;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use admin::{AdminCheck, HttpAdminCheck};
pub use auth::AuthApi;
pub use config::Config;
pub use manager::SessionManager;
pub use state::AuthState;
pub use store::{FileStore, MemoryStore, SessionStore, StoreError};
pub use types::{AdminStatus, Session, UserProfile, UserUpdate, VerifyOutcome};
