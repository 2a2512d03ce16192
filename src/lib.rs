//! Folio - Session Client Library
//!
//! Client-side session management for the Folio site: signup, login, logout
//! and token verification against the remote auth API, with the resulting
//! session persisted across restarts.
//!
//! # Module Structure
//!
//! - **`shared`** - Configuration and error types
//!   - `AppConfig` builder and validation
//!   - `AuthError` taxonomy (network, protocol, request, storage)
//!
//! - **`session`** - The session client
//!   - `SessionManager` and its persisted `SessionStore`
//!   - HTTP client for `/auth/*`
//!   - Admin-status collaborator
//!   - View state for login/signup forms
//!
//! # Usage
//!
//! ```rust,no_run
//! use folio::session::{Config, MemoryStore, SessionManager};
//!
//! # async fn example() {
//! let manager = SessionManager::new(Config::new(), MemoryStore::new());
//! match manager.login("a@b.com", "hunter2").await {
//!     Ok(_) => assert!(manager.is_authenticated()),
//!     Err(e) => eprintln!("{e}"),
//! }
//! # }
//! ```
//!
//! # Thread Safety
//!
//! `SessionManager` is `Send + Sync` when its store is. Store operations are
//! synchronous and individually atomic; overlapping credential calls are not
//! serialized and should be debounced by the caller.

/// Shared types and configuration
pub mod shared;

/// Client session management
pub mod session;

pub use session::{Session, SessionManager, UserProfile};
pub use shared::AuthError;
