//! # Session Manager
//!
//! Owns the client-held session (bearer token plus cached profile) and keeps
//! the persisted copy consistent with the server's last answer.
//!
//! One instance is built at the application root and handed to callers by
//! reference. It performs no locking across calls: overlapping logins from a
//! double submit must be debounced by the caller (see [`AuthState::begin`]).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use folio::session::{Config, MemoryStore, SessionManager};
//!
//! # async fn example() -> Result<(), folio::AuthError> {
//! let manager = SessionManager::new(Config::new(), MemoryStore::new());
//! let session = manager.login("a@b.com", "hunter2").await?;
//! assert!(session.is_authenticated());
//! assert!(manager.is_authenticated());
//! manager.logout().await;
//! # Ok(())
//! # }
//! ```
//!
//! [`AuthState::begin`]: crate::session::state::AuthState::begin

use std::sync::Arc;

use crate::session::admin::AdminCheck;
use crate::session::auth::AuthApi;
use crate::session::config::Config;
use crate::session::store::{SessionStore, TOKEN_KEY, USER_KEY};
use crate::session::types::{
    AuthEnvelope, LoginRequest, Session, SignupRequest, UserProfile, UserUpdate, VerifyOutcome,
};
use crate::shared::error::AuthError;

pub struct SessionManager<S> {
    api: AuthApi,
    store: S,
    admin: Option<Arc<dyn AdminCheck>>,
}

impl<S: SessionStore> SessionManager<S> {
    pub fn new(config: Config, store: S) -> Self {
        Self {
            api: AuthApi::new(config),
            store,
            admin: None,
        }
    }

    /// Attach the collaborator used by [`refresh_admin_status`](Self::refresh_admin_status)
    pub fn with_admin_check(mut self, check: Arc<dyn AdminCheck>) -> Self {
        self.admin = Some(check);
        self
    }

    pub fn config(&self) -> &Config {
        self.api.config()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<Session, AuthError> {
        let request = SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let envelope = self.api.signup(&request).await?;
        let session = self.persist(envelope)?;
        tracing::info!("Signed up {}", email);
        Ok(session)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let envelope = self.api.login(&request).await?;
        let session = self.persist(envelope)?;
        tracing::info!("Logged in {}", email);
        Ok(session)
    }

    /// Check `token` with the server. Never fails; any error reads as invalid.
    pub async fn verify_token(&self, token: &str) -> VerifyOutcome {
        match self.api.verify(token).await {
            Ok(envelope) => VerifyOutcome {
                valid: envelope.success == Some(true),
                user: envelope.user.map(|u| u.normalize()),
            },
            Err(e) => {
                tracing::debug!("Token verification failed: {}", e);
                VerifyOutcome::invalid()
            }
        }
    }

    /// Reconcile the stored session with the server at start-up.
    ///
    /// Returns whether the device is authenticated afterwards. The session is
    /// cleared only when the server explicitly rejects the token; if the server
    /// cannot be reached the local session is kept as-is.
    pub async fn restore(&self) -> bool {
        let Some(token) = self.token() else {
            return false;
        };

        match self.api.verify(&token).await {
            Ok(envelope) if envelope.success == Some(true) => {
                if let Some(user) = envelope.user {
                    if let Err(e) = self.write_user(&user.normalize()) {
                        tracing::error!("Could not refresh stored profile: {}", e);
                    }
                }
                tracing::info!("Restored session");
            }
            Ok(_) => {
                tracing::info!("Stored token was not confirmed; clearing session");
                self.clear();
            }
            Err(AuthError::RequestError { status, .. }) if is_rejection(status) => {
                tracing::info!("Stored token was rejected (HTTP {}); clearing session", status);
                self.clear();
            }
            Err(e) => {
                tracing::warn!("Could not verify stored session, keeping it: {}", e);
            }
        }
        self.is_authenticated()
    }

    /// End the session on this device, notifying the server on a best-effort basis
    pub async fn logout(&self) {
        if let Some(token) = self.token() {
            if let Err(e) = self.api.logout(&token).await {
                tracing::warn!("Server-side logout failed: {}", e);
            }
        }
        self.clear();
        tracing::info!("Logged out");
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn user(&self) -> Option<UserProfile> {
        let raw = self.store.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Ignoring malformed stored user: {}", e);
                None
            }
        }
    }

    pub fn session(&self) -> Session {
        Session {
            token: self.token(),
            user: self.user(),
        }
    }

    /// The single predicate protected views consult
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some() && self.user().is_some()
    }

    /// Shallow-merge `update` over the stored user; no-op when none is stored
    pub fn update_user_data(&self, update: UserUpdate) -> Result<(), AuthError> {
        let Some(mut user) = self.user() else {
            tracing::debug!("No stored user; skipping profile update");
            return Ok(());
        };
        user.apply(update);
        self.write_user(&user)
    }

    /// Refresh admin/owner flags in the background. Failures are logged only.
    pub async fn refresh_admin_status(&self) {
        let Some(token) = self.token() else {
            return;
        };
        let Some(admin) = &self.admin else {
            tracing::debug!("No admin check configured; skipping refresh");
            return;
        };

        match admin.check(&token).await {
            Ok(status) => {
                if let Err(e) = self.update_user_data(status.into()) {
                    tracing::warn!("Could not store refreshed admin status: {}", e);
                }
            }
            Err(e) => tracing::warn!("Admin status refresh failed: {}", e),
        }
    }

    // A response carrying a token or a user replaces the whole session: the
    // key it does not carry is removed in the same store operation. A response
    // carrying neither leaves the store untouched.
    fn persist(&self, envelope: AuthEnvelope) -> Result<Session, AuthError> {
        let session = Session {
            token: envelope.token.filter(|t| !t.is_empty()),
            user: envelope.user.map(|u| u.normalize()),
        };
        if session.token.is_none() && session.user.is_none() {
            tracing::debug!("Response carried no session data; store unchanged");
            return Ok(session);
        }

        let user_json = session
            .user
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| AuthError::storage(e.to_string()))?;

        let mut set = Vec::with_capacity(2);
        let mut remove = Vec::with_capacity(2);
        match &session.token {
            Some(token) => set.push((TOKEN_KEY, token.as_str())),
            None => remove.push(TOKEN_KEY),
        }
        match &user_json {
            Some(json) => set.push((USER_KEY, json.as_str())),
            None => remove.push(USER_KEY),
        }

        self.store.apply(&set, &remove).map_err(|e| {
            tracing::error!("Failed to persist session: {}", e);
            AuthError::storage(e.to_string())
        })?;
        Ok(session)
    }

    fn write_user(&self, user: &UserProfile) -> Result<(), AuthError> {
        let json = serde_json::to_string(user).map_err(|e| AuthError::storage(e.to_string()))?;
        self.store.set(USER_KEY, &json).map_err(|e| {
            tracing::error!("Failed to persist user: {}", e);
            AuthError::storage(e.to_string())
        })
    }

    fn clear(&self) {
        if let Err(e) = self.store.remove_all(&[TOKEN_KEY, USER_KEY]) {
            tracing::error!("Failed to clear stored session: {}", e);
        }
    }
}

/// Statuses that mean the server refused the token itself, as opposed to
/// being unable to answer (e.g. 5xx during an outage). 2xx covers
/// `success: false` bodies.
fn is_rejection(status: u16) -> bool {
    matches!(status, 200..=299 | 401 | 403)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::MemoryStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn manager() -> SessionManager<MemoryStore> {
        let config = Config::for_url("http://127.0.0.1:9").unwrap();
        SessionManager::new(config, MemoryStore::new())
    }

    fn envelope(value: serde_json::Value) -> AuthEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_persist_writes_both_keys_with_normalized_flags() {
        let manager = manager();
        let session = manager
            .persist(envelope(json!({
                "success": true,
                "token": "t1",
                "user": {"id": "1", "email": "a@b.com", "name": "A"}
            })))
            .unwrap();

        assert!(session.is_authenticated());
        assert_eq!(manager.token().as_deref(), Some("t1"));
        let user = manager.user().unwrap();
        assert!(!user.is_admin);
        assert!(!user.is_owner);

        let raw: serde_json::Value =
            serde_json::from_str(&manager.store().get(USER_KEY).unwrap()).unwrap();
        assert_eq!(raw["is_admin"], json!(false));
        assert_eq!(raw["is_owner"], json!(false));
    }

    #[test]
    fn test_persist_without_user_drops_stale_profile() {
        let manager = manager();
        manager
            .persist(envelope(json!({
                "token": "old",
                "user": {"id": "1", "email": "old@b.com", "name": "Old"}
            })))
            .unwrap();

        manager.persist(envelope(json!({"token": "new"}))).unwrap();
        assert_eq!(manager.token().as_deref(), Some("new"));
        assert!(manager.user().is_none());
        assert!(!manager.is_authenticated());
    }

    #[test]
    fn test_persist_without_session_data_keeps_store() {
        let manager = manager();
        manager
            .persist(envelope(json!({
                "token": "t1",
                "user": {"id": "1", "email": "a@b.com", "name": "A"}
            })))
            .unwrap();

        let session = manager
            .persist(envelope(json!({"success": true, "message": "check your email"})))
            .unwrap();
        assert_eq!(session, Session::default());
        assert_eq!(manager.token().as_deref(), Some("t1"));
        assert!(manager.is_authenticated());
    }

    #[test]
    fn test_is_rejection() {
        assert!(is_rejection(401));
        assert!(is_rejection(403));
        assert!(is_rejection(200));
        assert!(!is_rejection(500));
        assert!(!is_rejection(503));
        assert!(!is_rejection(404));
    }

    #[test]
    fn test_malformed_user_reads_as_absent() {
        let manager = manager();
        manager.store().set(TOKEN_KEY, "t1").unwrap();
        manager.store().set(USER_KEY, "{not json").unwrap();
        assert!(manager.user().is_none());
        assert!(!manager.is_authenticated());
    }

    #[test]
    fn test_empty_token_reads_as_absent() {
        let manager = manager();
        manager.store().set(TOKEN_KEY, "").unwrap();
        assert!(manager.token().is_none());
    }

    #[test]
    fn test_update_user_data_is_noop_without_user() {
        let manager = manager();
        manager
            .update_user_data(UserUpdate {
                is_admin: Some(true),
                ..UserUpdate::default()
            })
            .unwrap();
        assert!(manager.store().is_empty());
    }

    #[test]
    fn test_session_snapshot() {
        let manager = manager();
        assert_eq!(manager.session(), Session::default());
        manager.store().set(TOKEN_KEY, "t1").unwrap();
        let session = manager.session();
        assert_eq!(session.token.as_deref(), Some("t1"));
        assert!(session.user.is_none());
    }
}
