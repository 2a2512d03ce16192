/**
 * Authentication View State
 *
 * What a login/signup form needs to render: whether a request is in flight,
 * the last error to show, and the current user. `begin` doubles as the
 * debounce for repeated submits.
 */

use crate::session::manager::SessionManager;
use crate::session::store::SessionStore;
use crate::session::types::{Session, UserProfile};
use crate::shared::error::AuthError;

/// Authentication state
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub authenticated: bool,
    pub user: Option<UserProfile>,
    pub error: Option<String>,
    pub loading: bool,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of what `manager` has persisted
    pub fn from_manager<S: SessionStore>(manager: &SessionManager<S>) -> Self {
        let mut state = Self::new();
        state.sync(manager);
        state
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn set_error(&mut self, error: String) {
        self.error = Some(error);
    }

    /// Mark a credential request as started.
    ///
    /// Returns `false` if one is already in flight; the caller should drop the
    /// new submit instead of issuing an overlapping request.
    pub fn begin(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        self.error = None;
        true
    }

    /// Record the outcome of a login or signup
    pub fn finish(&mut self, result: Result<Session, AuthError>) {
        self.loading = false;
        match result {
            Ok(session) => {
                self.authenticated = session.is_authenticated();
                self.user = session.user;
                self.error = None;
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    /// Re-read authentication from the persisted store
    pub fn sync<S: SessionStore>(&mut self, manager: &SessionManager<S>) {
        let session = manager.session();
        self.authenticated = session.is_authenticated();
        self.user = session.user;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::config::Config;
    use crate::session::store::{MemoryStore, TOKEN_KEY, USER_KEY};

    #[test]
    fn test_auth_state_new() {
        let state = AuthState::new();
        assert!(!state.authenticated);
        assert!(state.user.is_none());
        assert!(state.error.is_none());
        assert!(!state.loading);
    }

    #[test]
    fn test_auth_state_clear_error() {
        let mut state = AuthState::new();
        state.set_error("Test error".to_string());
        assert!(state.error.is_some());

        state.clear_error();
        assert!(state.error.is_none());
    }

    #[test]
    fn test_begin_rejects_double_submit() {
        let mut state = AuthState::new();
        assert!(state.begin());
        assert!(state.loading);
        assert!(!state.begin());

        state.finish(Err(AuthError::request(401, "invalid credentials")));
        assert!(!state.loading);
        assert!(state.begin());
    }

    #[test]
    fn test_begin_clears_previous_error() {
        let mut state = AuthState::new();
        state.set_error("old".to_string());
        assert!(state.begin());
        assert!(state.error.is_none());
    }

    #[test]
    fn test_finish_error_keeps_human_message() {
        let mut state = AuthState::new();
        state.begin();
        state.finish(Err(AuthError::request(401, "invalid credentials")));
        assert_eq!(state.error.as_deref(), Some("invalid credentials"));
        assert!(!state.authenticated);
    }

    #[test]
    fn test_finish_token_only_is_not_authenticated() {
        let mut state = AuthState::new();
        state.begin();
        state.finish(Ok(Session {
            token: Some("t1".to_string()),
            user: None,
        }));
        assert!(!state.authenticated);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_from_manager_reads_store() {
        let store = MemoryStore::new();
        store.set(TOKEN_KEY, "t1").unwrap();
        store
            .set(USER_KEY, r#"{"id":"1","email":"a@b.com","name":"A"}"#)
            .unwrap();
        let manager = SessionManager::new(Config::for_url("http://127.0.0.1:9").unwrap(), store);

        let state = AuthState::from_manager(&manager);
        assert!(state.authenticated);
        assert_eq!(state.user.map(|u| u.email), Some("a@b.com".to_string()));
    }
}
