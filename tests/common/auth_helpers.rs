//! Session fixtures

use folio::session::store::{MemoryStore, SessionStore, TOKEN_KEY, USER_KEY};
use folio::session::{Config, SessionManager};

pub fn manager_for(base_url: &str) -> SessionManager<MemoryStore> {
    let config = Config::for_url(base_url).expect("valid test URL");
    SessionManager::new(config, MemoryStore::new())
}

/// Manager whose store already holds a session for `a@b.com`
pub fn logged_in_manager(base_url: &str, token: &str) -> SessionManager<MemoryStore> {
    let manager = manager_for(base_url);
    manager.store().set(TOKEN_KEY, token).expect("memory store write");
    manager
        .store()
        .set(
            USER_KEY,
            r#"{"id":"1","email":"a@b.com","name":"A","is_admin":false,"is_owner":false}"#,
        )
        .expect("memory store write");
    manager
}
