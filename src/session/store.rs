//! # Session Store
//!
//! Durable, synchronous key-value surface holding the persisted session. The
//! session manager only ever touches two keys, [`TOKEN_KEY`] and [`USER_KEY`].
//!
//! - [`MemoryStore`]: process-local map, used by tests and embedders that bring
//!   their own persistence
//! - [`FileStore`]: a JSON object in the platform data directory, rewritten
//!   whole on every mutation so that batched writes land together
//!
//! ## Usage
//!
//! ```rust
//! use folio::session::store::{MemoryStore, SessionStore, TOKEN_KEY};
//!
//! let store = MemoryStore::new();
//! store.set(TOKEN_KEY, "t1").unwrap();
//! assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("t1"));
//! ```

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use thiserror::Error;

/// Key holding the raw bearer token
pub const TOKEN_KEY: &str = "token";
/// Key holding the JSON-serialized user profile
pub const USER_KEY: &str = "user";

/// Errors raised by store backends on write
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persisted key-value store backing a session
///
/// Reads never fail: an unavailable or unreadable store reads as empty.
///
/// The default [`apply`](SessionStore::apply) issues one `set`/`remove` per
/// key and can stop half way on error. Backends that need all-or-nothing
/// batches override it; [`MemoryStore`] and [`FileStore`] both do.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Write several keys and remove others, in order
    fn apply(&self, set: &[(&str, &str)], remove: &[&str]) -> Result<(), StoreError> {
        for (key, value) in set {
            self.set(key, value)?;
        }
        for key in remove {
            self.remove(key)?;
        }
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), StoreError> {
        self.apply(&[], keys)
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn apply(&self, set: &[(&str, &str)], remove: &[&str]) -> Result<(), StoreError> {
        (**self).apply(set, remove)
    }
}

/// In-memory store; clones share the same map
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn apply(&self, set: &[(&str, &str)], remove: &[&str]) -> Result<(), StoreError> {
        let mut entries = self.entries.write();
        for (key, value) in set {
            entries.insert((*key).to_string(), (*value).to_string());
        }
        for key in remove {
            entries.remove(*key);
        }
        Ok(())
    }
}

/// Store persisted as a single JSON object on disk
///
/// Every read goes to disk so that several processes sharing the file observe
/// each other's writes, the way browser tabs share one origin's storage.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store under the platform data directory (`<data_dir>/folio/session.json`)
    pub fn open_default() -> Self {
        Self::new(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
        path.push("folio");
        path.push("session.json");
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    // Write to a sibling temp file, then rename over the target.
    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = create_private(&tmp)?;
            file.write_all(serde_json::to_string_pretty(entries)?.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn mutate(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let mut entries = match self.load() {
            Ok(entries) => entries,
            Err(StoreError::Serialization(e)) => {
                tracing::warn!("Discarding unreadable session file {}: {}", self.path.display(), e);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        f(&mut entries);
        self.save(&entries)
    }
}

// The file holds a bearer token: owner read/write only.
fn create_private(path: &Path) -> io::Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let file = options.open(path)?;
    // `mode` only applies on creation; a leftover temp file keeps its bits.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    Ok(file)
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                tracing::warn!("Session file {} is unavailable: {}", self.path.display(), e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.apply(&[(key, value)], &[])
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.apply(&[], &[key])
    }

    fn apply(&self, set: &[(&str, &str)], remove: &[&str]) -> Result<(), StoreError> {
        self.mutate(|entries| {
            for (key, value) in set {
                entries.insert((*key).to_string(), (*value).to_string());
            }
            for key in remove {
                entries.remove(*key);
            }
        })
    }
}
