// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use common::UserProfile;
use parking_lot::Mutex;
use tracing::{debug, warn};

/// Key holding the bearer token.
pub const SESSION_TOKEN_KEY: &str = "sessionToken";
/// Key holding the JSON-encoded cached user profile.
pub const USER_KEY: &str = "user";

/// Persisted string key/value storage, the client-side equivalent of a
/// browser's local storage.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Volatile store, used by tests and one-shot runs.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object file (`{"sessionToken": "...", ...}`).
///
/// Every operation re-reads the file so that separate invocations of the
/// binary observe each other's writes.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_raw(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file {}", self.path.display()))?;
        Ok(Some(data).filter(|d| !d.trim().is_empty()))
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        match self.read_raw()? {
            Some(data) => serde_json::from_str(&data)
                .with_context(|| format!("Failed to parse session file {}", self.path.display())),
            None => Ok(HashMap::new()),
        }
    }

    /// Like [`FileStore::load`], but an unparseable file reads as empty so
    /// the next save replaces it. The flag tells whether that happened.
    fn load_for_update(&self) -> Result<(HashMap<String, String>, bool)> {
        let Some(data) = self.read_raw()? else {
            return Ok((HashMap::new(), false));
        };
        match serde_json::from_str(&data) {
            Ok(entries) => Ok((entries, false)),
            Err(e) => {
                warn!(
                    "Discarding unreadable session file {}: {}",
                    self.path.display(),
                    e
                );
                Ok((HashMap::new(), true))
            }
        }
    }

    // Written to a sibling file and renamed over the target, so a reader
    // never sees a half-written session.
    fn save(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create session directory {}", parent.display())
                })?;
            }
        }
        let data = serde_json::to_string_pretty(entries).context("Failed to encode session")?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, data)
            .with_context(|| format!("Failed to write session file {}", staging.display()))?;
        fs::rename(&staging, &self.path)
            .with_context(|| format!("Failed to replace session file {}", self.path.display()))
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock();
        let (mut entries, _) = self.load_for_update()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock();
        let (mut entries, reset) = self.load_for_update()?;
        if entries.remove(key).is_some() || reset {
            self.save(&entries)?;
        }
        Ok(())
    }
}

/// An authenticated session: the bearer token and the profile cached at
/// sign-in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

/// Handle on the persisted session, passed explicitly to everything that
/// needs the token or the cached profile.
///
/// Cloning is cheap; all clones share the same store.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileStore::new(path)))
    }

    /// The stored bearer token. An unreadable store counts as no token.
    pub fn token(&self) -> Option<String> {
        match self.store.get(SESSION_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Could not read session token: {:?}", e);
                None
            }
        }
    }

    /// The cached user profile, if one is stored and still decodes.
    pub fn profile(&self) -> Option<UserProfile> {
        let raw = match self.store.get(USER_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Could not read cached user: {:?}", e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!("Ignoring malformed cached user: {}", e);
                None
            }
        }
    }

    pub fn read(&self) -> Option<Session> {
        let token = self.token()?;
        let user = self.profile()?;
        Some(Session { token, user })
    }

    pub fn write(&self, session: &Session) -> Result<()> {
        let user = serde_json::to_string(&session.user).context("Failed to encode user profile")?;
        self.store.set(SESSION_TOKEN_KEY, &session.token)?;
        self.store.set(USER_KEY, &user)?;
        debug!("Session stored for {}", session.user.name);
        Ok(())
    }

    /// Removes both the token and the cached profile. Both removals are
    /// attempted even if the first one fails.
    pub fn clear(&self) -> Result<()> {
        let token = self.store.remove(SESSION_TOKEN_KEY);
        let user = self.store.remove(USER_KEY);
        debug!("Session cleared.");
        token.and(user)
    }
}
