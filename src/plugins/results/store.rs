//! Profile persistence boundary.
//!
//! The match core never touches a storage medium directly: it talks to a
//! [`ProfileStore`], injected as a resource. The windowed game uses
//! [`JsonFileStore`]; headless runs and tests use [`MemoryStore`].

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no stored profiles")]
    Missing,
    #[error("profile storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("profile storage is malformed: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchRecord {
    pub win: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub session_wins: u32,
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
}

impl Profile {
    pub fn new(id: &str, username: &str) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            session_wins: 0,
            matches: Vec::new(),
        }
    }
}

/// The two persisted participants of a local duel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileSet {
    pub main_user: Profile,
    pub secondary_user: Profile,
}

pub trait ProfileStore: Send + Sync + 'static {
    fn load(&self) -> Result<ProfileSet, StoreError>;
    fn save(&self, profiles: &ProfileSet) -> Result<(), StoreError>;
}

/// JSON document on disk, one file for the whole profile set.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ProfileStore for JsonFileStore {
    fn load(&self) -> Result<ProfileSet, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::Missing);
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    fn save(&self, profiles: &ProfileSet) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(profiles)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

/// In-memory store; clones share the same backing set.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Option<ProfileSet>>>,
}

impl MemoryStore {
    pub fn seeded(profiles: ProfileSet) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(profiles))),
        }
    }
}

impl ProfileStore for MemoryStore {
    fn load(&self) -> Result<ProfileSet, StoreError> {
        self.inner
            .lock()
            .expect("profile store mutex poisoned")
            .clone()
            .ok_or(StoreError::Missing)
    }

    fn save(&self, profiles: &ProfileSet) -> Result<(), StoreError> {
        *self.inner.lock().expect("profile store mutex poisoned") = Some(profiles.clone());
        Ok(())
    }
}
