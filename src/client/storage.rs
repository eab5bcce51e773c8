//! Session Persistence
//!
//! Durable storage for the three session entries (serialized user profile,
//! access token, refresh token). The session store only talks to the
//! [`SessionPersistence`] trait, so tests inject [`MemoryStorage`] while the
//! CLI uses [`FileStorage`].

use crate::shared::error::ClientResult;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One persisted entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    User,
    AccessToken,
    RefreshToken,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [Self::User, Self::AccessToken, Self::RefreshToken];

    /// Entry name as written to storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::AccessToken => "accessToken",
            Self::RefreshToken => "refreshToken",
        }
    }
}

/// Raw persisted values; `user` is the JSON-serialized profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredEntries {
    pub user: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl StoredEntries {
    fn get(&self, key: StorageKey) -> Option<&str> {
        match key {
            StorageKey::User => self.user.as_deref(),
            StorageKey::AccessToken => self.access_token.as_deref(),
            StorageKey::RefreshToken => self.refresh_token.as_deref(),
        }
    }
}

/// Persistence adapter injected into the session store
pub trait SessionPersistence: Send + Sync {
    fn read(&self, key: StorageKey) -> ClientResult<Option<String>>;

    fn write(&self, key: StorageKey, value: &str) -> ClientResult<()>;

    /// Removing a missing entry is not an error
    fn remove(&self, key: StorageKey) -> ClientResult<()>;

    /// Write every present entry and remove every absent one
    fn save(&self, entries: &StoredEntries) -> ClientResult<()> {
        for key in StorageKey::ALL {
            match entries.get(key) {
                Some(value) => self.write(key, value)?,
                None => self.remove(key)?,
            }
        }
        Ok(())
    }

    fn load(&self) -> ClientResult<StoredEntries> {
        Ok(StoredEntries {
            user: self.read(StorageKey::User)?,
            access_token: self.read(StorageKey::AccessToken)?,
            refresh_token: self.read(StorageKey::RefreshToken)?,
        })
    }

    /// Remove all entries. Keeps going past individual failures and reports the first one.
    fn clear(&self) -> ClientResult<()> {
        let mut first_error = None;
        for key in StorageKey::ALL {
            if let Err(e) = self.remove(key) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// In-process storage, lost on exit
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<StorageKey, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with the given entries
    pub fn with_entries(entries: StoredEntries) -> Self {
        let storage = Self::new();
        {
            let mut map = storage.lock();
            for key in StorageKey::ALL {
                if let Some(value) = entries.get(key) {
                    map.insert(key, value.to_string());
                }
            }
        }
        storage
    }

    /// Number of entries currently held
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<StorageKey, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionPersistence for MemoryStorage {
    fn read(&self, key: StorageKey) -> ClientResult<Option<String>> {
        Ok(self.lock().get(&key).cloned())
    }

    fn write(&self, key: StorageKey, value: &str) -> ClientResult<()> {
        self.lock().insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> ClientResult<()> {
        self.lock().remove(&key);
        Ok(())
    }
}

/// One file per entry under a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: StorageKey) -> PathBuf {
        let file = match key {
            StorageKey::User => "user.json",
            StorageKey::AccessToken => "access_token",
            StorageKey::RefreshToken => "refresh_token",
        };
        self.dir.join(file)
    }
}

impl SessionPersistence for FileStorage {
    fn read(&self, key: StorageKey) -> ClientResult<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: StorageKey, value: &str) -> ClientResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        // Write-then-rename so a crash never leaves a half-written entry
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> ClientResult<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
