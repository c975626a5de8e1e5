//! Durable string-keyed slots
//!
//! Mirrors the browser `localStorage` model: each slot holds one string value,
//! `set` overwrites the whole slot. [`FileStore`] keeps one file per slot under
//! the root folder; [`MemoryStore`] is used by tests and ephemeral runs.

use crate::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Slot holding the serialized shard cache blob
pub const CACHE_SLOT: &str = "poetryCache";

/// Slot holding the language mode flag ("cn" or "tw")
pub const LANG_SLOT: &str = "langMode";

/// String-keyed persistent storage
pub trait KeyValueStore: Send + Sync {
    /// Read a slot; `Ok(None)` when the slot was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite a slot
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a slot (no-op when absent)
    fn remove(&self, key: &str) -> Result<()>;
}

/// One file per slot: `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`, creating the directory if missing
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || key
                .chars()
                .any(|c| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        {
            return Err(Error::InvalidInput(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        // Write-then-rename so a crash never leaves a half-written slot
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        debug!(key = %key, bytes = value.len(), "Slot written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory slots
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock cannot leave a slot half-written
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();

        assert_eq!(store.get(LANG_SLOT).unwrap(), None);
        store.set(LANG_SLOT, "cn").unwrap();
        assert_eq!(store.get(LANG_SLOT).unwrap().as_deref(), Some("cn"));
        assert!(temp_dir.path().join("langMode.json").exists());
    }

    #[test]
    fn test_file_store_overwrites_slot() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();

        store.set(CACHE_SLOT, "first").unwrap();
        store.set(CACHE_SLOT, "second").unwrap();
        assert_eq!(store.get(CACHE_SLOT).unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_file_store_remove_missing_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();
        assert!(store.remove("never_written").is_ok());
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();
        assert!(matches!(store.set("../escape", "x"), Err(Error::InvalidInput(_))));
        assert!(matches!(store.get(""), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_file_store_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let store = FileStore::open(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.dir(), nested.as_path());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
