//! Local persistent key-value storage.
//!
//! [`FileStore`] keeps a flat JSON object on disk and rewrites it on every
//! change (write to a sibling temp file, then rename). [`MemoryStore`] is
//! the in-process equivalent.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::ManagerError;

/// String key-value storage.
pub trait KeyValueStore: Send + Sync + fmt::Debug {
    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] if the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), ManagerError>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] if the change cannot be persisted.
    fn remove(&self, key: &str) -> Result<(), ManagerError>;
}

/// Store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ManagerError> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ManagerError> {
        self.values.lock().remove(key);
        Ok(())
    }
}

/// Store backed by a JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`, loading existing values. A missing file
    /// is an empty store; it is created on the first write.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Io`] if the file exists but cannot be read,
    /// or [`ManagerError::Storage`] if it is not a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ManagerError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                ManagerError::Storage(format!("{}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), keys = values.len(), "session store opened");
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), ManagerError> {
        let json = serde_json::to_string_pretty(values)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ManagerError> {
        let mut values = self.values.lock();
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }

    fn remove(&self, key: &str) -> Result<(), ManagerError> {
        let mut values = self.values.lock();
        if values.remove(key).is_some() {
            self.persist(&values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get("token").is_none());
        assert!(store.set("token", "abc").is_ok());
        assert_eq!(store.get("token").as_deref(), Some("abc"));
        assert!(store.remove("token").is_ok());
        assert!(store.remove("token").is_ok());
        assert!(store.get("token").is_none());
    }

    #[test]
    fn file_store_survives_reopen() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("temp dir");
        };
        let path = dir.path().join("nested").join("session.json");
        let Ok(store) = FileStore::open(&path) else {
            panic!("missing file opens empty");
        };
        assert!(store.set("language", "pt-BR").is_ok());
        assert!(store.set("theme", "dark").is_ok());
        assert!(store.remove("theme").is_ok());
        drop(store);

        let Ok(reopened) = FileStore::open(&path) else {
            panic!("existing file opens");
        };
        assert_eq!(reopened.get("language").as_deref(), Some("pt-BR"));
        assert!(reopened.get("theme").is_none());
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("temp dir");
        };
        let path = dir.path().join("session.json");
        assert!(std::fs::write(&path, "[1, 2, 3]").is_ok());

        let result = FileStore::open(&path);
        assert!(matches!(result, Err(ManagerError::Storage(_))));
    }
}
