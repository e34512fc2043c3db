//! File-backed key-value store.
//!
//! All entries for a namespace live in a single JSON document under the
//! data directory. The document is read once at open and flushed to
//! disk after every mutation; last writer wins.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{KeyValueStore, StoreError};

/// Key-value store persisted as `<data_dir>/<namespace>.json`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Opens the store for a namespace, loading any existing entries.
    ///
    /// A missing file is an empty store; an unreadable or corrupt file
    /// is an error.
    pub fn open(data_dir: impl Into<PathBuf>, namespace: &str) -> Result<Self, StoreError> {
        let path = data_dir.into().join(format!("{}.json", namespace));

        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| StoreError::Corrupt(path.display().to_string(), e.to_string()))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(StoreError::Io(path, e)),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io(parent.to_path_buf(), e))?;
        }

        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Corrupt(self.path.display().to_string(), e.to_string()))?;

        fs::write(&self.path, raw).map_err(|e| StoreError::Io(self.path.clone(), e))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned lock still holds usable entries.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.lock();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.lock();
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.lock();
        entries.clear();
        self.flush(&entries)
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut keys: Vec<String> = self
            .lock()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path(), "zao").unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_open_nonexistent_is_empty() {
        let (store, _temp) = test_store();
        assert!(store.get("zao:FarmerProfile:u1").unwrap().is_none());
        assert!(store.keys("").unwrap().is_empty());
    }

    #[test]
    fn test_set_and_get_roundtrip() {
        let (store, _temp) = test_store();
        store.set("zao:FarmerProfile:u1", r#"{"a":1}"#).unwrap();
        assert_eq!(
            store.get("zao:FarmerProfile:u1").unwrap().as_deref(),
            Some(r#"{"a":1}"#)
        );
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = FileStore::open(temp_dir.path(), "zao").unwrap();
            store.set("zao:UserAccount:u1", "token").unwrap();
        }
        let reopened = FileStore::open(temp_dir.path(), "zao").unwrap();
        assert_eq!(
            reopened.get("zao:UserAccount:u1").unwrap().as_deref(),
            Some("token")
        );
    }

    #[test]
    fn test_remove() {
        let (store, _temp) = test_store();
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());

        // Removing again is not an error
        store.remove("k").unwrap();
    }

    #[test]
    fn test_clear() {
        let (store, _temp) = test_store();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.clear().unwrap();
        assert!(store.keys("").unwrap().is_empty());
    }

    #[test]
    fn test_keys_filters_by_prefix() {
        let (store, _temp) = test_store();
        store.set("zao:FarmerProfile:u1", "{}").unwrap();
        store.set("zao:FarmerProfile:u2", "{}").unwrap();
        store.set("zao:WeatherSnapshot:u1", "{}").unwrap();

        let keys = store.keys("zao:FarmerProfile:").unwrap();
        assert_eq!(
            keys,
            vec![
                "zao:FarmerProfile:u1".to_string(),
                "zao:FarmerProfile:u2".to_string()
            ]
        );
    }

    #[test]
    fn test_open_creates_nothing_until_first_write() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("data");
        let store = FileStore::open(nested.clone(), "zao").unwrap();
        assert!(!store.path().exists());

        store.set("k", "v").unwrap();
        assert!(store.path().exists());
        assert!(nested.exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("zao.json"), "not json [").unwrap();

        let result = FileStore::open(temp_dir.path(), "zao");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Corrupt"));
    }

    #[test]
    fn test_namespaces_are_separate_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path(), "zao").unwrap();
        let secure = FileStore::open(temp_dir.path(), "zao-secure").unwrap();

        store.set("k", "plain").unwrap();
        secure.set("k", "secret").unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("plain"));
        assert_eq!(secure.get("k").unwrap().as_deref(), Some("secret"));
        assert_ne!(store.path(), secure.path());
    }
}
