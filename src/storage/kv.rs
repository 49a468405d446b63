use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::errors::{BankError, BankResult};
use crate::storage::ClientPaths;

/// Durable string key/value store, the device-storage seam of the client.
///
/// Reads and writes of different keys are independent; nothing here spans
/// two keys atomically. Callers that persist related values under separate
/// keys accept that a crash can leave them out of step.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> BankResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> BankResult<()>;
    fn remove(&self, key: &str) -> BankResult<()>;
}

/// File-backed store: one file per key under a dedicated directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn from_paths(paths: &ClientPaths) -> Self {
        Self {
            dir: paths.store_dir().to_path_buf(),
        }
    }

    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn entry_path(&self, key: &str) -> BankResult<PathBuf> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(BankError::Storage(format!("Invalid store key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> BankResult<Option<String>> {
        let path = self.entry_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> BankResult<()> {
        let path = self.entry_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write-then-rename so a crash mid-write never truncates the entry.
        let tmp_path = path.with_extension("new");
        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> BankResult<()> {
        let path = self.entry_path(key)?;
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// In-memory store used by tests and previews.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> BankResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> BankResult<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> BankResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_store_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp.path());

        assert_eq!(store.get("auth_token").unwrap(), None);
        store.set("auth_token", "abc123").unwrap();
        assert_eq!(store.get("auth_token").unwrap().as_deref(), Some("abc123"));

        store.set("auth_token", "def456").unwrap();
        assert_eq!(store.get("auth_token").unwrap().as_deref(), Some("def456"));
    }

    #[test]
    fn file_store_remove_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp.path());

        store.set("user_data", "{}").unwrap();
        store.remove("user_data").unwrap();
        store.remove("user_data").unwrap();
        assert_eq!(store.get("user_data").unwrap(), None);
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let temp = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp.path());

        assert!(matches!(
            store.set("../escape", "x"),
            Err(BankError::Storage(_))
        ));
        assert!(matches!(store.get(""), Err(BankError::Storage(_))));
    }

    #[test]
    fn keys_are_independent() {
        let temp = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp.path());

        store.set("auth_token", "tok").unwrap();
        store.set("user_data", "{\"a\":1}").unwrap();
        store.remove("auth_token").unwrap();

        assert_eq!(store.get("auth_token").unwrap(), None);
        assert_eq!(store.get("user_data").unwrap().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryKeyValueStore::new();
        store.set("auth_token", "tok").unwrap();
        assert_eq!(store.get("auth_token").unwrap().as_deref(), Some("tok"));
        store.remove("auth_token").unwrap();
        assert_eq!(store.get("auth_token").unwrap(), None);
    }
}
