//! JSON file store (native)
//!
//! Writes go to a sibling `.tmp` file first, then replace the save.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, MemoryStore, StoreError, StoredValue};

/// Store backed by one JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    cache: MemoryStore,
}

impl JsonFileStore {
    /// Open `path`, starting empty if the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let cache = match fs::read_to_string(&path) {
            Ok(json) if json.trim().is_empty() => MemoryStore::new(),
            Ok(json) => MemoryStore::from_json(&json)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No save file at {}, starting fresh", path.display());
                MemoryStore::new()
            }
            Err(e) => return Err(e.into()),
        };
        log::info!("Loaded {} keys from {}", cache.len(), path.display());
        Ok(Self { path, cache })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<&StoredValue> {
        self.cache.get(key)
    }

    fn set(&mut self, key: &str, value: StoredValue) {
        self.cache.set(key, value);
    }

    fn delete_key(&mut self, key: &str) {
        self.cache.delete_key(key);
    }

    fn save(&mut self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, self.cache.to_json()?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::keys;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("starlock-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let path = temp_path("missing");
        let _ = fs::remove_file(&path);
        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get_int("anything", 9), 9);
    }

    #[test]
    fn test_save_and_reopen() {
        let path = temp_path("reopen");
        {
            let mut store = JsonFileStore::open(&path).unwrap();
            store.set_int(keys::UNLOCKED_LEVEL, 4);
            store.set_string(keys::UNLOCKED_ACHIEVEMENTS, "first_perfect");
            store.save().unwrap();
        }
        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get_int(keys::UNLOCKED_LEVEL, 0), 4);
        assert_eq!(
            store.get_string(keys::UNLOCKED_ACHIEVEMENTS, ""),
            "first_perfect"
        );
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = temp_path("corrupt");
        fs::write(&path, "{ nope").unwrap();
        assert!(matches!(JsonFileStore::open(&path), Err(StoreError::Serde(_))));
        let _ = fs::remove_file(&path);
    }
}
