//! Browser LocalStorage store (wasm32)
//!
//! All keys live in one JSON blob under a single LocalStorage item.

use super::{KeyValueStore, MemoryStore, StoreError, StoredValue};

/// Store backed by `window.localStorage`
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore {
    cache: MemoryStore,
}

impl LocalStorageStore {
    /// LocalStorage item holding the blob
    const STORAGE_KEY: &'static str = "starlock_prefs";

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }

    /// Load from LocalStorage, falling back to an empty store
    pub fn load() -> Self {
        if let Some(storage) = Self::storage() {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match MemoryStore::from_json(&json) {
                    Ok(cache) => {
                        log::info!("Loaded {} keys from LocalStorage", cache.len());
                        return Self { cache };
                    }
                    Err(e) => log::warn!("Ignoring unreadable LocalStorage data: {}", e),
                }
            }
        }

        log::info!("No saved data found, starting fresh");
        Self::default()
    }
}

impl KeyValueStore for LocalStorageStore {
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
        let storage = Self::storage()
            .ok_or_else(|| StoreError::Unavailable("window.localStorage".into()))?;
        let json = self.cache.to_json()?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }
}
