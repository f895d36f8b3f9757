//! Key-value persistence
//!
//! Features:
//! - String keys mapping to int, float or string values
//! - Reads always resolve to an explicit default (cold start with no save)
//! - Backends: in-memory, JSON file (native), LocalStorage (wasm32)
//!
//! Only `save` can fail; callers treat it as best-effort and log.

pub mod keys;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A stored scalar or string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Int(i64),
    Float(f32),
    Str(String),
}

/// Error type for flushing a store
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error while reading/writing the backing file
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Backing data could not be (de)serialized
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Backing storage does not exist in this environment
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Key-value store port.
///
/// Typed getters return `default` for a missing key or a value of another type.
pub trait KeyValueStore {
    /// Raw lookup
    fn get(&self, key: &str) -> Option<&StoredValue>;
    /// Raw insert/overwrite
    fn set(&mut self, key: &str, value: StoredValue);
    /// Remove a key (no-op if absent)
    fn delete_key(&mut self, key: &str);
    /// Flush pending writes to the backing storage
    fn save(&mut self) -> Result<(), StoreError>;

    fn has_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            Some(StoredValue::Int(v)) => *v,
            _ => default,
        }
    }

    fn get_float(&self, key: &str, default: f32) -> f32 {
        match self.get(key) {
            Some(StoredValue::Float(v)) => *v,
            _ => default,
        }
    }

    fn get_string(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(StoredValue::Str(v)) => v.clone(),
            _ => default.to_string(),
        }
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.set(key, StoredValue::Int(value));
    }

    fn set_float(&mut self, key: &str, value: f32) {
        self.set(key, StoredValue::Float(value));
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.set(key, StoredValue::Str(value.to_string()));
    }

    /// Counter read helper: negative or missing values become `default`
    fn get_count(&self, key: &str, default: u32) -> u32 {
        u32::try_from(self.get_int(key, i64::from(default))).unwrap_or(default)
    }
}

/// Flush `store`, logging instead of failing
pub fn save_or_warn<S: KeyValueStore + ?Sized>(store: &mut S, what: &str) {
    if let Err(e) = store.save() {
        log::warn!("Failed to save {}: {}", what, e);
    }
}
