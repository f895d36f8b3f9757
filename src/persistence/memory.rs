//! In-memory store, also the cache behind the file and LocalStorage stores

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{KeyValueStore, StoreError, StoredValue};

/// Store that lives only as long as the process
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryStore {
    values: BTreeMap<String, StoredValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of key -> value
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<&StoredValue> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: StoredValue) {
        self.values.insert(key.to_string(), value);
    }

    fn delete_key(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn save(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_keeps_value_types() {
        let mut store = MemoryStore::new();
        store.set_int("a", 3);
        store.set_float("b", 2.5);
        store.set_float("c", 3.0);
        store.set_string("d", "x,y");

        let json = store.to_json().unwrap();
        let loaded = MemoryStore::from_json(&json).unwrap();
        assert_eq!(loaded.get_int("a", 0), 3);
        assert_eq!(loaded.get_float("b", 0.0), 2.5);
        assert_eq!(loaded.get_float("c", 0.0), 3.0);
        assert_eq!(loaded.get_string("d", ""), "x,y");
        assert_eq!(loaded.len(), 4);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(MemoryStore::from_json("not json").is_err());
    }
}
