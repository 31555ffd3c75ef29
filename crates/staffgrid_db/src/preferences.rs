use std::{collections::HashMap, sync::Mutex};

use serde_json::Value;

use crate::StoreError;

/// Key-value store for per-user view preferences.
///
/// Instances are shared between tables; each table writes under its own key
/// and the store does not arbitrate between callers using the same key.
pub trait PreferenceStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Session-only preference store.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryPreferenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StoreError> {
        let values = self.values.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(values.len())
    }

    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let values = self.values.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut values =
            self.values.lock().map_err(|_| StoreError::LockPoisoned)?;
        values.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_memory_store_round_trip() -> Result<(), StoreError> {
        let store = MemoryPreferenceStore::new();
        assert!(store.is_empty()?);
        assert_eq!(store.get("missing")?, None);

        store.set("a", json!({ "name": false }))?;
        store.set("a", json!({ "name": true }))?;

        assert_eq!(store.get("a")?, Some(json!({ "name": true })));
        assert_eq!(store.len()?, 1);
        Ok(())
    }
}
