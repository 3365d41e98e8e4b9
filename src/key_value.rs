//! The key-value namespace the store persists into.
//!
//! Values are opaque strings (JSON documents in practice). Each call is
//! independent: there is no transaction spanning a `get` and a later `set`.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{StoreError, StoreResult};

pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when the key was never written or has been removed.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Returns whether the key existed.
    fn remove(&self, key: &str) -> StoreResult<bool>;

    fn clear(&self) -> StoreResult<()>;
}

fn lock_err() -> StoreError {
    StoreError::Storage("poisoned lock: memory store".to_string())
}

/// In-memory namespace for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| lock_err())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().map_err(|_| lock_err())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let mut entries = self.entries.lock().map_err(|_| lock_err())?;
        Ok(entries.remove(key).is_some())
    }

    fn clear(&self) -> StoreResult<()> {
        let mut entries = self.entries.lock().map_err(|_| lock_err())?;
        entries.clear();
        Ok(())
    }
}
