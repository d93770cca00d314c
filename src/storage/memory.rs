// Memory storage implementation
// Author: Gabriel Demetrios Lafis

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{DraftStorage, StorageError};

/// In-memory draft storage
#[derive(Clone)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create a new memory storage
    pub fn new() -> Self {
        MemoryStorage {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| {
            StorageError::Other("Failed to acquire read lock".to_string())
        })?;

        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| {
            StorageError::Other("Failed to acquire write lock".to_string())
        })?;

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| {
            StorageError::Other("Failed to acquire write lock".to_string())
        })?;

        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| {
            StorageError::Other("Failed to acquire read lock".to_string())
        })?;

        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
