// Storage module for editor drafts
// Author: Gabriel Demetrios Lafis

mod file;
mod memory;

pub use file::*;
pub use memory::*;

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Key/value store for serialized drafts (the client-side local storage)
pub trait DraftStorage {
    /// Read the value stored under a key
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store a value under a key, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// List all keys
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Represents an error in the storage module
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid key '{0}'")]
    InvalidKey(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Error: {0}")]
    Other(String),
}

/// Serialize a value as JSON and store it under a key
pub fn save_draft<T: Serialize>(
    storage: &dyn DraftStorage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    storage.set(key, &json)
}

/// Load and deserialize a stored value
///
/// A value that no longer deserializes is treated as absent.
pub fn load_draft<T: DeserializeOwned>(
    storage: &dyn DraftStorage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let raw = match storage.get(key)? {
        Some(raw) => raw,
        None => return Ok(None),
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!("Discarding unreadable draft '{}': {}", key, err);
            Ok(None)
        }
    }
}
