// File storage implementation
// Author: Gabriel Demetrios Lafis

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{DraftStorage, StorageError};

const EXTENSION: &str = "json";

/// Draft storage keeping one JSON file per key
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    /// Create a new file storage, creating the directory if needed
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        if !base_dir.exists() {
            fs::create_dir_all(&base_dir)?;
        }

        Ok(FileStorage { base_dir })
    }

    /// Get the path for a key
    fn get_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        let mut path = self.base_dir.clone();
        path.push(format!("{}.{}", key, EXTENSION));
        Ok(path)
    }
}

impl DraftStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.get_path(key)?;

        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.get_path(key)?;
        fs::write(path, value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.get_path(key)?;

        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_file() && path.extension().map_or(false, |ext| ext == EXTENSION) {
                if let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) {
                    keys.push(name.to_string());
                }
            }
        }

        keys.sort();
        Ok(keys)
    }
}
