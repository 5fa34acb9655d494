//! Persistence adapter for the item collection
//!
//! Each key maps to one serialized blob. Files live flat in the data dir:
//! ```text
//! {data-dir}/
//! └── {key}.json   # Whole collection, overwritten on every save
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Durable key-value blob store
pub trait BlobStore: Send + Sync {
    /// Read the blob under `key`, `None` if nothing was ever saved
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob under `key`
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

/// Blob store backed by one JSON file per key
pub struct FileBlobStore {
    base_path: PathBuf,
}

impl FileBlobStore {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Default data directory (e.g., ~/.local/share/studydeck)
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("studydeck"))
            .ok_or(StorageError::DataDirNotFound)
    }

    /// Get the file path for a key
    pub fn blob_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }
}

impl BlobStore for FileBlobStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.blob_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        fs::write(self.blob_path(key), value)?;
        Ok(())
    }
}

/// In-process blob store
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key
    pub fn with_blob(self, key: &str, value: impl Into<String>) -> Self {
        if let Ok(mut blobs) = self.blobs.lock() {
            blobs.insert(key.to_string(), value.into());
        }
        self
    }
}

impl BlobStore for MemoryBlobStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
        Ok(blobs.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<T: BlobStore + ?Sized> BlobStore for std::sync::Arc<T> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(temp_dir.path().to_path_buf());
        assert!(store.load("nothing-here").unwrap().is_none());
    }

    #[test]
    fn test_file_store_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(temp_dir.path().join("nested"));

        store.save("items", "[1]").unwrap();
        store.save("items", "[2]").unwrap();

        assert_eq!(store.load("items").unwrap().as_deref(), Some("[2]"));
        assert!(temp_dir.path().join("nested").join("items.json").exists());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryBlobStore::new().with_blob("a", "x");
        assert_eq!(store.load("a").unwrap().as_deref(), Some("x"));
        assert!(store.load("b").unwrap().is_none());

        store.save("b", "y").unwrap();
        assert_eq!(store.load("b").unwrap().as_deref(), Some("y"));
    }
}
