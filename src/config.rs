//! Engine configuration
//!
//! Read from `~/.config/studydeck/config.toml` by default. Every key is
//! optional:
//!
//! ```toml
//! data_dir = "/home/me/.local/share/studydeck"
//! storage_key = "portfolio-quiz-items"
//! only_favorites = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::quiz::{FileBlobStore, ItemStore, DEFAULT_STORAGE_KEY};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Data directory not found")]
    DataDirNotFound,

    #[error("Invalid storage key '{0}': must be a plain file name")]
    InvalidStorageKey(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding the persisted blobs
    pub data_dir: Option<PathBuf>,
    /// Key the collection is stored under
    pub storage_key: String,
    /// Start with the favorites filter on
    pub only_favorites: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            only_favorites: false,
        }
    }
}

impl EngineConfig {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("studydeck").join("config.toml"))
    }

    /// Load a config file; a missing file means defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// The storage key becomes a file name under the data dir.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let key = self.storage_key.trim();
        if key.is_empty() || key.contains(['/', '\\']) || key.contains("..") {
            return Err(ConfigError::InvalidStorageKey(self.storage_key.clone()));
        }
        Ok(())
    }

    /// Resolved data directory
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => FileBlobStore::default_data_dir().map_err(|_| ConfigError::DataDirNotFound),
        }
    }

    /// Open the file-backed item store this config points at
    pub fn open_store(&self) -> Result<ItemStore, ConfigError> {
        self.validate()?;
        let backend = FileBlobStore::new(self.data_dir()?);
        Ok(ItemStore::load(Box::new(backend), self.storage_key.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{ItemKind, LoadSource, NewItem};
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = EngineConfig::load(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.storage_key, "portfolio-quiz-items");
    }

    #[test]
    fn test_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "only_favorites = true\n").unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert!(config.only_favorites);
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "only_favorites = \"sometimes\"").unwrap();

        assert!(matches!(EngineConfig::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_storage_key_must_stay_in_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        for key in ["../escape", "nested/items", "..", "c:\\\\items", " "] {
            fs::write(&path, format!("storage_key = {:?}\n", key)).unwrap();
            assert!(
                matches!(EngineConfig::load(&path), Err(ConfigError::InvalidStorageKey(_))),
                "key {key:?}"
            );
        }

        let config = EngineConfig {
            data_dir: Some(temp_dir.path().join("data")),
            storage_key: "../outside".to_string(),
            only_favorites: false,
        };
        assert!(matches!(config.open_store(), Err(ConfigError::InvalidStorageKey(_))));
        assert!(!temp_dir.path().join("outside.json").exists());
    }

    #[test]
    fn test_open_store_uses_key_and_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = EngineConfig {
            data_dir: Some(temp_dir.path().to_path_buf()),
            storage_key: "custom".to_string(),
            only_favorites: false,
        };

        let mut store = config.open_store().unwrap();
        assert_eq!(store.source(), &LoadSource::SeedMissing);
        store
            .add(NewItem::new(ItemKind::Essay, "Question", "Answer"))
            .unwrap();

        assert!(temp_dir.path().join("custom.json").exists());
        let reopened = config.open_store().unwrap();
        assert_eq!(reopened.source(), &LoadSource::Restored);
        assert_eq!(reopened.len(), 4);
    }
}
