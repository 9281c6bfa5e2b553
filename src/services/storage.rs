//! Durable key-value storage for client preferences
//!
//! Holds the remembered library card (`libraryCardId`) and the selected
//! theme (`theme`). The file store keeps every key in one JSON object.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{AppError, AppResult};

pub const CARD_ID_KEY: &str = "libraryCardId";
pub const THEME_KEY: &str = "theme";

pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> AppResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            AppError::Storage(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| {
            AppError::Storage(format!("Corrupt storage file {}: {}", self.path.display(), e))
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::Storage(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }
        let raw = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, raw).map_err(|e| {
            AppError::Storage(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        tracing::debug!("Storing {} in {}", key, self.path.display());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Process-local store; clones share the same map
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| AppError::Storage("Storage lock poisoned".to_string()))
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
