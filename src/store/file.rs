//! Whole-file JSON key-value store.
//!
//! Persists a flat string map to a single JSON file, read-modify-write on
//! every mutation. This is the Rust stand-in for a host "local storage"
//! facility: small payloads, one logical writer, durability over throughput.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, VaultError};

use super::PersistentStore;

/// File-backed [`PersistentStore`] holding a single JSON object of
/// string keys to string values.
///
/// The file and its parent directory are created on first write; on Unix the
/// file is chmod'd to `0600` because the vault keeps encrypted credential
/// records in it. A file that exists but fails to parse is surfaced as a
/// [`VaultError::Storage`]: credential records are not disposable, so the
/// store never silently starts over.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if the backing file exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn load_map(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            VaultError::Storage(format!("failed to read store at {:?}: {}", self.path, e))
        })?;

        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }

        serde_json::from_str(&raw).map_err(|e| {
            VaultError::Storage(format!("store file {:?} is corrupt: {}", self.path, e))
        })
    }

    fn save_map(&self, map: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                VaultError::Storage(format!("failed to create store directory {:?}: {}", parent, e))
            })?;
        }

        let raw = serde_json::to_string_pretty(map)
            .map_err(|e| VaultError::Storage(format!("failed to serialize store: {}", e)))?;

        std::fs::write(&self.path, raw).map_err(|e| {
            VaultError::Storage(format!("failed to write store at {:?}: {}", self.path, e))
        })?;

        // Restrict permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600));
        }

        Ok(())
    }
}

impl PersistentStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load_map()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut map = self.load_map()?;
        map.insert(key.to_string(), value.to_string());
        self.save_map(&map)?;
        debug!(key, path = %self.path.display(), "Store entry written");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut map = self.load_map()?;
        if map.remove(key).is_some() {
            self.save_map(&map)?;
            debug!(key, path = %self.path.display(), "Store entry removed");
        }
        Ok(())
    }
}
