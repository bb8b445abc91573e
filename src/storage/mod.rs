//! Storage
//!
//! The player's position and facing are kept in a small JSON save file,
//! written periodically and read back on startup. Files go through
//! [`LocalStorage`], which resolves paths against a base directory.

pub mod local;

use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};
use crate::game::PlayerSnapshot;
use local::LocalStorage;

/// Default save file name inside the data directory
pub const SAVE_FILE: &str = "player.json";

/// Storage error types
#[derive(Debug, Error)]
pub enum StorageError {
    /// File or directory not found
    #[error("not found: {0}")]
    NotFound(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(e.to_string()),
            std::io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(e.to_string()),
            _ => StorageError::Io(e.to_string()),
        }
    }
}

/// Default directory for save data: `<platform data dir>/gloomwalk`
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gloomwalk")
}

/// Reads and writes the player save file
#[derive(Debug, Clone)]
pub struct SaveSlot {
    storage: LocalStorage,
    file: String,
}

impl SaveSlot {
    pub fn new(data_dir: impl Into<PathBuf>, file: impl Into<String>) -> Self {
        Self {
            storage: LocalStorage::with_base_dir(data_dir),
            file: file.into(),
        }
    }

    /// Load the saved snapshot. A missing file is not an error.
    pub fn load(&self) -> Result<Option<PlayerSnapshot>, StorageError> {
        let bytes = match self.storage.read(&self.file) {
            Ok(bytes) => bytes,
            Err(StorageError::NotFound(_)) => {
                debug!("no save file");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        let snapshot = serde_json::from_slice(&bytes)?;
        info!(path = %self.storage.path_of(&self.file).display(), "loaded save");
        Ok(Some(snapshot))
    }

    pub fn save(&self, snapshot: &PlayerSnapshot) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        self.storage.write(&self.file, &json)?;
        debug!(x = snapshot.x, y = snapshot.y, "saved player");
        Ok(())
    }

    /// Remove the save file, if any
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.delete(&self.file)
    }
}
