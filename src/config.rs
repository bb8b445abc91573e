//! Engine settings
//!
//! Read from a RON file. Every field has a default, so a partial file (or
//! no file at all) works; a file that exists but does not parse is an error.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use crate::storage::{default_data_dir, SAVE_FILE};

/// Settings file looked up next to the binary when no path is given
pub const DEFAULT_SETTINGS_FILE: &str = "gloomwalk.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Level loaded at startup and after death
    pub start_level: String,
    pub levels_dir: PathBuf,
    pub sprites_dir: PathBuf,
    pub sounds_dir: PathBuf,
    /// Overrides the default save file location
    pub save_file: Option<PathBuf>,
    /// Fixed RNG seed; None seeds from entropy
    pub seed: Option<u64>,
    /// Integer upscale of the 640x360 view
    pub window_scale: u32,
    /// Seconds between player saves
    pub persist_interval: f32,
    /// Rays stop after this many cells
    pub max_ray_distance: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_level: "sandbox".to_string(),
            levels_dir: PathBuf::from("levels"),
            sprites_dir: PathBuf::from("sprites"),
            sounds_dir: PathBuf::from("sounds"),
            save_file: None,
            seed: None,
            window_scale: 2,
            persist_interval: 1.0,
            max_ray_distance: 64.0,
        }
    }
}

impl Settings {
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Load from `path`. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let settings = Self::from_ron(&text)?;
                info!(path = %path.display(), "loaded settings");
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Directory and file name of the player save
    pub fn save_location(&self) -> (PathBuf, String) {
        match &self.save_file {
            Some(path) => {
                let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| SAVE_FILE.to_string());
                (dir, name)
            }
            None => (default_data_dir(), SAVE_FILE.to_string()),
        }
    }
}

/// Settings path from the first CLI argument, else the default file name
pub fn settings_path() -> PathBuf {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
}
