//! Level loading
//!
//! A level is a directory holding `level.png` (cell colors, alpha = solidity,
//! marker pixels for specials) and `meta.json` (sky/ground colors, entry
//! text, specials table). Loading is all-or-nothing: any failure rejects the
//! whole level.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};
use crate::rasterizer::Color;
use super::map::LevelMap;
use super::special::{extract_specials, Special, SpecialSpec};

/// Validation limits to prevent resource exhaustion from bad files
pub mod limits {
    /// Maximum map dimension (width or height) in cells
    pub const MAX_MAP_SIZE: usize = 4096;
}

/// Error type for level loading
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("metadata error: {0}")]
    Meta(#[from] serde_json::Error),
    #[error("validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct LevelColors {
    pub sky: String,
    pub ground: String,
}

/// `entryText` may be one string or a list of lines
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EntryText {
    Line(String),
    Lines(Vec<Value>),
}

impl EntryText {
    /// Text lines; non-string list members are dropped
    pub fn lines(&self) -> Vec<String> {
        match self {
            EntryText::Line(s) => vec![s.clone()],
            EntryText::Lines(values) => values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        }
    }
}

/// Contents of `meta.json`
#[derive(Debug, Clone, Deserialize)]
pub struct LevelMeta {
    pub colors: LevelColors,
    #[serde(default, rename = "entryText")]
    pub entry_text: Option<EntryText>,
    /// Marker id (hex string) to special spec
    #[serde(default)]
    pub specials: BTreeMap<String, SpecialSpec>,
}

impl LevelMeta {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Specials table keyed by numeric marker id
    fn special_table(&self) -> Result<HashMap<u8, SpecialSpec>, LevelError> {
        let mut table = HashMap::new();
        for (key, spec) in &self.specials {
            let id = u8::from_str_radix(key.trim(), 16).map_err(|_| {
                LevelError::Validation(format!("special id '{}' is not a hex byte", key))
            })?;
            table.insert(id, spec.clone());
        }
        Ok(table)
    }
}

const DEFAULT_SKY: Color = Color { r: 0x20, g: 0x20, b: 0x30, a: 0xff };
const DEFAULT_GROUND: Color = Color { r: 0x30, g: 0x28, b: 0x20, a: 0xff };

fn parse_level_color(value: &str, fallback: Color, which: &str) -> Color {
    Color::parse_css(value).unwrap_or_else(|| {
        warn!(color = value, which, "unparseable level color, using default");
        fallback
    })
}

/// A fully decoded level: clean solidity grid plus the extracted specials
#[derive(Debug, Clone)]
pub struct LevelData {
    pub map: LevelMap,
    pub specials: Vec<Special>,
    pub sky: Color,
    pub ground: Color,
    pub entry_text: Option<Vec<String>>,
}

impl LevelData {
    /// Build from raw RGBA8 pixels (row-major, 4 bytes per cell)
    pub fn from_rgba(width: usize, height: usize, pixels: &[u8], meta: &LevelMeta) -> Result<Self, LevelError> {
        if width == 0 || height == 0 {
            return Err(LevelError::Validation("level image is empty".into()));
        }
        if width > limits::MAX_MAP_SIZE || height > limits::MAX_MAP_SIZE {
            return Err(LevelError::Validation(format!(
                "level image too large ({}x{} > {})", width, height, limits::MAX_MAP_SIZE)));
        }
        if pixels.len() != width * height * 4 {
            return Err(LevelError::Validation(format!(
                "expected {} bytes of RGBA, got {}", width * height * 4, pixels.len())));
        }

        let mut cells: Vec<Color> = pixels
            .chunks_exact(4)
            .map(|px| Color::rgba(px[0], px[1], px[2], px[3]))
            .collect();
        let specials = extract_specials(width, &mut cells, &meta.special_table()?);

        let map = LevelMap::new(width, height, cells)
            .ok_or_else(|| LevelError::Validation("cell count mismatch".into()))?;

        Ok(Self {
            map,
            specials,
            sky: parse_level_color(&meta.colors.sky, DEFAULT_SKY, "sky"),
            ground: parse_level_color(&meta.colors.ground, DEFAULT_GROUND, "ground"),
            entry_text: meta.entry_text.as_ref().map(EntryText::lines),
        })
    }

    /// Decode an encoded image (PNG) plus metadata JSON
    pub fn from_bytes(image_bytes: &[u8], meta_json: &str) -> Result<Self, LevelError> {
        let meta = LevelMeta::from_json(meta_json)?;
        let img = image::load_from_memory(image_bytes)?.to_rgba8();
        let (w, h) = img.dimensions();
        Self::from_rgba(w as usize, h as usize, img.as_raw(), &meta)
    }
}

/// Where levels come from. Loading is atomic from the caller's view.
pub trait LevelSource {
    fn load(&mut self, name: &str) -> Result<LevelData, LevelError>;
}

/// Levels stored as `<root>/<name>/level.png` + `<root>/<name>/meta.json`
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl LevelSource for DirectorySource {
    fn load(&mut self, name: &str) -> Result<LevelData, LevelError> {
        if name.is_empty() || name.contains("..") || name.contains(['/', '\\']) {
            return Err(LevelError::Validation(format!("bad level name '{}'", name)));
        }
        let dir = self.root.join(name);
        let image_bytes = std::fs::read(dir.join("level.png"))?;
        let meta_json = std::fs::read_to_string(dir.join("meta.json"))?;
        let level = LevelData::from_bytes(&image_bytes, &meta_json)?;
        info!(
            level = name,
            width = level.map.width(),
            height = level.map.height(),
            specials = level.specials.len(),
            "loaded level"
        );
        Ok(level)
    }
}
