//! Sprite sheets and animation
//!
//! A sheet is one RGBA image cut into fixed-size tiles. Entities hold a
//! `Visual` naming a tile (static) or a looping tile sequence (animated);
//! the renderer resolves it against the `SpriteAtlas`.

use std::path::Path;
use image::RgbaImage;
use tracing::{info, warn};
use super::types::Color;

/// Every sprite sheet the engine knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetId {
    Missing,
    Zomboid,
    Chaser,
    Orbs,
    Ladder,
    SkullBanner,
    Chopper,
}

impl SheetId {
    pub const ALL: [SheetId; 7] = [
        SheetId::Missing,
        SheetId::Zomboid,
        SheetId::Chaser,
        SheetId::Orbs,
        SheetId::Ladder,
        SheetId::SkullBanner,
        SheetId::Chopper,
    ];

    /// Image file name inside the sprites directory
    pub fn file_name(self) -> &'static str {
        match self {
            SheetId::Missing => "missing.png",
            SheetId::Zomboid => "zomboid.png",
            SheetId::Chaser => "chaser.png",
            SheetId::Orbs => "orbs.png",
            SheetId::Ladder => "ladder.png",
            SheetId::SkullBanner => "skull-banner.png",
            SheetId::Chopper => "chopper.png",
        }
    }

    /// Tile size in pixels (width, height)
    pub fn tile_size(self) -> (u32, u32) {
        match self {
            SheetId::Missing => (64, 64),
            SheetId::Zomboid => (64, 96),
            SheetId::Chaser => (64, 96),
            SheetId::Orbs => (32, 32),
            SheetId::Ladder => (42, 77),
            SheetId::SkullBanner => (32, 96),
            SheetId::Chopper => (340, 112),
        }
    }

    fn index(self) -> usize {
        match self {
            SheetId::Missing => 0,
            SheetId::Zomboid => 1,
            SheetId::Chaser => 2,
            SheetId::Orbs => 3,
            SheetId::Ladder => 4,
            SheetId::SkullBanner => 5,
            SheetId::Chopper => 6,
        }
    }
}

/// One tile of a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub sheet: SheetId,
    pub tx: u32,
    pub ty: u32,
}

impl Frame {
    pub fn new(sheet: SheetId, tx: u32, ty: u32) -> Self {
        Self { sheet, tx, ty }
    }
}

pub struct SpriteSheet {
    pub id: SheetId,
    pub tile_w: u32,
    pub tile_h: u32,
    image: Option<RgbaImage>,
}

impl SpriteSheet {
    /// Sheet without pixel data; draws as a placeholder box
    pub fn empty(id: SheetId) -> Self {
        let (tile_w, tile_h) = id.tile_size();
        Self { id, tile_w, tile_h, image: None }
    }

    pub fn with_image(id: SheetId, image: RgbaImage) -> Self {
        let (tile_w, tile_h) = id.tile_size();
        Self { id, tile_w, tile_h, image: Some(image) }
    }

    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }

    /// Sample a tile at normalized (u, v) in [0, 1).
    /// Returns None when the sheet has no pixel data.
    pub fn sample(&self, frame: Frame, u: f32, v: f32) -> Option<Color> {
        let image = self.image.as_ref()?;
        let px = frame.tx * self.tile_w + ((u * self.tile_w as f32) as u32).min(self.tile_w - 1);
        let py = frame.ty * self.tile_h + ((v * self.tile_h as f32) as u32).min(self.tile_h - 1);
        if px >= image.width() || py >= image.height() {
            return Some(Color::TRANSPARENT);
        }
        Some(Color::from_bytes(image.get_pixel(px, py).0))
    }
}

/// All loaded sprite sheets, one slot per `SheetId`
pub struct SpriteAtlas {
    sheets: Vec<SpriteSheet>,
}

impl Default for SpriteAtlas {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteAtlas {
    /// Atlas with every sheet unloaded
    pub fn new() -> Self {
        Self {
            sheets: SheetId::ALL.iter().map(|&id| SpriteSheet::empty(id)).collect(),
        }
    }

    /// Load every known sheet from `dir`. Sheets that fail to load stay as
    /// placeholders; this never fails as a whole.
    pub fn load_dir(dir: &Path) -> Self {
        let mut atlas = Self::new();
        for id in SheetId::ALL {
            let path = dir.join(id.file_name());
            match image::open(&path) {
                Ok(img) => {
                    atlas.insert(id, img.to_rgba8());
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load sprite sheet");
                }
            }
        }
        let loaded = atlas.sheets.iter().filter(|s| s.is_loaded()).count();
        info!(loaded, total = SheetId::ALL.len(), "sprite sheets loaded");
        atlas
    }

    pub fn insert(&mut self, id: SheetId, image: RgbaImage) {
        self.sheets[id.index()] = SpriteSheet::with_image(id, image);
    }

    pub fn sheet(&self, id: SheetId) -> &SpriteSheet {
        &self.sheets[id.index()]
    }
}

/// Looping tile sequence played at a fixed rate
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    sheet: SheetId,
    rate: f32,
    sequence: Vec<(u32, u32)>,
    index: usize,
    timer: f32,
}

impl Animation {
    pub fn new(sheet: SheetId, fps: f32, sequence: &[(u32, u32)]) -> Self {
        Self {
            sheet,
            rate: 1.0 / fps,
            sequence: sequence.to_vec(),
            index: 0,
            timer: 0.0,
        }
    }

    /// Advance at most one frame per call, wrapping at the end
    pub fn update(&mut self, dt: f32) {
        self.timer += dt;
        if self.timer >= self.rate {
            self.index += 1;
            if self.index >= self.sequence.len() {
                self.index = 0;
            }
            self.timer -= self.rate;
        }
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.timer = 0.0;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_last_frame(&self) -> bool {
        self.index + 1 >= self.sequence.len()
    }

    pub fn frame(&self) -> Frame {
        let (tx, ty) = self.sequence.get(self.index).copied().unwrap_or((0, 0));
        Frame::new(self.sheet, tx, ty)
    }
}

/// What an entity looks like
#[derive(Debug, Clone, PartialEq)]
pub enum Visual {
    Static(Frame),
    Animated(Animation),
}

impl Visual {
    pub fn still(sheet: SheetId, tx: u32, ty: u32) -> Self {
        Visual::Static(Frame::new(sheet, tx, ty))
    }

    pub fn update(&mut self, dt: f32) {
        if let Visual::Animated(anim) = self {
            anim.update(dt);
        }
    }

    pub fn frame(&self) -> Frame {
        match self {
            Visual::Static(frame) => *frame,
            Visual::Animated(anim) => anim.frame(),
        }
    }
}

/// Resolve a sprite name from level metadata. Unknown names fall back to
/// the `missing` sheet with a warning.
pub fn lookup_sprite(name: &str) -> Visual {
    match name {
        "ladder" => Visual::still(SheetId::Ladder, 0, 0),
        "skull-banner" => Visual::still(SheetId::SkullBanner, 0, 0),
        "chopper" => Visual::still(SheetId::Chopper, 0, 0),
        "blue-key" => Visual::Animated(Animation::new(
            SheetId::Orbs, 4.0, &[(0, 1), (1, 1), (2, 1), (3, 1)])),
        "spectral-core" => Visual::Animated(Animation::new(
            SheetId::Orbs, 4.0, &[(0, 4), (1, 4), (2, 4), (3, 4)])),
        _ => {
            warn!(sprite = name, "unknown sprite");
            Visual::still(SheetId::Missing, 0, 0)
        }
    }
}

/// Orb animation used by projectiles; `tag` selects the orbs row
pub fn projectile_visual(tag: u32) -> Visual {
    Visual::Animated(Animation::new(
        SheetId::Orbs, 8.0, &[(0, tag), (1, tag), (2, tag), (3, tag)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_wraps() {
        let mut anim = Animation::new(SheetId::Orbs, 4.0, &[(0, 0), (1, 0)]);
        anim.update(0.25);
        assert_eq!(anim.index(), 1);
        assert!(anim.is_last_frame());
        anim.update(0.25);
        assert_eq!(anim.index(), 0);
    }

    #[test]
    fn test_animation_holds_below_rate() {
        let mut anim = Animation::new(SheetId::Orbs, 4.0, &[(0, 0), (1, 0)]);
        anim.update(0.1);
        anim.update(0.1);
        assert_eq!(anim.index(), 0);
        anim.update(0.1);
        assert_eq!(anim.index(), 1);
    }

    #[test]
    fn test_unknown_sprite_uses_missing_sheet() {
        assert_eq!(lookup_sprite("no-such-thing").frame().sheet, SheetId::Missing);
        assert_eq!(lookup_sprite("ladder").frame().sheet, SheetId::Ladder);
    }

    #[test]
    fn test_sample_reads_tile_offset() {
        let mut img = RgbaImage::new(64, 32);
        img.put_pixel(33, 0, image::Rgba([1, 2, 3, 255]));
        let sheet = SpriteSheet::with_image(SheetId::Orbs, img);
        let c = sheet.sample(Frame::new(SheetId::Orbs, 1, 0), 1.0 / 32.0, 0.0);
        assert_eq!(c, Some(Color::rgba(1, 2, 3, 255)));
        // Tile outside the image reads as transparent
        let c = sheet.sample(Frame::new(SheetId::Orbs, 0, 3), 0.0, 0.0);
        assert_eq!(c, Some(Color::TRANSPARENT));
    }
}
