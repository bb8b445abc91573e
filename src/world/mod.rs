//! Tile world: level map, raycasting, special markers and level loading

mod level;
mod map;
mod special;

pub use level::{DirectorySource, EntryText, LevelColors, LevelData, LevelError, LevelMeta, LevelSource, limits};
pub use map::{LevelMap, RayHit};
pub use special::{extract_specials, is_marker, Params, Special, SpecialSpec};
