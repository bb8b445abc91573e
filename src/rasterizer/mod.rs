//! Software rasterizer for the column renderer
//!
//! # Module Organization
//!
//! - `types` - Color
//! - `math` - Vec2, angle helpers, fisheye correction
//! - `render` - Framebuffer and scaled tile blits
//! - `sprite` - Sprite sheets, animations, atlas
//! - `constants` - Screen resolution and projection constants

pub mod constants;
pub mod math;
pub mod render;
pub mod sprite;
pub mod types;

pub use types::Color;
pub use math::{Vec2, norm_angle, angle_between, corrected_distance};
pub use render::{Framebuffer, DestRect};
pub use sprite::{Animation, Frame, SheetId, SpriteAtlas, SpriteSheet, Visual, lookup_sprite, projectile_visual};
pub use constants::{WIDTH, HEIGHT, FOV, RENDER_STEPS, screen_dist};
