//! Rasterizer constants
//!
//! Screen resolution, projection and sprite scaling constants.

/// Screen width in pixels (one ray per column)
pub const WIDTH: usize = 640;

/// Screen height in pixels
pub const HEIGHT: usize = 360;

/// Horizontal field of view (80 degrees)
pub const FOV: f32 = 80.0 * (std::f32::consts::PI / 180.0);

/// Ray march sub-steps per cell. Fixed so rays are reproducible.
pub const RENDER_STEPS: u32 = 50;

/// World wall height; column height = WALL_HEIGHT / dist * HEIGHT
pub const WALL_HEIGHT: f32 = 5.0;

/// Sprite tile pixels per on-screen pixel at distance 1, relative to HEIGHT
pub const SPRITE_SCALE: f32 = 16.0;

/// Projected sprite centers may fall this many columns off-screen and still draw
pub const CULL_MARGIN: i32 = 20;

/// Extra depth applied to sprite columns near the screen edges when testing occlusion
pub const EDGE_PENALTY: f32 = 0.1;

/// Distance of the projection plane for the FOV (1 / tan(FOV / 2))
pub fn screen_dist() -> f32 {
    1.0 / (FOV * 0.5).tan()
}
