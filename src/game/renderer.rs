//! Column Renderer
//!
//! Draws a session into the software framebuffer:
//! 1. sky and ground halves
//! 2. one ray per screen column for walls, filling the depth buffer
//! 3. entity sprites, farthest first, clipped per column against that depth
//!
//! Then the framebuffer is uploaded and scaled to the window with macroquad,
//! with the HUD drawn on top at window resolution.

use std::cmp::Ordering;
use std::f32::consts::FRAC_PI_2;
use macroquad::prelude::*;
use crate::rasterizer::{
    angle_between, corrected_distance, norm_angle, screen_dist, Color as RasterColor, DestRect, Frame,
    Framebuffer, SpriteAtlas, Vec2 as WorldVec2,
};
use crate::rasterizer::constants::{CULL_MARGIN, EDGE_PENALTY, SPRITE_SCALE, WALL_HEIGHT};
use super::runtime::Game;

/// View-axis offset of the ray through screen column `x`
pub fn column_angle(x: usize, width: usize) -> f32 {
    let column = x as f32 / width as f32 * 2.0 - 1.0;
    column.atan2(screen_dist())
}

/// Inverse of [`column_angle`]: screen column for a view-axis offset.
/// None for anything at or behind the view plane.
pub fn angle_to_column(ray_angle: f32, width: usize) -> Option<f32> {
    if ray_angle.abs() >= FRAC_PI_2 {
        return None;
    }
    let column = ray_angle.tan() * screen_dist();
    Some((column + 1.0) * 0.5 * width as f32)
}

/// On-screen height of a wall at corrected distance `dist`
pub fn wall_height(dist: f32, screen_height: usize) -> f32 {
    WALL_HEIGHT / dist * screen_height as f32
}

/// Render one full frame of `game` into `fb`
pub fn render_game(game: &mut Game, fb: &mut Framebuffer, atlas: &SpriteAtlas, max_ray_distance: f32) {
    let horizon = fb.height as f32 / 2.0;
    fb.fill_rect(0.0, 0.0, fb.width as f32, horizon, game.level.sky);
    fb.fill_rect(0.0, horizon, fb.width as f32, fb.height as f32 - horizon, game.level.ground);

    if game.depth_buffer.len() != fb.width {
        game.depth_buffer.resize(fb.width, f32::INFINITY);
    }
    render_walls(game, fb, max_ray_distance);
    render_sprites(game, fb, atlas);
}

fn render_walls(game: &mut Game, fb: &mut Framebuffer, max_ray_distance: f32) {
    let player = &game.player;
    let map = &game.level.map;
    let horizon = fb.height as f32 / 2.0;

    for x in 0..fb.width {
        let ray_angle = column_angle(x, fb.width);
        let dir = WorldVec2::from_angle(player.angle + ray_angle);

        let Some(hit) = map.raycast(player.pos.x, player.pos.y, dir.x, dir.y, max_ray_distance) else {
            game.depth_buffer[x] = f32::INFINITY;
            continue;
        };
        let dist = corrected_distance(hit.dist, ray_angle);
        game.depth_buffer[x] = dist;

        let h = wall_height(dist, fb.height);
        let color = RasterColor { a: 0xff, ..hit.color };
        fb.fill_rect(x as f32, horizon - h / 2.0, 1.0, h, color);
    }
}

/// A sprite placed on screen
#[derive(Debug, Clone, Copy)]
struct Projected {
    column: f32,
    dist: f32,
    frame: Frame,
}

fn project(game: &Game, width: usize) -> Vec<Projected> {
    let player = &game.player;
    let mut sprites: Vec<Projected> = game
        .entities
        .iter()
        .filter(|e| !e.dead)
        .filter_map(|e| {
            let frame = e.frame()?;
            let world_angle = angle_between(player.pos, e.pos);
            let ray_angle = norm_angle(world_angle - player.angle + FRAC_PI_2);
            let column = angle_to_column(ray_angle, width)?;
            let col = column.floor() as i32;
            if col < -CULL_MARGIN || col >= width as i32 + CULL_MARGIN {
                return None;
            }
            let dist = corrected_distance(player.pos.distance(e.pos), ray_angle);
            if dist <= f32::EPSILON {
                return None;
            }
            Some(Projected { column, dist, frame })
        })
        .collect();

    // Farthest first so nearer sprites overdraw
    sprites.sort_by(|a, b| b.dist.partial_cmp(&a.dist).unwrap_or(Ordering::Equal));
    sprites
}

/// Depth a sprite must beat in column `x`, scaled up toward the screen edges
fn edge_scaled(dist: f32, x: usize, width: usize) -> f32 {
    let ndc = (x as f32 + 0.5) / width as f32 * 2.0 - 1.0;
    dist * (1.0 + EDGE_PENALTY * ndc * ndc)
}

fn render_sprites(game: &Game, fb: &mut Framebuffer, atlas: &SpriteAtlas) {
    let horizon = fb.height as f32 / 2.0;

    for sprite in project(game, fb.width) {
        let sheet = atlas.sheet(sprite.frame.sheet);
        let scale = fb.height as f32 / (sprite.dist * SPRITE_SCALE);
        let w = sheet.tile_w as f32 * scale;
        let h = sheet.tile_h as f32 * scale;
        let dest = DestRect { x: sprite.column - w / 2.0, y: horizon - h / 2.0, w, h };

        let x0 = (dest.x.floor() as i32).max(0);
        let x1 = ((dest.x + w).ceil() as i32).min(fb.width as i32);

        // Blit each contiguous run of unoccluded columns
        let mut run_start: Option<i32> = None;
        for x in x0..x1 {
            let visible = edge_scaled(sprite.dist, x as usize, fb.width) < game.depth_buffer[x as usize];
            match (visible, run_start) {
                (true, None) => run_start = Some(x),
                (false, Some(start)) => {
                    fb.blit_tile(sheet, sprite.frame, dest, start..x);
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            fb.blit_tile(sheet, sprite.frame, dest, start..x1);
        }
    }
}

// =============================================================================
// Presentation
// =============================================================================

/// Upload the framebuffer and draw it letterboxed into the window
pub fn draw_framebuffer(fb: &Framebuffer) {
    let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
    texture.set_filter(FilterMode::Nearest);

    let fb_aspect = fb.width as f32 / fb.height as f32;
    let (sw, sh) = (screen_width(), screen_height());
    let (draw_w, draw_h) = if fb_aspect > sw / sh {
        (sw, sw / fb_aspect)
    } else {
        (sh * fb_aspect, sh)
    };

    clear_background(BLACK);
    draw_texture_ex(
        &texture,
        (sw - draw_w) / 2.0,
        (sh - draw_h) / 2.0,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(draw_w, draw_h)),
            ..Default::default()
        },
    );
}

const HUD_FONT_SIZE: f32 = 24.0;
const HUD_MARGIN: f32 = 12.0;

fn draw_shadowed(text: &str, x: f32, y: f32) {
    draw_text(text, x + 1.0, y + 1.0, HUD_FONT_SIZE, BLACK);
    draw_text(text, x, y, HUD_FONT_SIZE, WHITE);
}

/// Health readout at top-left with the active text overlay below it
pub fn draw_hud(game: &Game, paused: bool) {
    let line_height = HUD_FONT_SIZE * 1.2;
    let mut y = HUD_MARGIN + HUD_FONT_SIZE;
    draw_shadowed(&format!("HP: {}", game.player.health), HUD_MARGIN, y);

    if let Some(overlay) = &game.text_overlay {
        y += line_height * 0.5;
        for line in &overlay.lines {
            y += line_height;
            draw_shadowed(line, HUD_MARGIN, y);
        }
    }

    if paused {
        let label = "PAUSED";
        let dims = measure_text(label, None, HUD_FONT_SIZE as u16, 1.0);
        draw_shadowed(label, (screen_width() - dims.width) / 2.0, screen_height() / 2.0);
    }
}
