//! Framebuffer
//!
//! RGBA pixel surface the view is drawn into. Uploaded to a GPU texture
//! by the windowing layer once per frame.

use std::ops::Range;
use super::sprite::{Frame, SpriteSheet};
use super::types::Color;

pub struct Framebuffer {
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
    pub width: usize,
    pub height: usize,
}

/// Screen-space destination of a scaled sprite tile
#[derive(Debug, Clone, Copy)]
pub struct DestRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            let mut bytes = [0u8; 4];
            bytes.copy_from_slice(&self.pixels[idx..idx + 4]);
            Some(Color::from_bytes(bytes))
        } else {
            None
        }
    }

    /// Fill a rectangle given in fractional pixels, clipped to the surface
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let x0 = x.floor().max(0.0) as usize;
        let y0 = y.floor().max(0.0) as usize;
        let x1 = ((x + w).ceil().max(0.0) as usize).min(self.width);
        let y1 = ((y + h).ceil().max(0.0) as usize).min(self.height);
        for py in y0..y1 {
            for px in x0..x1 {
                self.set_pixel(px, py, color);
            }
        }
    }

    /// Draw one sprite tile scaled into `dest`, only touching screen columns in `columns`.
    ///
    /// Nearest-neighbor sampling; tile pixels below the solid alpha threshold
    /// are skipped. Sheets without pixel data draw as a placeholder box.
    pub fn blit_tile(&mut self, sheet: &SpriteSheet, frame: Frame, dest: DestRect, columns: Range<i32>) {
        if dest.w <= 0.0 || dest.h <= 0.0 {
            return;
        }

        let x_start = (dest.x.floor() as i32).max(columns.start).max(0);
        let x_end = ((dest.x + dest.w).ceil() as i32).min(columns.end).min(self.width as i32);
        let y_start = (dest.y.floor() as i32).max(0);
        let y_end = ((dest.y + dest.h).ceil() as i32).min(self.height as i32);

        for sx in x_start..x_end {
            let u = (sx as f32 + 0.5 - dest.x) / dest.w;
            if !(0.0..1.0).contains(&u) {
                continue;
            }
            for sy in y_start..y_end {
                let v = (sy as f32 + 0.5 - dest.y) / dest.h;
                if !(0.0..1.0).contains(&v) {
                    continue;
                }
                let color = match sheet.sample(frame, u, v) {
                    Some(c) => c,
                    None => Color::PLACEHOLDER,
                };
                if color.is_solid() {
                    self.set_pixel(sx as usize, sy as usize, color);
                }
            }
        }
    }
}
