//! Level map and raycaster
//!
//! A read-only grid of colored cells. Cell (x, y) covers the continuous
//! square [x - 0.5, x + 0.5) × [y - 0.5, y + 0.5), so continuous positions
//! round to their cell.

use crate::rasterizer::{Color, RENDER_STEPS};

/// Nearest solid cell along a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance travelled, in cells
    pub dist: f32,
    pub color: Color,
}

#[derive(Debug, Clone)]
pub struct LevelMap {
    width: usize,
    height: usize,
    cells: Vec<Color>,
}

impl LevelMap {
    /// Build from row-major cells. Returns None if the cell count does not match.
    pub fn new(width: usize, height: usize, cells: Vec<Color>) -> Option<Self> {
        if cells.len() != width * height {
            return None;
        }
        Some(Self { width, height, cells })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at integer coordinates, or None outside the map
    pub fn maybe_at(&self, x: i64, y: i64) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.cells[y as usize * self.width + x as usize])
    }

    /// Cell at integer coordinates. Outside the map reads as opaque black,
    /// which collides.
    pub fn at(&self, x: i64, y: i64) -> Color {
        self.maybe_at(x, y).unwrap_or(Color::BLACK)
    }

    /// Is the cell containing this continuous position solid?
    pub fn collides(&self, x: f32, y: f32) -> bool {
        self.at((x + 0.5).floor() as i64, (y + 0.5).floor() as i64).is_solid()
    }

    /// March from (x, y) along (dx, dy) in fixed sub-cell steps.
    ///
    /// Occupancy is only tested when the step enters a new cell. Returns the
    /// first solid cell, or None once `max_distance` is covered or the ray
    /// leaves the map. A zero direction never hits.
    pub fn raycast(&self, x: f32, y: f32, dx: f32, dy: f32, max_distance: f32) -> Option<RayHit> {
        let len = dx.hypot(dy);
        if !(len > f32::EPSILON) {
            return None;
        }

        let steps = RENDER_STEPS as f32;
        let step_x = dx / (len * steps);
        let step_y = dy / (len * steps);

        // Any ray leaves the map within width + height cells
        let bound = (self.width + self.height + 2) as f32 * steps;
        let iters = if max_distance.is_finite() {
            (max_distance.max(0.0) * steps).min(bound) as u32
        } else {
            bound as u32
        };

        let mut cx = x + 0.5;
        let mut cy = y + 0.5;
        let mut cell: Option<(i64, i64)> = None;
        for i in 0..iters {
            cx += step_x;
            cy += step_y;
            let next = (cx.floor() as i64, cy.floor() as i64);
            if cell == Some(next) {
                continue;
            }
            cell = Some(next);

            let color = self.maybe_at(next.0, next.1)?;
            if !color.is_solid() {
                continue;
            }
            return Some(RayHit {
                dist: (i + 1) as f32 / steps,
                color,
            });
        }
        None
    }

    /// Build a map from ASCII rows: `#` solid gray wall, anything else empty.
    #[cfg(test)]
    pub fn from_ascii(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut cells = vec![Color::TRANSPARENT; width * height];
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    cells[y * width + x] = Color::new(128, 128, 128);
                }
            }
        }
        Self { width, height, cells }
    }
}
