//! Collision System
//!
//! Axis-separated slide collision against the level map. Each axis is
//! resolved on its own, so a body pushing diagonally into a wall keeps
//! sliding along it.

use crate::rasterizer::Vec2;
use crate::world::LevelMap;

/// Clearance kept between a body and the wall it moves toward
pub const SKIN: f32 = 0.2;

/// Where a blocked body is parked inside its cell, per direction of travel.
/// The positive-y stop differs from positive-x on purpose; it keeps bodies
/// from sticking on corners.
const STOP_NEG: f32 = 0.7;
const STOP_POS_X: f32 = 0.3;
const STOP_POS_Y: f32 = 0.4;

/// Move `pos` by (dx, dy), sliding along walls.
///
/// A blocked axis is parked at a fixed offset inside its cell. When that
/// offset would land in a solid cell (the body sits in the upper half of a
/// narrow gap) the axis stays where it is.
///
/// Returns true if either axis was blocked.
pub fn move_and_slide(level: &LevelMap, pos: &mut Vec2, dx: f32, dy: f32) -> bool {
    let mut hit = false;

    if dx != 0.0 {
        let (probe, stop) = if dx < 0.0 {
            (pos.x + dx - SKIN, STOP_NEG)
        } else {
            (pos.x + dx + SKIN, STOP_POS_X)
        };
        if level.collides(probe, pos.y) {
            hit = true;
            let parked = pos.x.floor() + stop;
            if !level.collides(parked, pos.y) {
                pos.x = parked;
            }
        } else {
            pos.x += dx;
        }
    }

    if dy != 0.0 {
        let (probe, stop) = if dy < 0.0 {
            (pos.y + dy - SKIN, STOP_NEG)
        } else {
            (pos.y + dy + SKIN, STOP_POS_Y)
        };
        if level.collides(pos.x, probe) {
            hit = true;
            let parked = pos.y.floor() + stop;
            if !level.collides(pos.x, parked) {
                pos.y = parked;
            }
        } else {
            pos.y += dy;
        }
    }

    hit
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> LevelMap {
        LevelMap::from_ascii(&[
            "########",
            "#......#",
            "#......#",
            "#......#",
            "########",
        ])
    }

    #[test]
    fn test_free_move_applies_delta() {
        let map = corridor();
        let mut pos = Vec2::new(3.0, 2.0);
        assert!(!move_and_slide(&map, &mut pos, 0.1, -0.1));
        assert!((pos.x - 3.1).abs() < 1e-6);
        assert!((pos.y - 1.9).abs() < 1e-6);
    }

    #[test]
    fn test_blocked_axis_stays_out_of_wall() {
        let map = corridor();
        let mut pos = Vec2::new(6.2, 2.0);
        assert!(move_and_slide(&map, &mut pos, 0.2, 0.0));
        assert!(!map.collides(pos.x, pos.y));
        assert!((pos.x - 6.3).abs() < 1e-6);

        let mut pos = Vec2::new(1.0, 1.0);
        assert!(move_and_slide(&map, &mut pos, -0.35, -0.35));
        assert!(!map.collides(pos.x, pos.y));
        assert!((pos.x - 1.7).abs() < 1e-6);
        assert!((pos.y - 1.7).abs() < 1e-6);
    }

    #[test]
    fn test_diagonal_into_wall_slides() {
        let map = corridor();
        // Pressed against the top wall, moving up and right
        let mut pos = Vec2::new(3.0, 1.0);
        let hit = move_and_slide(&map, &mut pos, 0.25, -0.35);
        assert!(hit);
        assert!((pos.x - 3.25).abs() < 1e-6, "x should keep moving: {}", pos.x);
        assert!((pos.y - 1.7).abs() < 1e-6);
        assert!(!map.collides(pos.x, pos.y));
    }

    #[test]
    fn test_positive_y_stop_is_asymmetric() {
        let map = corridor();
        let mut pos = Vec2::new(3.0, 3.2);
        assert!(move_and_slide(&map, &mut pos, 0.0, 0.2));
        assert!((pos.y - 3.4).abs() < 1e-6);
    }

    #[test]
    fn test_narrow_corridor_never_parks_in_wall() {
        let map = LevelMap::from_ascii(&[
            "###",
            "#.#",
            "#.#",
            "#.#",
            "###",
        ]);

        // Parking at floor + 0.7 would put this body in column 2
        let mut pos = Vec2::new(1.0, 2.0);
        assert!(move_and_slide(&map, &mut pos, -0.42, 0.0));
        assert_eq!(pos, Vec2::new(1.0, 2.0));

        // Sweep the open cell at top diagonal speed in both directions
        for i in 0..=18 {
            let start = 0.55 + i as f32 * 0.05;
            for dx in [-0.42, 0.42] {
                let mut pos = Vec2::new(start, 2.0);
                move_and_slide(&map, &mut pos, dx, 0.0);
                assert!(!map.collides(pos.x, pos.y), "start {} dx {} ended at {}", start, dx, pos.x);
            }
        }
    }

    #[test]
    fn test_zero_delta_never_hits() {
        let map = corridor();
        let mut pos = Vec2::new(1.0, 1.0);
        assert!(!move_and_slide(&map, &mut pos, 0.0, 0.0));
        assert_eq!(pos, Vec2::new(1.0, 1.0));
    }
}
