//! Planar vector math for the tile world
//!
//! World coordinates are in cell units. Angle 0 faces -y, and angles grow
//! clockwise when viewed with +y pointing down the map image.

use std::f32::consts::PI;
use std::ops::{Add, Mul, Sub};
use serde::{Deserialize, Serialize};

/// 2D vector in world space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit view direction for a facing angle
    pub fn from_angle(angle: f32) -> Self {
        Self { x: angle.sin(), y: -angle.cos() }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn len(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn len_sq(self) -> f32 {
        self.dot(self)
    }

    pub fn normalize(self) -> Vec2 {
        let l = self.len();
        if l == 0.0 {
            return Vec2::ZERO;
        }
        Vec2 {
            x: self.x / l,
            y: self.y / l,
        }
    }

    /// Rotate by `angle` radians
    pub fn rotate(self, angle: f32) -> Vec2 {
        let (s, c) = angle.sin_cos();
        Vec2 {
            x: self.x * c - self.y * s,
            y: self.x * s + self.y * c,
        }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).len()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f32) -> Vec2 {
        Vec2 {
            x: self.x * s,
            y: self.y * s,
        }
    }
}

/// Normalize an angle into (-PI, PI]
pub fn norm_angle(mut angle: f32) -> f32 {
    while angle <= -PI {
        angle += PI * 2.0;
    }
    while angle > PI {
        angle -= PI * 2.0;
    }
    angle
}

/// Math-convention angle (atan2) of the vector from `a` to `b`.
/// Coincident points give 0.
pub fn angle_between(a: Vec2, b: Vec2) -> f32 {
    let d = b - a;
    if d.x == 0.0 && d.y == 0.0 {
        return 0.0;
    }
    d.y.atan2(d.x)
}

/// Remove fisheye from a straight-line distance seen at `ray_angle` off the view axis
pub fn corrected_distance(dist: f32, ray_angle: f32) -> f32 {
    (PI / 2.0 - ray_angle.abs()).sin() * dist
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_norm_angle_range() {
        for raw in [-10.0f32, -PI, -1.0, 0.0, 1.0, PI, 7.5, 100.0] {
            let a = norm_angle(raw);
            assert!(a > -PI - 1e-5 && a <= PI + 1e-5, "{} -> {}", raw, a);
            // Same direction as the input
            assert!((a.sin() - raw.sin()).abs() < 1e-3);
            assert!((a.cos() - raw.cos()).abs() < 1e-3);
        }
    }

    #[test]
    fn test_from_angle_faces_up_at_zero() {
        let d = Vec2::from_angle(0.0);
        assert!(d.x.abs() < 1e-6);
        assert!((d.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_angle_between_coincident_is_zero() {
        let p = Vec2::new(3.0, 4.0);
        assert_eq!(angle_between(p, p), 0.0);
    }

    #[test]
    fn test_corrected_distance_on_axis_is_unchanged() {
        assert!((corrected_distance(4.0, 0.0) - 4.0).abs() < 1e-6);
        assert!(corrected_distance(4.0, 0.5) < 4.0);
        assert!((corrected_distance(4.0, 0.5) - corrected_distance(4.0, -0.5)).abs() < 1e-6);
    }
}
