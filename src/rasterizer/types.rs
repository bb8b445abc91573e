//! Core pixel types

use serde::{Deserialize, Serialize};

/// 8-bit RGBA color.
///
/// For level cells the alpha channel doubles as solidity: alpha >= 0x80
/// means the cell blocks movement and rays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 0xff };
    pub const WHITE: Color = Color { r: 0xff, g: 0xff, b: 0xff, a: 0xff };
    /// Fully transparent, non-solid
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };
    /// Drawn in place of sprite sheets that failed to load
    pub const PLACEHOLDER: Color = Color { r: 0xff, g: 0, b: 0xff, a: 0xff };

    /// Alpha threshold at which a cell or sprite pixel counts as opaque
    pub const SOLID_ALPHA: u8 = 0x80;

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self { r: bytes[0], g: bytes[1], b: bytes[2], a: bytes[3] }
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn is_solid(self) -> bool {
        self.a >= Self::SOLID_ALPHA
    }

    /// Parse the color notations used by level metadata:
    /// `#rgb`, `#rrggbb` and `rgb(r, g, b)`.
    pub fn parse_css(s: &str) -> Option<Color> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return match hex.len() {
                3 => {
                    let mut out = [0u8; 3];
                    for (i, ch) in hex.chars().enumerate() {
                        let v = ch.to_digit(16)? as u8;
                        out[i] = v * 17;
                    }
                    Some(Color::new(out[0], out[1], out[2]))
                }
                6 => {
                    let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
                    let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
                    let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
                    Some(Color::new(r, g, b))
                }
                _ => None,
            };
        }

        let inner = s.strip_prefix("rgb(")?.strip_suffix(')')?;
        let mut parts = inner.split(',').map(|p| p.trim().parse::<u8>());
        let r = parts.next()?.ok()?;
        let g = parts.next()?.ok()?;
        let b = parts.next()?.ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Color::new(r, g, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_css_forms() {
        assert_eq!(Color::parse_css("#ff8000"), Some(Color::new(255, 128, 0)));
        assert_eq!(Color::parse_css("#f80"), Some(Color::new(255, 136, 0)));
        assert_eq!(Color::parse_css("rgb(1, 2, 3)"), Some(Color::new(1, 2, 3)));
        assert_eq!(Color::parse_css("skyblue"), None);
        assert_eq!(Color::parse_css("#12345"), None);
        assert_eq!(Color::parse_css("rgb(1,2)"), None);
    }

    #[test]
    fn test_solid_threshold() {
        assert!(Color::rgba(0, 0, 0, 0x80).is_solid());
        assert!(!Color::rgba(0, 0, 0, 0x7f).is_solid());
        assert!(!Color::TRANSPARENT.is_solid());
    }
}
