//! Special markers
//!
//! Cells with red = 0xFF, blue = 0xFF and alpha = 0xFF are markers; the
//! green channel is an id looked up in the level metadata's specials table.
//! Markers are pulled out once at load time and their cells cleared, so the
//! map never carries a marker at runtime.

use std::collections::HashMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;
use crate::rasterizer::Color;

/// Key-value parameters attached to a special
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn f32(&self, key: &str) -> Option<f32> {
        self.0.get(key).and_then(Value::as_f64).map(|v| v as f32)
    }
}

/// A decoded marker: grid position, type tag, parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Special {
    pub x: usize,
    pub y: usize,
    pub kind: String,
    pub params: Params,
}

/// Entry in the metadata specials table: a bare type string, or an object
/// with `type` plus extra parameters passed through to the spawned entity
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SpecialSpec {
    Bare(String),
    Detailed(Map<String, Value>),
}

impl SpecialSpec {
    /// Split into (type, params). None if an object form has no string `type`.
    pub fn to_parts(&self) -> Option<(String, Params)> {
        match self {
            SpecialSpec::Bare(kind) => Some((kind.clone(), Params::default())),
            SpecialSpec::Detailed(map) => {
                let kind = map.get("type")?.as_str()?.to_string();
                Some((kind, Params::new(map.clone())))
            }
        }
    }
}

pub fn is_marker(c: Color) -> bool {
    c.r == 0xff && c.b == 0xff && c.a == 0xff
}

/// Pull every marker out of `cells`, clearing each marker cell to
/// transparent. Unknown ids are warned about and still cleared.
pub fn extract_specials(
    width: usize,
    cells: &mut [Color],
    table: &HashMap<u8, SpecialSpec>,
) -> Vec<Special> {
    let mut specials = Vec::new();
    if width == 0 {
        return specials;
    }

    for (i, cell) in cells.iter_mut().enumerate() {
        if !is_marker(*cell) {
            continue;
        }
        let id = cell.g;
        let (x, y) = (i % width, i / width);
        *cell = Color::TRANSPARENT;

        let Some(spec) = table.get(&id) else {
            warn!(id = %format!("{:02x}", id), x, y, "unknown special id");
            continue;
        };
        let Some((kind, params)) = spec.to_parts() else {
            warn!(id = %format!("{:02x}", id), x, y, "special spec has no type");
            continue;
        };
        specials.push(Special { x, y, kind, params });
    }
    specials
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(id: u8) -> Color {
        Color::rgba(0xff, id, 0xff, 0xff)
    }

    #[test]
    fn test_extract_clears_every_marker() {
        let mut cells = vec![
            Color::TRANSPARENT, marker(1), Color::new(10, 10, 10),
            marker(2), marker(9), Color::TRANSPARENT,
        ];
        let mut table = HashMap::new();
        table.insert(1, SpecialSpec::Bare("zomboid".into()));
        let detailed: Map<String, Value> =
            serde_json::from_str(r#"{"type": "entry", "name": "north", "angle": 90}"#).unwrap();
        table.insert(2, SpecialSpec::Detailed(detailed));

        let specials = extract_specials(3, &mut cells, &table);

        assert!(cells.iter().all(|c| !is_marker(*c)));
        assert_eq!(cells[1], Color::TRANSPARENT);
        assert_eq!(cells[4], Color::TRANSPARENT); // unknown id 9, still cleared
        assert_eq!(specials.len(), 2);
        assert_eq!(specials[0].kind, "zomboid");
        assert_eq!((specials[0].x, specials[0].y), (1, 0));
        assert_eq!(specials[1].kind, "entry");
        assert_eq!((specials[1].x, specials[1].y), (0, 1));
        assert_eq!(specials[1].params.str("name"), Some("north"));
        assert_eq!(specials[1].params.f32("angle"), Some(90.0));
    }

    #[test]
    fn test_marker_requires_full_alpha() {
        assert!(is_marker(marker(7)));
        assert!(!is_marker(Color::rgba(0xff, 7, 0xff, 0x80)));
        assert!(!is_marker(Color::rgba(0xfe, 7, 0xff, 0xff)));
    }

    #[test]
    fn test_spec_untagged_forms() {
        let bare: SpecialSpec = serde_json::from_str(r#""sprite""#).unwrap();
        assert_eq!(bare.to_parts().unwrap().0, "sprite");
        let obj: SpecialSpec = serde_json::from_str(r#"{"type": "pickup", "name": "blue key"}"#).unwrap();
        let (kind, params) = obj.to_parts().unwrap();
        assert_eq!(kind, "pickup");
        assert_eq!(params.str("name"), Some("blue key"));
        let untyped: SpecialSpec = serde_json::from_str(r#"{"name": "x"}"#).unwrap();
        assert!(untyped.to_parts().is_none());
    }
}
