//! Per-shape overrides.
//!
//! Overrides are keyed by shape index and applied at render time only; the
//! generated list itself is never edited. Two sources exist: overrides
//! persisted in the layer config and transient ones supplied with a frame
//! request (an in-progress drag, for example). They merge field by field,
//! transient values winning.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::color::Srgb;
use crate::shape::ShapeData;

/// Optional edits to one generated shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeOverride {
    /// Horizontal position in percent of the canvas width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Vertical position in percent of the canvas height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Multiplier on the generated size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// Absolute rotation in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Srgb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    /// Kind tag of the shape this override was authored against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
}

impl ShapeOverride {
    /// An empty override anchored to `shape`'s kind.
    pub fn anchored_to(shape: &ShapeData) -> Self {
        Self {
            anchor: Some(shape.kind.tag().to_string()),
            ..Self::default()
        }
    }

    /// Field-wise merge: every field set on `top` replaces the one on `self`.
    pub fn layered(&self, top: &ShapeOverride) -> ShapeOverride {
        ShapeOverride {
            x: top.x.or(self.x),
            y: top.y.or(self.y),
            size: top.size.or(self.size),
            rotation: top.rotation.or(self.rotation),
            color: top.color.or(self.color),
            hidden: top.hidden.or(self.hidden),
            anchor: top.anchor.clone().or_else(|| self.anchor.clone()),
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden.unwrap_or(false)
    }

    /// Whether the override may bind to `shape`. Unanchored overrides bind
    /// to whatever sits at their index.
    pub fn matches(&self, shape: &ShapeData) -> bool {
        self.anchor
            .as_deref()
            .map_or(true, |tag| tag == shape.kind.tag())
    }

    /// Applies the override; `None` means the shape is hidden.
    ///
    /// An anchored override that no longer matches the shape's kind is
    /// ignored.
    pub fn apply(&self, mut shape: ShapeData, width: f64, height: f64) -> Option<ShapeData> {
        if !self.matches(&shape) {
            tracing::debug!(
                index = shape.index,
                anchor = self.anchor.as_deref().unwrap_or_default(),
                found = shape.kind.tag(),
                "ignoring stale override"
            );
            return Some(shape);
        }
        if self.is_hidden() {
            return None;
        }
        if let Some(x) = self.x {
            shape.position.x = x / 100.0 * width;
        }
        if let Some(y) = self.y {
            shape.position.y = y / 100.0 * height;
        }
        if let Some(mult) = self.size {
            shape.size *= mult.max(0.0);
        }
        if let Some(rotation) = self.rotation {
            shape.rotation = rotation;
        }
        if let Some(color) = self.color {
            shape.color = color;
        }
        Some(shape)
    }
}

pub type OverrideMap = BTreeMap<usize, ShapeOverride>;

/// Merges persisted and transient maps; transient entries win field-wise.
pub fn merge(persisted: &OverrideMap, transient: &OverrideMap) -> OverrideMap {
    let mut merged = persisted.clone();
    for (&index, top) in transient {
        let entry = merged.entry(index).or_default();
        *entry = entry.layered(top);
    }
    merged
}

/// Applies `overrides` to a shape list, dropping hidden shapes.
pub fn apply_all(
    shapes: Vec<ShapeData>,
    overrides: &OverrideMap,
    width: f64,
    height: f64,
) -> Vec<ShapeData> {
    if overrides.is_empty() {
        return shapes;
    }
    shapes
        .into_iter()
        .filter_map(|shape| match overrides.get(&shape.index) {
            Some(ov) => ov.apply(shape, width, height),
            None => Some(shape),
        })
        .collect()
}

/// Indices of overrides that cannot bind: no shape at the index, or an
/// anchor naming a different kind.
pub fn stale_overrides(shapes: &[ShapeData], overrides: &OverrideMap) -> Vec<usize> {
    overrides
        .iter()
        .filter(|(index, ov)| {
            shapes
                .iter()
                .find(|s| s.index == **index)
                .map_or(true, |s| !ov.matches(s))
        })
        .map(|(&index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeKind;
    use glam::DVec2;

    fn shapes() -> Vec<ShapeData> {
        [ShapeKind::Circle, ShapeKind::Square, ShapeKind::Heart]
            .into_iter()
            .enumerate()
            .map(|(i, kind)| {
                let mut s = ShapeData::new(kind, DVec2::new(10.0, 10.0), 20.0, Srgb::BLACK);
                s.index = i;
                s
            })
            .collect()
    }

    #[test]
    fn transient_wins_field_wise() {
        let persisted = OverrideMap::from([(
            1,
            ShapeOverride {
                x: Some(10.0),
                size: Some(2.0),
                ..Default::default()
            },
        )]);
        let transient = OverrideMap::from([(
            1,
            ShapeOverride {
                x: Some(90.0),
                ..Default::default()
            },
        )]);
        let merged = merge(&persisted, &transient);
        assert_eq!(merged[&1].x, Some(90.0));
        assert_eq!(merged[&1].size, Some(2.0));
    }

    #[test]
    fn apply_uses_percent_positions_and_size_multiplier() {
        let ov = ShapeOverride {
            x: Some(50.0),
            y: Some(25.0),
            size: Some(1.5),
            rotation: Some(45.0),
            color: Some(Srgb::WHITE),
            ..Default::default()
        };
        let s = ov.apply(shapes()[0].clone(), 200.0, 400.0).unwrap();
        assert_eq!(s.position, DVec2::new(100.0, 100.0));
        assert_eq!(s.size, 30.0);
        assert_eq!(s.rotation, 45.0);
        assert_eq!(s.color, Srgb::WHITE);
    }

    #[test]
    fn hidden_shapes_are_dropped() {
        let overrides = OverrideMap::from([(
            2,
            ShapeOverride {
                hidden: Some(true),
                ..Default::default()
            },
        )]);
        let out = apply_all(shapes(), &overrides, 100.0, 100.0);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|s| s.index != 2));
    }

    #[test]
    fn transient_can_unhide() {
        let persisted = OverrideMap::from([(
            0,
            ShapeOverride {
                hidden: Some(true),
                ..Default::default()
            },
        )]);
        let transient = OverrideMap::from([(
            0,
            ShapeOverride {
                hidden: Some(false),
                ..Default::default()
            },
        )]);
        let out = apply_all(shapes(), &merge(&persisted, &transient), 100.0, 100.0);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn mismatched_anchor_is_ignored_and_reported() {
        let circle = &shapes()[0];
        let mut ov = ShapeOverride::anchored_to(circle);
        ov.hidden = Some(true);
        let overrides = OverrideMap::from([(0, ov.clone()), (1, ov), (9, ShapeOverride::default())]);

        let out = apply_all(shapes(), &overrides, 100.0, 100.0);
        // Shape 0 is the circle and gets hidden; shape 1 is a square and keeps drawing.
        assert_eq!(out.iter().map(|s| s.index).collect::<Vec<_>>(), [1, 2]);
        assert_eq!(stale_overrides(&shapes(), &overrides), [1, 9]);
    }

    #[test]
    fn empty_override_serializes_to_empty_object() {
        assert_eq!(serde_json::to_string(&ShapeOverride::default()).unwrap(), "{}");
        let ov: ShapeOverride = serde_json::from_str(r##"{"color": "#ff0000"}"##).unwrap();
        assert_eq!(ov.color.map(Srgb::to_hex).as_deref(), Some("#ff0000"));
    }
}
