//! Generated shapes.
//!
//! A generator pass produces an ordered `Vec<ShapeData>`. Each entry carries
//! its placement and dressing plus a [`ShapeKind`] whose variant holds exactly
//! the payload that kind of shape needs.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::color::Srgb;
use crate::prng::Xorshift64;

/// One of the two quarter-arc truchet tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TruchetVariant {
    /// Arcs join north↔east and south↔west.
    NeSw,
    /// Arcs join north↔west and east↔south.
    NwSe,
}

/// Truchet tile geometry. `size` on the owning shape is the cell edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TruchetTile {
    pub variant: TruchetVariant,
    /// Arc band thickness as a fraction of the spacing between concentric arcs.
    pub arc_weight: f64,
    /// Number of concentric arcs per corner (1..=5).
    pub concentric: u8,
    /// Draw each arc as an outlined band instead of a single line.
    pub double_stroke: bool,
    /// Line width used for the arcs, in pixels.
    pub stroke_weight: f64,
    /// Cell height over cell width. Grids stretch their cells slightly so a
    /// whole number of them spans the canvas.
    #[serde(default = "unit_stretch")]
    pub stretch: f64,
}

fn unit_stretch() -> f64 {
    1.0
}

/// A horizontal ribbon bounded by two sine curves offset by `thickness`.
///
/// `length` equals the canvas width; with an integer `cycles` count both
/// ends of the band meet at the same height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveBand {
    pub length: f64,
    pub amplitude: f64,
    pub cycles: u32,
    pub thickness: f64,
    /// Phase in radians.
    pub phase: f64,
}

impl WaveBand {
    /// Angular frequency chosen so the band repeats exactly across `length`.
    pub fn frequency(&self) -> f64 {
        f64::from(self.cycles) * std::f64::consts::TAU / self.length.max(1.0)
    }

    /// Center-line height at local x (relative to the band's left edge).
    pub fn center_y(&self, x: f64) -> f64 {
        self.amplitude * (self.frequency() * x + self.phase).sin()
    }
}

/// A sampled closed guilloché curve, in coordinates local to the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuillochePath {
    pub points: Vec<DVec2>,
    pub stroke_weight: f64,
}

/// Shape geometry, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ShapeKind {
    Circle,
    Square,
    Triangle,
    Diamond,
    Hexagon,
    Polygon { sides: u8 },
    Star { points: u8 },
    Ring,
    Cross,
    Heart,
    Line,
    Arc,
    SemiCircle,
    QuarterCircle,
    Squiggle,
    Zigzag,
    Spiral,
    Blob { lobes: u8, wobble: u32 },
    Flower { petals: u8 },
    Leaf,
    Snowflake,
    PineTree,
    Pumpkin,
    Sun,
    Moon,
    Cloud,
    Raindrop,
    Character { ch: char },
    Image { asset_id: String },
    Wave(WaveBand),
    TruchetTile(TruchetTile),
    Guilloche(GuillochePath),
    /// A quadrilateral floor tile; corners are local to the shape position.
    Tile { corners: [DVec2; 4] },
    /// Placeholder for unrecognized shape types; draws nothing.
    Blank,
}

impl ShapeKind {
    /// Stable kebab-case tag for this kind (matches the serde tag).
    pub fn tag(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Square => "square",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Diamond => "diamond",
            ShapeKind::Hexagon => "hexagon",
            ShapeKind::Polygon { .. } => "polygon",
            ShapeKind::Star { .. } => "star",
            ShapeKind::Ring => "ring",
            ShapeKind::Cross => "cross",
            ShapeKind::Heart => "heart",
            ShapeKind::Line => "line",
            ShapeKind::Arc => "arc",
            ShapeKind::SemiCircle => "semi-circle",
            ShapeKind::QuarterCircle => "quarter-circle",
            ShapeKind::Squiggle => "squiggle",
            ShapeKind::Zigzag => "zigzag",
            ShapeKind::Spiral => "spiral",
            ShapeKind::Blob { .. } => "blob",
            ShapeKind::Flower { .. } => "flower",
            ShapeKind::Leaf => "leaf",
            ShapeKind::Snowflake => "snowflake",
            ShapeKind::PineTree => "pine-tree",
            ShapeKind::Pumpkin => "pumpkin",
            ShapeKind::Sun => "sun",
            ShapeKind::Moon => "moon",
            ShapeKind::Cloud => "cloud",
            ShapeKind::Raindrop => "raindrop",
            ShapeKind::Character { .. } => "character",
            ShapeKind::Image { .. } => "image",
            ShapeKind::Wave(_) => "wave",
            ShapeKind::TruchetTile(_) => "truchet-tile",
            ShapeKind::Guilloche(_) => "guilloche",
            ShapeKind::Tile { .. } => "tile",
            ShapeKind::Blank => "blank",
        }
    }

    /// Shapes that are drawn as open strokes whatever the stroke flag says.
    pub fn is_linear(&self) -> bool {
        matches!(
            self,
            ShapeKind::Line
                | ShapeKind::Arc
                | ShapeKind::Squiggle
                | ShapeKind::Zigzag
                | ShapeKind::Spiral
                | ShapeKind::TruchetTile(_)
                | ShapeKind::Guilloche(_)
        )
    }
}

/// User-facing shape names used in allow-lists.
///
/// Anything unrecognized deserializes to [`ShapeType::Unknown`], which
/// generates a [`ShapeKind::Blank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeType {
    Circle,
    Square,
    Triangle,
    Diamond,
    Hexagon,
    Pentagon,
    Octagon,
    Star,
    Ring,
    Cross,
    Heart,
    Line,
    Arc,
    SemiCircle,
    QuarterCircle,
    Squiggle,
    Zigzag,
    Spiral,
    Blob,
    Flower,
    Leaf,
    Snowflake,
    PineTree,
    Pumpkin,
    Sun,
    Moon,
    Cloud,
    Raindrop,
    #[serde(other)]
    Unknown,
}

impl ShapeType {
    /// Builds the concrete kind, drawing any per-instance payload from `rng`.
    ///
    /// Star and blob draw from the stream; every other type leaves it untouched.
    pub fn instantiate(self, rng: &mut Xorshift64) -> ShapeKind {
        match self {
            ShapeType::Circle => ShapeKind::Circle,
            ShapeType::Square => ShapeKind::Square,
            ShapeType::Triangle => ShapeKind::Triangle,
            ShapeType::Diamond => ShapeKind::Diamond,
            ShapeType::Hexagon => ShapeKind::Hexagon,
            ShapeType::Pentagon => ShapeKind::Polygon { sides: 5 },
            ShapeType::Octagon => ShapeKind::Polygon { sides: 8 },
            ShapeType::Star => ShapeKind::Star {
                points: 4 + rng.next_usize(4) as u8,
            },
            ShapeType::Ring => ShapeKind::Ring,
            ShapeType::Cross => ShapeKind::Cross,
            ShapeType::Heart => ShapeKind::Heart,
            ShapeType::Line => ShapeKind::Line,
            ShapeType::Arc => ShapeKind::Arc,
            ShapeType::SemiCircle => ShapeKind::SemiCircle,
            ShapeType::QuarterCircle => ShapeKind::QuarterCircle,
            ShapeType::Squiggle => ShapeKind::Squiggle,
            ShapeType::Zigzag => ShapeKind::Zigzag,
            ShapeType::Spiral => ShapeKind::Spiral,
            ShapeType::Blob => ShapeKind::Blob {
                lobes: 5 + rng.next_usize(4) as u8,
                wobble: rng.next_u64() as u32,
            },
            ShapeType::Flower => ShapeKind::Flower { petals: 6 },
            ShapeType::Leaf => ShapeKind::Leaf,
            ShapeType::Snowflake => ShapeKind::Snowflake,
            ShapeType::PineTree => ShapeKind::PineTree,
            ShapeType::Pumpkin => ShapeKind::Pumpkin,
            ShapeType::Sun => ShapeKind::Sun,
            ShapeType::Moon => ShapeKind::Moon,
            ShapeType::Cloud => ShapeKind::Cloud,
            ShapeType::Raindrop => ShapeKind::Raindrop,
            ShapeType::Unknown => ShapeKind::Blank,
        }
    }
}

/// One generated shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeData {
    /// Position in the generation pass; the key for overrides.
    pub index: usize,
    pub kind: ShapeKind,
    pub position: DVec2,
    pub size: f64,
    /// Degrees, clockwise in screen space.
    pub rotation: f64,
    pub color: Srgb,
    pub stroke: bool,
    pub stroke_width: f64,
    /// Local horizontal flip applied before rotation (set by symmetry).
    #[serde(default)]
    pub mirrored: bool,
    /// Integer multiplier on every animation cycle count.
    pub speed_factor: u32,
    /// Radians.
    pub phase_offset: f64,
}

impl ShapeData {
    /// A shape with neutral dressing; generators fill in the rest.
    pub fn new(kind: ShapeKind, position: DVec2, size: f64, color: Srgb) -> Self {
        Self {
            index: 0,
            kind,
            position,
            size,
            rotation: 0.0,
            color,
            stroke: false,
            stroke_width: 1.0,
            mirrored: false,
            speed_factor: 1,
            phase_offset: 0.0,
        }
    }

    /// Conservative radius of the circle containing the drawn shape.
    ///
    /// Wave ribbons use their full size (band thickness plus swing); every
    /// other kind uses `size / 1.5`.
    pub fn bounding_radius(&self) -> f64 {
        match self.kind {
            ShapeKind::Wave(_) => self.size,
            _ => self.size / 1.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_matches_serde_tag() {
        let kinds = [
            ShapeKind::Circle,
            ShapeKind::SemiCircle,
            ShapeKind::PineTree,
            ShapeKind::Polygon { sides: 5 },
            ShapeKind::Character { ch: 'A' },
            ShapeKind::Blank,
        ];
        for kind in kinds {
            let v = serde_json::to_value(&kind).unwrap();
            assert_eq!(v["type"], kind.tag());
        }
    }

    #[test]
    fn unknown_shape_type_deserializes_and_instantiates_blank() {
        let t: ShapeType = serde_json::from_str("\"hyperboloid\"").unwrap();
        assert_eq!(t, ShapeType::Unknown);
        let mut rng = Xorshift64::new(1);
        assert_eq!(t.instantiate(&mut rng), ShapeKind::Blank);
    }

    #[test]
    fn star_points_stay_in_range() {
        let mut rng = Xorshift64::new(11);
        for _ in 0..100 {
            match ShapeType::Star.instantiate(&mut rng) {
                ShapeKind::Star { points } => assert!((4..8).contains(&points)),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn wave_bounding_radius_uses_full_size() {
        let band = WaveBand {
            length: 100.0,
            amplitude: 5.0,
            cycles: 2,
            thickness: 10.0,
            phase: 0.0,
        };
        let wave = ShapeData::new(ShapeKind::Wave(band), DVec2::ZERO, 30.0, Srgb::BLACK);
        let dot = ShapeData::new(ShapeKind::Circle, DVec2::ZERO, 30.0, Srgb::BLACK);
        assert_eq!(wave.bounding_radius(), 30.0);
        assert_eq!(dot.bounding_radius(), 20.0);
    }

    #[test]
    fn wave_band_closes_across_length() {
        let band = WaveBand {
            length: 640.0,
            amplitude: 12.0,
            cycles: 3,
            thickness: 20.0,
            phase: 1.1,
        };
        assert!((band.center_y(0.0) - band.center_y(640.0)).abs() < 1e-9);
    }

    #[test]
    fn shape_data_serde_round_trip() {
        let mut s = ShapeData::new(
            ShapeKind::TruchetTile(TruchetTile {
                variant: TruchetVariant::NwSe,
                arc_weight: 0.4,
                concentric: 3,
                double_stroke: true,
                stroke_weight: 2.0,
                stretch: 1.0,
            }),
            DVec2::new(10.0, 20.0),
            40.0,
            Srgb::from_hex("#abcdef").unwrap(),
        );
        s.index = 7;
        let json = serde_json::to_string(&s).unwrap();
        let back: ShapeData = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, s.kind);
        assert_eq!(back.index, 7);
        assert_eq!(back.position, s.position);
    }
}
