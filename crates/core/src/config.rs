//! Per-layer configuration.
//!
//! [`LayerConfig`] is the whole input of one generation pass. Every field has
//! a default and the struct is `#[serde(default)]`, so partial JSON documents
//! (older presets, hand-written configs) load without ceremony.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::color::Srgb;
use crate::overrides::ShapeOverride;
use crate::palette::Palette;
use crate::shape::ShapeType;
use crate::state::BlendMode;

/// Pattern style: selects the generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Style {
    #[default]
    Scatter,
    Geometric,
    Organic,
    Confetti,
    Bauhaus,
    Memphis,
    Grid,
    Mosaic,
    Hex,
    Isometric,
    Radial,
    Wave,
    Truchet,
    Guilloche,
    Herringbone,
    Chevron,
    BasketWeave,
    Typography,
    Collage,
    Seasonal,
    /// Any unrecognized style name; generates like `Scatter`.
    #[serde(other)]
    Unknown,
}

impl Style {
    /// Every selectable style, in listing order.
    pub const ALL: [Style; 20] = [
        Style::Scatter,
        Style::Geometric,
        Style::Organic,
        Style::Confetti,
        Style::Bauhaus,
        Style::Memphis,
        Style::Grid,
        Style::Mosaic,
        Style::Hex,
        Style::Isometric,
        Style::Radial,
        Style::Wave,
        Style::Truchet,
        Style::Guilloche,
        Style::Herringbone,
        Style::Chevron,
        Style::BasketWeave,
        Style::Typography,
        Style::Collage,
        Style::Seasonal,
    ];

    /// The serialized name of this style.
    pub fn name(self) -> &'static str {
        match self {
            Style::Scatter => "scatter",
            Style::Geometric => "geometric",
            Style::Organic => "organic",
            Style::Confetti => "confetti",
            Style::Bauhaus => "bauhaus",
            Style::Memphis => "memphis",
            Style::Grid => "grid",
            Style::Mosaic => "mosaic",
            Style::Hex => "hex",
            Style::Isometric => "isometric",
            Style::Radial => "radial",
            Style::Wave => "wave",
            Style::Truchet => "truchet",
            Style::Guilloche => "guilloche",
            Style::Herringbone => "herringbone",
            Style::Chevron => "chevron",
            Style::BasketWeave => "basket-weave",
            Style::Typography => "typography",
            Style::Collage => "collage",
            Style::Seasonal => "seasonal",
            Style::Unknown => "unknown",
        }
    }
}

/// Placement strategy used by scatter-family generators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositionType {
    #[default]
    Random,
    Center,
    Frame,
    Diagonal,
    Thirds,
    Bottom,
    Cross,
    XShape,
    Ring,
    SplitV,
    SplitH,
    Corners,
}

impl CompositionType {
    pub const ALL: [CompositionType; 12] = [
        CompositionType::Random,
        CompositionType::Center,
        CompositionType::Frame,
        CompositionType::Diagonal,
        CompositionType::Thirds,
        CompositionType::Bottom,
        CompositionType::Cross,
        CompositionType::XShape,
        CompositionType::Ring,
        CompositionType::SplitV,
        CompositionType::SplitH,
        CompositionType::Corners,
    ];
}

/// Which diagonal the `diagonal` composition follows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagonalDirection {
    /// Top-left to bottom-right.
    #[default]
    Descending,
    /// Bottom-left to top-right.
    Ascending,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionOptions {
    /// Edge band width for `frame`, in percent of each dimension.
    pub margin: f64,
    pub diagonal: DiagonalDirection,
    /// Use the right/bottom half for `split-v`/`split-h`.
    pub invert_split: bool,
}

impl Default for CompositionOptions {
    fn default() -> Self {
        Self {
            margin: 15.0,
            diagonal: DiagonalDirection::Descending,
            invert_split: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrokeMode {
    #[default]
    Fill,
    Stroke,
    /// Each shape flips a coin.
    Mixed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymmetryGroup {
    #[default]
    None,
    Mirror,
    DoubleMirror,
    Kaleidoscope,
}

impl SymmetryGroup {
    /// Number of copies (including the source) the group produces.
    pub fn order(self) -> usize {
        match self {
            SymmetryGroup::None => 1,
            SymmetryGroup::Mirror => 2,
            SymmetryGroup::DoubleMirror => 4,
            SymmetryGroup::Kaleidoscope => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Gap between cells, in pixels at scale 1.
    pub gap: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self { gap: 8.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TruchetOptions {
    /// Cells across the shorter canvas side.
    pub density: u32,
    /// Arc thickness in (0, 1], relative to the arc spacing.
    pub arc_weight: f64,
    /// Concentric arcs per corner (1..=5).
    pub concentric: u8,
    pub double_stroke: bool,
    /// Extra weight a neighbor adds toward the tile continuing its path.
    pub continuity: f64,
}

impl Default for TruchetOptions {
    fn default() -> Self {
        Self {
            density: 8,
            arc_weight: 0.35,
            concentric: 1,
            double_stroke: false,
            continuity: 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CurveType {
    #[default]
    Hypotrochoid,
    Epitrochoid,
    /// Alternate between the two per layer.
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuillocheOptions {
    pub major_radius: f64,
    pub minor_radius: f64,
    pub pen_distance: f64,
    pub layers: u32,
    pub curve: CurveType,
}

impl Default for GuillocheOptions {
    fn default() -> Self {
        Self {
            major_radius: 100.0,
            minor_radius: 40.0,
            pen_distance: 60.0,
            layers: 3,
            curve: CurveType::Hypotrochoid,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TileColorMode {
    #[default]
    Mono,
    Alternating,
    Random,
}

/// Shared options for herringbone, chevron and basket-weave floors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileOptions {
    /// Tile length divided by tile width.
    pub ratio: f64,
    /// Grout gap in pixels at scale 1.
    pub grout: f64,
    pub color_mode: TileColorMode,
}

impl Default for TileOptions {
    fn default() -> Self {
        Self {
            ratio: 3.0,
            grout: 2.0,
            color_mode: TileColorMode::Alternating,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveOptions {
    /// Number of horizontal bands; 0 derives it from complexity.
    pub bands: u32,
    /// Swing of each band as a fraction of the band spacing.
    pub amplitude: f64,
    /// Upper bound on sine cycles across the canvas width.
    pub max_cycles: u32,
}

impl Default for WaveOptions {
    fn default() -> Self {
        Self {
            bands: 0,
            amplitude: 0.35,
            max_cycles: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypographyOptions {
    pub charset: String,
    pub font_family: String,
}

impl Default for TypographyOptions {
    fn default() -> Self {
        Self {
            charset: "ABCDEFGHIJKLMNOPQRSTUVWXYZ&?!#*".to_string(),
            font_family: "sans-serif".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeasonalTheme {
    #[default]
    Winter,
    Spring,
    Summer,
    Autumn,
    Love,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonalOptions {
    pub theme: SeasonalTheme,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextMode {
    /// Drawn over the pattern.
    #[default]
    Normal,
    /// Pattern visible only inside the glyphs.
    Clip,
    /// Glyphs are filled with scattered shapes.
    Mosaic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOverlay {
    pub enabled: bool,
    pub content: String,
    pub font_family: String,
    /// Font size as a fraction of the shorter canvas side.
    pub font_size: f64,
    pub font_weight: u16,
    pub color: Srgb,
    /// Anchor position in percent of the canvas.
    pub x: f64,
    pub y: f64,
    pub mode: TextMode,
    pub blend_mode: BlendMode,
    pub opacity: f64,
    /// Mosaic attempts per base-size cell of canvas area.
    pub mosaic_density: f64,
    /// Glyph alpha (0..1) a mosaic sample needs to be kept.
    pub mosaic_threshold: f64,
}

impl Default for TextOverlay {
    fn default() -> Self {
        Self {
            enabled: false,
            content: String::new(),
            font_family: "sans-serif".to_string(),
            font_size: 0.3,
            font_weight: 800,
            color: Srgb::WHITE,
            x: 50.0,
            y: 50.0,
            mode: TextMode::Normal,
            blend_mode: BlendMode::Normal,
            opacity: 1.0,
            mosaic_density: 4.0,
            mosaic_threshold: 0.5,
        }
    }
}

impl TextOverlay {
    /// Whether there is any text to draw.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.content.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Motion {
    #[default]
    None,
    Orbit,
    Float,
    Scan,
    Pulse,
    Spin,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub enabled: bool,
    pub primary: Motion,
    pub secondary: Motion,
    /// Drives cycle counts (rounded) and motion amplitudes.
    pub intensity: f64,
    /// Loop length in seconds.
    pub duration: f64,
    pub fps: u32,
    pub direction: Direction,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            primary: Motion::Float,
            secondary: Motion::None,
            intensity: 1.0,
            duration: 6.0,
            fps: 30,
            direction: Direction::Forward,
        }
    }
}

/// Everything one layer's generation pass depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    pub seed: u64,
    pub style: Style,
    pub composition: CompositionType,
    pub composition_options: CompositionOptions,
    pub complexity: u32,
    pub scale: f64,
    pub palette: Palette,
    pub stroke_width: f64,
    pub stroke_mode: StrokeMode,
    /// Grain overlay opacity in [0, 1].
    pub texture: f64,
    pub shape_types: Vec<ShapeType>,
    pub grid: GridOptions,
    pub truchet: TruchetOptions,
    pub guilloche: GuillocheOptions,
    pub tiles: TileOptions,
    pub wave: WaveOptions,
    pub typography: TypographyOptions,
    pub seasonal: SeasonalOptions,
    pub symmetry: SymmetryGroup,
    pub text: TextOverlay,
    /// Asset ids used by the collage style.
    pub images: Vec<String>,
    pub animation: AnimationConfig,
    pub overrides: BTreeMap<usize, ShapeOverride>,
    /// Skip this layer's background fill.
    pub transparent: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            style: Style::Scatter,
            composition: CompositionType::Random,
            composition_options: CompositionOptions::default(),
            complexity: 40,
            scale: 1.0,
            palette: Palette::default(),
            stroke_width: 2.0,
            stroke_mode: StrokeMode::Fill,
            texture: 0.0,
            shape_types: Vec::new(),
            grid: GridOptions::default(),
            truchet: TruchetOptions::default(),
            guilloche: GuillocheOptions::default(),
            tiles: TileOptions::default(),
            wave: WaveOptions::default(),
            typography: TypographyOptions::default(),
            seasonal: SeasonalOptions::default(),
            symmetry: SymmetryGroup::None,
            text: TextOverlay::default(),
            images: Vec::new(),
            animation: AnimationConfig::default(),
            overrides: BTreeMap::new(),
            transparent: false,
        }
    }
}

/// Smallest effective `scale`.
pub const MIN_SCALE: f64 = 0.25;

/// Most `base × base` cells a canvas is divided into. Lattice and tile
/// styles place a bounded number of shapes per cell, so this bounds them.
pub const MAX_BASE_CELLS: f64 = 4096.0;

impl LayerConfig {
    /// Shape size unit for a canvas: a tenth of the shorter side, times `scale`.
    ///
    /// `scale` is floored at [`MIN_SCALE`], and the result never drops below
    /// the size that splits the canvas into [`MAX_BASE_CELLS`] cells.
    pub fn base_size(&self, width: f64, height: f64) -> f64 {
        let scale = if self.scale.is_finite() && self.scale > 0.0 {
            self.scale.max(MIN_SCALE)
        } else {
            1.0
        };
        let floor = (width * height / MAX_BASE_CELLS).sqrt();
        (width.min(height) / 10.0 * scale).max(floor)
    }
}
