//! Text mosaic sampler: fills glyphs with scattered shapes.
//!
//! Candidates are drawn uniformly over the canvas from a stream forked off
//! the layer seed, so a mosaic never disturbs the layer's own pattern. A
//! candidate survives when the glyph mask under its center is above the
//! threshold.

use glam::DVec2;
use motif_core::config::LayerConfig;
use motif_core::field::Field;
use motif_core::prng::Xorshift64;
use motif_core::shape::{ShapeData, ShapeType};

use crate::context::GenContext;

/// Salt of the mosaic stream ("mosaic").
const MOSAIC_SALT: u64 = 0x6d6f_7361_6963;
/// Upper bound on candidates per call.
const MAX_ATTEMPTS: usize = 50_000;

const MOSAIC_SHAPES: &[ShapeType] = &[
    ShapeType::Circle,
    ShapeType::Square,
    ShapeType::Triangle,
    ShapeType::Diamond,
    ShapeType::Hexagon,
    ShapeType::Star,
];

/// Number of candidates for a canvas: `density` per `base²` of area.
pub fn attempts(width: f64, height: f64, base: f64, density: f64) -> usize {
    if !(base > 0.0 && density.is_finite() && density > 0.0) {
        return 0;
    }
    let n = (density * width * height / (base * base)).round();
    (n.max(0.0) as usize).min(MAX_ATTEMPTS)
}

/// Scatters shapes inside the glyph `mask`. The mask may have any
/// resolution; canvas points are mapped onto it proportionally.
#[tracing::instrument(level = "debug", skip(mask, config), fields(seed = config.seed))]
pub fn mosaic_scatter(mask: &Field, width: f64, height: f64, config: &LayerConfig) -> Vec<ShapeData> {
    if !(width > 0.0 && height > 0.0) {
        return Vec::new();
    }
    let mut ctx = GenContext::new(width, height, config);
    ctx.rng = Xorshift64::fork(config.seed, MOSAIC_SALT);
    let text = &config.text;
    let n = attempts(width, height, ctx.base, text.mosaic_density);
    let types = ctx.allowed(MOSAIC_SHAPES);
    let sx = mask.width() as f64 / width;
    let sy = mask.height() as f64 / height;

    let mut shapes = Vec::new();
    for _ in 0..n {
        let pos = DVec2::new(ctx.rng.next_f64() * width, ctx.rng.next_f64() * height);
        let kind = ctx.pick_kind(&types);
        let size = ctx.size(0.2, 0.5);
        let rotation = ctx.rng.next_range(0.0, 360.0);
        let shape = ctx.dress(kind, pos, size, rotation);
        if mask.sample(pos.x * sx, pos.y * sy) > text.mosaic_threshold {
            shapes.push(shape);
        }
    }
    tracing::debug!(attempts = n, kept = shapes.len(), "mosaic sampled");
    crate::reindex(shapes)
}
