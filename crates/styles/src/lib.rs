#![deny(unsafe_code)]
//! Style registry: maps a layer's [`Style`] to its generator.
//!
//! Sits between `motif-core` (shape model, composition, symmetry) and the
//! algorithm crates (`motif-truchet`, `motif-guilloche`). The renderer and
//! the CLI both call [`generate`] so dispatch lives in one place.

pub mod context;
pub mod lattice;
pub mod maze;
pub mod mosaic;
pub mod rosette;
pub mod scatter;
pub mod text_mosaic;
pub mod tiles;
pub mod wave;

use motif_core::config::{LayerConfig, Style};
use motif_core::shape::ShapeData;
use motif_core::symmetry;

pub use context::{GenContext, MAX_COMPLEXITY};

/// Hard upper bound on the shapes one generator pass returns, before
/// symmetry. Scale and density floors keep every style well below it.
pub const MAX_SHAPES: usize = 32_768;
pub use text_mosaic::mosaic_scatter;

/// Generates the shapes of one layer for a `width × height` canvas.
///
/// A pure function of its arguments: the layer's seed drives a fresh PRNG
/// stream. Shapes come back indexed in generation order, after symmetry.
#[tracing::instrument(level = "debug", skip(config), fields(style = config.style.name(), seed = config.seed))]
pub fn generate(width: f64, height: f64, config: &LayerConfig) -> Vec<ShapeData> {
    if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
        return Vec::new();
    }
    let mut ctx = GenContext::new(width, height, config);
    let shapes = match config.style {
        Style::Scatter | Style::Unknown => scatter::scatter(&mut ctx),
        Style::Geometric => scatter::geometric(&mut ctx),
        Style::Organic => scatter::organic(&mut ctx),
        Style::Confetti => scatter::confetti(&mut ctx),
        Style::Bauhaus => scatter::bauhaus(&mut ctx),
        Style::Memphis => scatter::memphis(&mut ctx),
        Style::Seasonal => scatter::seasonal(&mut ctx),
        Style::Typography => scatter::typography(&mut ctx),
        Style::Collage => scatter::collage(&mut ctx),
        Style::Grid => lattice::grid(&mut ctx),
        Style::Hex => lattice::hex(&mut ctx),
        Style::Isometric => lattice::isometric(&mut ctx),
        Style::Radial => lattice::radial(&mut ctx),
        Style::Mosaic => mosaic::mosaic(&mut ctx),
        Style::Wave => wave::ribbons(&mut ctx),
        Style::Truchet => maze::truchet(&mut ctx),
        Style::Guilloche => rosette::guilloche(&mut ctx),
        Style::Herringbone => tiles::herringbone(&mut ctx),
        Style::Chevron => tiles::chevron(&mut ctx),
        Style::BasketWeave => tiles::basket_weave(&mut ctx),
    };
    let mut shapes = reindex(shapes);
    if shapes.len() > MAX_SHAPES {
        tracing::debug!(count = shapes.len(), "truncating shape list");
        shapes.truncate(MAX_SHAPES);
    }
    tracing::debug!(count = shapes.len(), "generated");
    symmetry::apply(shapes, width, height, config.symmetry)
}

/// Sets each shape's index to its position in the list.
pub(crate) fn reindex(mut shapes: Vec<ShapeData>) -> Vec<ShapeData> {
    for (i, s) in shapes.iter_mut().enumerate() {
        s.index = i;
    }
    shapes
}

/// Returns the names of all selectable styles.
pub fn list_styles() -> Vec<&'static str> {
    Style::ALL.iter().map(|s| s.name()).collect()
}
