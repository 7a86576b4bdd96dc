//! Truchet maze style.

use motif_core::shape::{ShapeData, ShapeKind};
use motif_truchet::{layout, TruchetGrid};

use crate::context::GenContext;

/// One truchet tile per grid cell, about `density` cells across the shorter
/// side. Shape `size` is the cell width.
pub fn truchet(ctx: &mut GenContext<'_>) -> Vec<ShapeData> {
    let opts = ctx.config.truchet;
    let (cols, rows, cell) = layout(ctx.width, ctx.height, opts.density);
    let grid = TruchetGrid::generate(cols, rows, opts.continuity, &mut ctx.rng);
    let stroke = ctx.config.stroke_width.max(0.5);
    grid.tiles(cell, &opts, stroke)
        .into_iter()
        .map(|(center, tile)| ctx.dress(ShapeKind::TruchetTile(tile), center, cell.x, 0.0))
        .collect()
}
