//! Quadtree mosaic.
//!
//! The canvas is cut into square cells of `2 · base`. Each cell splits into
//! four quadrants with probability [`SPLIT`] down to depth [`MAX_DEPTH`];
//! each leaf is dropped with probability [`DROP`] or filled edge to edge
//! with one shape.

use glam::DVec2;
use motif_core::shape::{ShapeData, ShapeType};

use crate::context::GenContext;

pub const SPLIT: f64 = 0.35;
pub const DROP: f64 = 0.2;
pub const MAX_DEPTH: u32 = 2;

const FILLS: &[ShapeType] = &[
    ShapeType::Square,
    ShapeType::QuarterCircle,
    ShapeType::Triangle,
    ShapeType::SemiCircle,
];

/// Cells are stretched slightly on each axis so a whole number of them
/// spans the canvas.
pub fn mosaic(ctx: &mut GenContext<'_>) -> Vec<ShapeData> {
    let cell = 2.0 * ctx.base;
    let (counts, stretch) = ctx.fit(DVec2::splat(cell));
    let (cols, rows) = (counts.x as usize, counts.y as usize);
    let types = ctx.allowed(FILLS);

    let mut shapes = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            let origin = DVec2::new(col as f64 * cell, row as f64 * cell);
            subdivide(ctx, &types, origin, cell, 0, stretch, &mut shapes);
        }
    }
    shapes
}

fn subdivide(
    ctx: &mut GenContext<'_>,
    types: &[ShapeType],
    origin: DVec2,
    side: f64,
    depth: u32,
    stretch: DVec2,
    out: &mut Vec<ShapeData>,
) {
    if depth < MAX_DEPTH && ctx.rng.next_bool(SPLIT) {
        let half = side / 2.0;
        for (dx, dy) in [(0.0, 0.0), (half, 0.0), (0.0, half), (half, half)] {
            subdivide(ctx, types, origin + DVec2::new(dx, dy), half, depth + 1, stretch, out);
        }
        return;
    }
    if ctx.rng.next_bool(DROP) {
        return;
    }
    let kind = ctx.pick_kind(types);
    let rotation = ctx.rng.next_usize(4) as f64 * 90.0;
    let center = (origin + DVec2::splat(side / 2.0)) * stretch;
    out.push(ctx.dress(kind, center, side * stretch.min_element(), rotation));
}

#[cfg(test)]
mod tests {
    use super::*;
    use motif_core::config::LayerConfig;
    use motif_core::shape::ShapeKind;

    fn shapes(seed: u64) -> Vec<ShapeData> {
        let cfg = LayerConfig {
            seed,
            ..LayerConfig::default()
        };
        let mut ctx = GenContext::new(400.0, 400.0, &cfg);
        mosaic(&mut ctx)
    }

    #[test]
    fn leaf_sizes_are_cell_halvings() {
        let cell = 80.0;
        for s in shapes(3) {
            assert!([cell, cell / 2.0, cell / 4.0].contains(&s.size), "size {}", s.size);
        }
    }

    #[test]
    fn leaves_align_to_their_quadrants() {
        for s in shapes(11) {
            let corner = s.position - DVec2::splat(s.size / 2.0);
            let fx = corner.x / s.size;
            let fy = corner.y / s.size;
            assert!((fx - fx.round()).abs() < 1e-9 && (fy - fy.round()).abs() < 1e-9);
        }
    }

    #[test]
    fn fills_use_the_mosaic_set() {
        assert!(shapes(5).iter().all(|s| matches!(
            s.kind,
            ShapeKind::Square | ShapeKind::QuarterCircle | ShapeKind::Triangle | ShapeKind::SemiCircle
        )));
    }

    #[test]
    fn cells_span_uneven_canvases_exactly() {
        let cfg = LayerConfig::default();
        let mut ctx = GenContext::new(430.0, 250.0, &cfg);
        // cell 50 → 9 columns of 47.78, 5 rows of 50
        let (counts, _) = ctx.fit(DVec2::splat(50.0));
        assert_eq!(counts, DVec2::new(9.0, 5.0));
        let shapes = mosaic(&mut ctx);
        assert!(shapes
            .iter()
            .all(|s| (0.0..430.0).contains(&s.position.x) && (0.0..250.0).contains(&s.position.y)));
        assert!(shapes.iter().any(|s| s.position.x > 430.0 * 8.0 / 9.0));
    }

    #[test]
    fn some_cells_split() {
        let all = shapes(21);
        assert!(all.iter().any(|s| s.size < 80.0));
        assert!(all.iter().any(|s| s.size == 80.0));
    }
}
