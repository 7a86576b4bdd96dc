//! Guilloché style: concentric rosettes at the canvas center.

use glam::DVec2;
use motif_core::shape::{GuillochePath, ShapeData, ShapeKind};
use motif_guilloche::{extent, rosettes};

use crate::context::GenContext;

/// Outer rosette radius as a fraction of the shorter canvas side.
const FILL: f64 = 0.45;

/// All layers share one scale so their relative radii survive fitting into
/// the canvas. Layer `k` of `n` takes palette position `k / (n − 1)`.
pub fn guilloche(ctx: &mut GenContext<'_>) -> Vec<ShapeData> {
    let opts = ctx.config.guilloche;
    let curves: Vec<Vec<DVec2>> = rosettes(&opts, &mut ctx.rng)
        .iter()
        .map(|r| r.sample())
        .collect();
    let widest = curves.iter().map(|c| extent(c)).fold(0.0, f64::max);
    let k = if widest > f64::EPSILON {
        FILL * ctx.width.min(ctx.height) / widest
    } else {
        1.0
    };

    let center = DVec2::new(ctx.width / 2.0, ctx.height / 2.0);
    let last = curves.len().saturating_sub(1).max(1) as f64;
    let stroke_weight = ctx.config.stroke_width.max(0.5);
    curves
        .into_iter()
        .enumerate()
        .map(|(i, points)| {
            let points: Vec<DVec2> = points.into_iter().map(|p| p * k).collect();
            let size = 1.5 * extent(&points);
            let path = GuillochePath {
                points,
                stroke_weight,
            };
            let mut shape = ctx.dress(ShapeKind::Guilloche(path), center, size, 0.0);
            shape.color = ctx.config.palette.sample(i as f64 / last);
            shape
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use motif_core::config::{GuillocheOptions, LayerConfig};

    fn run(layers: u32) -> Vec<ShapeData> {
        let cfg = LayerConfig {
            guilloche: GuillocheOptions {
                layers,
                ..GuillocheOptions::default()
            },
            ..LayerConfig::default()
        };
        let mut ctx = GenContext::new(400.0, 300.0, &cfg);
        guilloche(&mut ctx)
    }

    fn points(s: &ShapeData) -> &[DVec2] {
        match &s.kind {
            ShapeKind::Guilloche(p) => &p.points,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn one_shape_per_layer_centered() {
        let shapes = run(4);
        assert_eq!(shapes.len(), 4);
        assert!(shapes.iter().all(|s| s.position == DVec2::new(200.0, 150.0)));
    }

    #[test]
    fn widest_layer_fills_the_canvas() {
        let shapes = run(3);
        let widest = shapes.iter().map(|s| extent(points(s))).fold(0.0, f64::max);
        assert!((widest - 0.45 * 300.0).abs() < 1e-9);
    }

    #[test]
    fn curves_stay_closed_after_fitting() {
        for s in run(3) {
            let pts = points(&s);
            assert_eq!(pts.first(), pts.last());
            assert!((s.bounding_radius() - extent(pts)).abs() < 1e-9);
        }
    }

    #[test]
    fn layers_ramp_through_palette() {
        let shapes = run(3);
        let palette = motif_core::palette::Palette::default();
        assert_eq!(shapes[0].color, palette.sample(0.0));
        assert_eq!(shapes[2].color, palette.sample(1.0));
    }
}
