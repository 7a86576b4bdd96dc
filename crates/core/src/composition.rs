//! Composition sampler: where scatter-family shapes land.
//!
//! [`sample`] maps a [`CompositionType`] to a point on the canvas, drawing
//! only from the supplied PRNG. Every strategy returns a point inside
//! `[0, width] × [0, height]`.

use std::f64::consts::TAU;

use glam::DVec2;

use crate::config::{CompositionOptions, CompositionType, DiagonalDirection};
use crate::prng::Xorshift64;

/// Standard deviation of the `center` strategy, as a fraction of each side.
const CENTER_SIGMA: f64 = 0.2;

/// Half-width of the `cross` and `x-shape` bands, as a fraction of the
/// shorter side.
const BAND_HALF_WIDTH: f64 = 0.08;

/// Samples one position for the given strategy.
pub fn sample(
    kind: CompositionType,
    width: f64,
    height: f64,
    rng: &mut Xorshift64,
    options: &CompositionOptions,
) -> DVec2 {
    let p = match kind {
        CompositionType::Random => uniform(width, height, rng),
        CompositionType::Center => {
            let (gx, gy) = box_muller(rng);
            DVec2::new(
                width / 2.0 + gx * CENTER_SIGMA * width,
                height / 2.0 + gy * CENTER_SIGMA * height,
            )
        }
        CompositionType::Frame => frame(width, height, rng, options.margin),
        CompositionType::Diagonal => {
            let t = rng.next_f64();
            let noise = rng.next_range(-0.25, 0.25) * height;
            let y = match options.diagonal {
                DiagonalDirection::Descending => t * height,
                DiagonalDirection::Ascending => (1.0 - t) * height,
            };
            DVec2::new(t * width, y + noise)
        }
        CompositionType::Thirds => {
            let ix = rng.next_usize(2) as f64 + 1.0;
            let iy = rng.next_usize(2) as f64 + 1.0;
            let jitter = width.min(height) * 0.08;
            DVec2::new(
                width * ix / 3.0 + rng.next_range(-jitter, jitter),
                height * iy / 3.0 + rng.next_range(-jitter, jitter),
            )
        }
        CompositionType::Bottom => {
            let x = rng.next_f64() * width;
            DVec2::new(x, height * rng.next_f64().sqrt())
        }
        CompositionType::Cross => {
            let band = width.min(height) * BAND_HALF_WIDTH;
            let off = rng.next_range(-band, band);
            if rng.next_bool(0.5) {
                DVec2::new(rng.next_f64() * width, height / 2.0 + off)
            } else {
                DVec2::new(width / 2.0 + off, rng.next_f64() * height)
            }
        }
        CompositionType::XShape => {
            let band = width.min(height) * BAND_HALF_WIDTH;
            let t = rng.next_f64();
            let off = rng.next_range(-band, band);
            let y = if rng.next_bool(0.5) {
                t * height
            } else {
                (1.0 - t) * height
            };
            DVec2::new(t * width + off, y + off)
        }
        CompositionType::Ring => {
            let min = width.min(height);
            let angle = rng.next_f64() * TAU;
            let radius = rng.next_range(0.25, 0.45) * min;
            DVec2::new(
                width / 2.0 + radius * angle.cos(),
                height / 2.0 + radius * angle.sin(),
            )
        }
        CompositionType::SplitV => {
            let half = width / 2.0;
            let base = if options.invert_split { half } else { 0.0 };
            DVec2::new(base + rng.next_f64() * half, rng.next_f64() * height)
        }
        CompositionType::SplitH => {
            let half = height / 2.0;
            let base = if options.invert_split { half } else { 0.0 };
            DVec2::new(rng.next_f64() * width, base + rng.next_f64() * half)
        }
        CompositionType::Corners => {
            let side = width.min(height) * 0.25;
            let corner = rng.next_usize(4);
            let x = rng.next_f64() * side;
            let y = rng.next_f64() * side;
            DVec2::new(
                if corner % 2 == 0 { x } else { width - x },
                if corner < 2 { y } else { height - y },
            )
        }
    };
    clamp_to(p, width, height)
}

fn uniform(width: f64, height: f64, rng: &mut Xorshift64) -> DVec2 {
    DVec2::new(rng.next_f64() * width, rng.next_f64() * height)
}

fn frame(width: f64, height: f64, rng: &mut Xorshift64, margin: f64) -> DVec2 {
    let m = (margin / 100.0).clamp(0.0, 0.5);
    let (bw, bh) = (width * m, height * m);
    let along = rng.next_f64();
    let across = rng.next_f64();
    match rng.next_usize(4) {
        0 => DVec2::new(along * width, across * bh),
        1 => DVec2::new(along * width, height - across * bh),
        2 => DVec2::new(across * bw, along * height),
        _ => DVec2::new(width - across * bw, along * height),
    }
}

/// Two independent standard normal deviates.
fn box_muller(rng: &mut Xorshift64) -> (f64, f64) {
    // 1 - u keeps the log argument in (0, 1].
    let u1 = 1.0 - rng.next_f64();
    let u2 = rng.next_f64();
    let r = (-2.0 * u1.ln()).sqrt();
    let theta = TAU * u2;
    (r * theta.cos(), r * theta.sin())
}

fn clamp_to(p: DVec2, width: f64, height: f64) -> DVec2 {
    DVec2::new(p.x.clamp(0.0, width), p.y.clamp(0.0, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f64 = 800.0;
    const H: f64 = 600.0;

    fn many(kind: CompositionType, opts: &CompositionOptions) -> Vec<DVec2> {
        let mut rng = Xorshift64::new(2024);
        (0..2000).map(|_| sample(kind, W, H, &mut rng, opts)).collect()
    }

    #[test]
    fn every_strategy_stays_on_canvas() {
        let opts = CompositionOptions::default();
        for kind in CompositionType::ALL {
            for p in many(kind, &opts) {
                assert!((0.0..=W).contains(&p.x) && (0.0..=H).contains(&p.y), "{kind:?} gave {p}");
            }
        }
    }

    #[test]
    fn same_seed_same_points() {
        let opts = CompositionOptions::default();
        for kind in CompositionType::ALL {
            assert_eq!(many(kind, &opts), many(kind, &opts));
        }
    }

    #[test]
    fn center_clusters_around_centroid() {
        let pts = many(CompositionType::Center, &CompositionOptions::default());
        let mean = pts.iter().copied().sum::<DVec2>() / pts.len() as f64;
        assert!((mean.x - W / 2.0).abs() < 20.0, "mean {mean}");
        assert!((mean.y - H / 2.0).abs() < 20.0, "mean {mean}");
    }

    #[test]
    fn frame_stays_in_margin_band() {
        let opts = CompositionOptions {
            margin: 10.0,
            ..CompositionOptions::default()
        };
        for p in many(CompositionType::Frame, &opts) {
            let in_band =
                p.x <= W * 0.1 || p.x >= W * 0.9 || p.y <= H * 0.1 || p.y >= H * 0.9;
            assert!(in_band, "{p} outside frame band");
        }
    }

    #[test]
    fn split_v_respects_invert_flag() {
        let left = many(CompositionType::SplitV, &CompositionOptions::default());
        assert!(left.iter().all(|p| p.x <= W / 2.0));
        let opts = CompositionOptions {
            invert_split: true,
            ..CompositionOptions::default()
        };
        assert!(many(CompositionType::SplitV, &opts).iter().all(|p| p.x >= W / 2.0));
    }

    #[test]
    fn split_h_uses_top_half_by_default() {
        let pts = many(CompositionType::SplitH, &CompositionOptions::default());
        assert!(pts.iter().all(|p| p.y <= H / 2.0));
    }

    #[test]
    fn ring_radius_within_bounds() {
        let min = W.min(H);
        for p in many(CompositionType::Ring, &CompositionOptions::default()) {
            let r = p.distance(DVec2::new(W / 2.0, H / 2.0));
            assert!(r >= 0.25 * min - 1e-9 && r <= 0.45 * min + 1e-9, "r = {r}");
        }
    }

    #[test]
    fn bottom_skews_downward() {
        let pts = many(CompositionType::Bottom, &CompositionOptions::default());
        let lower = pts.iter().filter(|p| p.y > H / 2.0).count();
        assert!(lower as f64 / pts.len() as f64 > 0.7);
    }

    #[test]
    fn corners_hug_the_corners() {
        let side = W.min(H) * 0.25;
        for p in many(CompositionType::Corners, &CompositionOptions::default()) {
            let near_x = p.x <= side || p.x >= W - side;
            let near_y = p.y <= side || p.y >= H - side;
            assert!(near_x && near_y, "{p}");
        }
    }

    #[test]
    fn ascending_diagonal_runs_bottom_left_to_top_right() {
        let opts = CompositionOptions {
            diagonal: DiagonalDirection::Ascending,
            ..CompositionOptions::default()
        };
        let pts = many(CompositionType::Diagonal, &opts);
        let left: Vec<_> = pts.iter().filter(|p| p.x < W * 0.2).collect();
        let mean_y = left.iter().map(|p| p.y).sum::<f64>() / left.len() as f64;
        assert!(mean_y > H / 2.0, "mean_y {mean_y}");
    }
}
