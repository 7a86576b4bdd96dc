#![deny(unsafe_code)]
//! Guilloché rosettes.
//!
//! A rosette is a hypotrochoid (a pen on a circle of radius `r` rolling
//! inside a fixed circle of radius `R`) or an epitrochoid (rolling outside).
//! Radii are rounded to whole numbers so the curve closes after exactly
//! `r / gcd(R, r)` revolutions of the rolling circle.

use std::f64::consts::TAU;

use glam::DVec2;
use motif_core::config::{CurveType, GuillocheOptions};
use motif_core::prng::Xorshift64;

/// Fewest samples used for any rosette.
const MIN_SAMPLES: usize = 200;
/// Most samples used for any rosette.
const MAX_SAMPLES: usize = 1000;
/// Samples per revolution before clamping.
const SAMPLES_PER_REVOLUTION: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    Hypotrochoid,
    Epitrochoid,
}

/// One closed trochoid with whole-number radii.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rosette {
    pub curve: Curve,
    pub major: u32,
    pub minor: u32,
    pub pen: f64,
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Rounds a radius to a whole number of at least 1.
fn whole(radius: f64) -> u32 {
    if radius.is_finite() {
        radius.round().clamp(1.0, f64::from(u32::MAX)) as u32
    } else {
        1
    }
}

/// Rolling-circle revolutions before the curve closes.
pub fn revolutions(major: f64, minor: f64) -> u32 {
    let (big, small) = (whole(major), whole(minor));
    small / gcd(big, small)
}

/// Sample count for a curve of `revolutions` turns.
pub fn sample_count(revolutions: u32) -> usize {
    (revolutions as usize)
        .saturating_mul(SAMPLES_PER_REVOLUTION)
        .clamp(MIN_SAMPLES, MAX_SAMPLES)
}

impl Rosette {
    pub fn new(curve: Curve, major: f64, minor: f64, pen: f64) -> Self {
        Self {
            curve,
            major: whole(major),
            minor: whole(minor),
            pen: if pen.is_finite() { pen } else { 0.0 },
        }
    }

    pub fn revolutions(&self) -> u32 {
        self.minor / gcd(self.major, self.minor)
    }

    /// Point at parameter `t`, centered on the origin.
    pub fn point(&self, t: f64) -> DVec2 {
        let big = f64::from(self.major);
        let small = f64::from(self.minor);
        let d = self.pen;
        match self.curve {
            Curve::Hypotrochoid => {
                let k = (big - small) / small;
                DVec2::new(
                    (big - small) * t.cos() + d * (k * t).cos(),
                    (big - small) * t.sin() - d * (k * t).sin(),
                )
            }
            Curve::Epitrochoid => {
                let k = (big + small) / small;
                DVec2::new(
                    (big + small) * t.cos() - d * (k * t).cos(),
                    (big + small) * t.sin() - d * (k * t).sin(),
                )
            }
        }
    }

    /// Samples the closed curve over `[0, 2π·revolutions]`. The last point
    /// repeats the first.
    pub fn sample(&self) -> Vec<DVec2> {
        let revs = self.revolutions();
        let n = sample_count(revs);
        let span = TAU * f64::from(revs);
        let mut points: Vec<DVec2> = (0..n - 1)
            .map(|i| self.point(span * i as f64 / (n - 1) as f64))
            .collect();
        points.push(points[0]);
        points
    }
}

/// Largest distance from the origin among `points`.
pub fn extent(points: &[DVec2]) -> f64 {
    points.iter().map(|p| p.length()).fold(0.0, f64::max)
}

/// Scales `points` about the origin so their extent becomes `radius`.
pub fn fit(points: &[DVec2], radius: f64) -> Vec<DVec2> {
    let e = extent(points);
    if e <= f64::EPSILON {
        return points.to_vec();
    }
    let k = radius / e;
    points.iter().map(|p| *p * k).collect()
}

/// Rosettes for each layer. Successive layers shrink the fixed circle,
/// nudge the rolling circle and pen, and (for `mixed`) alternate curve type.
#[tracing::instrument(level = "debug", skip(rng))]
pub fn rosettes(options: &GuillocheOptions, rng: &mut Xorshift64) -> Vec<Rosette> {
    let layers = options.layers.clamp(1, 12);
    (0..layers)
        .map(|k| {
            let curve = match options.curve {
                CurveType::Hypotrochoid => Curve::Hypotrochoid,
                CurveType::Epitrochoid => Curve::Epitrochoid,
                CurveType::Mixed if k % 2 == 0 => Curve::Hypotrochoid,
                CurveType::Mixed => Curve::Epitrochoid,
            };
            let shrink = 1.0 - 0.1 * f64::from(k);
            let major = options.major_radius * shrink.max(0.2);
            let minor = options.minor_radius * rng.next_range(0.85, 1.15);
            let pen = options.pen_distance * rng.next_range(0.8, 1.1);
            Rosette::new(curve, major, minor, pen)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revolutions_for_100_40_is_two() {
        assert_eq!(revolutions(100.0, 40.0), 2);
        assert_eq!(sample_count(2), 200);
    }

    #[test]
    fn revolutions_round_and_clamp_radii() {
        assert_eq!(revolutions(99.6, 39.7), 2);
        assert_eq!(revolutions(100.0, 0.0), 1);
        assert_eq!(revolutions(0.0, 0.2), 1);
        assert_eq!(revolutions(f64::NAN, 7.0), 7);
    }

    #[test]
    fn sample_count_clamps() {
        assert_eq!(sample_count(1), 200);
        assert_eq!(sample_count(5), 500);
        assert_eq!(sample_count(37), 1000);
    }

    #[test]
    fn sampled_curve_closes() {
        for curve in [Curve::Hypotrochoid, Curve::Epitrochoid] {
            let r = Rosette::new(curve, 100.0, 40.0, 60.0);
            let pts = r.sample();
            assert_eq!(pts.len(), 200);
            assert_eq!(pts.first(), pts.last());
            // The analytic endpoint agrees with the start too.
            let end = r.point(TAU * f64::from(r.revolutions()));
            assert!(end.distance(pts[0]) < 1e-9);
        }
    }

    #[test]
    fn hypotrochoid_starts_at_known_point() {
        let r = Rosette::new(Curve::Hypotrochoid, 100.0, 40.0, 60.0);
        assert_eq!(r.point(0.0), DVec2::new(120.0, 0.0));
        let e = Rosette::new(Curve::Epitrochoid, 100.0, 40.0, 60.0);
        assert_eq!(e.point(0.0), DVec2::new(80.0, 0.0));
    }

    #[test]
    fn fit_scales_to_radius() {
        let pts = Rosette::new(Curve::Epitrochoid, 90.0, 35.0, 20.0).sample();
        let fitted = fit(&pts, 50.0);
        assert!((extent(&fitted) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn mixed_layers_alternate() {
        let mut rng = Xorshift64::new(4);
        let opts = GuillocheOptions {
            layers: 4,
            curve: CurveType::Mixed,
            ..GuillocheOptions::default()
        };
        let rs = rosettes(&opts, &mut rng);
        let curves: Vec<_> = rs.iter().map(|r| r.curve).collect();
        assert_eq!(
            curves,
            [
                Curve::Hypotrochoid,
                Curve::Epitrochoid,
                Curve::Hypotrochoid,
                Curve::Epitrochoid
            ]
        );
        assert!(rs.windows(2).all(|w| w[1].major <= w[0].major));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_rosette_closes(
                major in 1.0_f64..300.0,
                minor in 1.0_f64..150.0,
                pen in 0.0_f64..200.0,
                epi: bool,
            ) {
                let curve = if epi { Curve::Epitrochoid } else { Curve::Hypotrochoid };
                let r = Rosette::new(curve, major, minor, pen);
                let end = r.point(TAU * f64::from(r.revolutions()));
                let scale = 1.0 + f64::from(r.major + r.minor) + pen;
                prop_assert!(end.distance(r.point(0.0)) < 1e-9 * scale * f64::from(r.revolutions()));
            }
        }
    }
}
