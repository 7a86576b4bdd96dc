//! Tileable grain texture.
//!
//! The texture is a mix of low-frequency Perlin noise and per-cell white
//! noise. The Perlin term is sampled on a 4D torus (each axis mapped onto a
//! circle) so the texture repeats seamlessly across both edges; 0.5 is the
//! neutral value for an overlay blend.

use std::f64::consts::TAU;

use noise::{NoiseFn, Perlin};

use crate::error::MotifError;
use crate::field::Field;
use crate::prng::Xorshift64;

/// Share of the low-frequency component in the mix.
const SMOOTH_WEIGHT: f64 = 0.45;

/// Torus radius: larger values give finer Perlin detail.
const TORUS_RADIUS: f64 = 1.6;

/// Builds a `width × height` grain field from `seed`.
#[tracing::instrument(level = "debug")]
pub fn grain_field(width: usize, height: usize, seed: u64) -> Result<Field, MotifError> {
    let mut field = Field::new(width, height)?;
    let perlin = Perlin::new((seed ^ (seed >> 32)) as u32);
    let mut rng = Xorshift64::fork(seed, 0x6772_6169_6e);

    for y in 0..height {
        let ay = TAU * y as f64 / height as f64;
        let (sy, cy) = ay.sin_cos();
        for x in 0..width {
            let ax = TAU * x as f64 / width as f64;
            let (sx, cx) = ax.sin_cos();
            let smooth = perlin.get([
                cx * TORUS_RADIUS,
                sx * TORUS_RADIUS,
                cy * TORUS_RADIUS,
                sy * TORUS_RADIUS,
            ]);
            let white = rng.next_f64();
            let v = SMOOTH_WEIGHT * (0.5 + 0.5 * smooth) + (1.0 - SMOOTH_WEIGHT) * white;
            field.set(x as isize, y as isize, v);
        }
    }
    Ok(field)
}
