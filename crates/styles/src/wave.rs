//! Wave ribbons: one filled band per horizontal stripe.
//!
//! Each band runs the full canvas width with a whole number of sine cycles,
//! so its two ends meet at the same height whatever the phase and the
//! pattern tiles horizontally.

use std::f64::consts::TAU;

use glam::DVec2;
use motif_core::shape::{ShapeData, ShapeKind, WaveBand};

use crate::context::GenContext;

/// Most sine cycles across one band.
pub const MAX_CYCLES: u32 = 32;

/// Band count when the options leave it at 0.
pub fn band_count(bands: u32, complexity: u32) -> u32 {
    if bands > 0 {
        bands.min(200)
    } else {
        (complexity / 4).clamp(3, 40)
    }
}

pub fn ribbons(ctx: &mut GenContext<'_>) -> Vec<ShapeData> {
    let opts = ctx.config.wave;
    let bands = band_count(opts.bands, ctx.config.complexity);
    let spacing = ctx.height / f64::from(bands);
    let swing = if opts.amplitude.is_finite() {
        opts.amplitude.clamp(0.0, 2.0)
    } else {
        0.0
    };
    let max_cycles = opts.max_cycles.clamp(1, MAX_CYCLES) as usize;

    (0..bands)
        .map(|i| {
            let y = (f64::from(i) + 0.5) * spacing;
            let cycles = 1 + ctx.rng.next_usize(max_cycles) as u32;
            let amplitude = swing * spacing * ctx.rng.next_range(0.6, 1.0);
            let thickness = spacing * ctx.rng.next_range(0.5, 0.9);
            let phase = ctx.rng.next_f64() * TAU;
            let band = WaveBand {
                length: ctx.width,
                amplitude,
                cycles,
                thickness,
                phase,
            };
            let pos = DVec2::new(ctx.width / 2.0, y);
            ctx.dress(ShapeKind::Wave(band), pos, thickness / 2.0 + amplitude, 0.0)
        })
        .collect()
}
