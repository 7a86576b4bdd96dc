//! Seamless-loop animation transform.
//!
//! [`apply`] mutates a working copy of a shape for a loop progress in
//! `[0, 1)`. Every periodic term completes a whole number of cycles per
//! sweep, so progress 1 reproduces progress 0 and exported loops have no
//! visible seam.

use std::f64::consts::TAU;

use glam::DVec2;

use crate::config::{AnimationConfig, Motion};
use crate::shape::ShapeData;

/// Float amplitude per unit intensity, as a fraction of the shorter side.
const FLOAT_AMPLITUDE: f64 = 0.03;

/// Pulse amplitude per unit intensity.
const PULSE_AMPLITUDE: f64 = 0.15;

/// Whole cycles per sweep for a shape: `max(1, round(intensity)) · speed_factor`.
pub fn cycles(config: &AnimationConfig, shape: &ShapeData) -> f64 {
    let base = config.intensity.round().max(1.0);
    base * f64::from(shape.speed_factor.max(1))
}

/// Applies the primary and then the secondary motion.
pub fn apply(shape: &mut ShapeData, progress: f64, width: f64, height: f64, config: &AnimationConfig) {
    if !config.enabled {
        return;
    }
    let p = if progress.is_finite() { progress } else { 0.0 };
    for motion in [config.primary, config.secondary] {
        apply_motion(motion, shape, p, width, height, config);
    }
}

fn apply_motion(
    motion: Motion,
    shape: &mut ShapeData,
    p: f64,
    width: f64,
    height: f64,
    config: &AnimationConfig,
) {
    let c = cycles(config, shape);
    let dir = config.direction.sign();
    let phase = shape.phase_offset;
    let intensity = config.intensity.max(0.0);

    match motion {
        Motion::None => {}
        Motion::Orbit => {
            let center = DVec2::new(width / 2.0, height / 2.0);
            let rel = shape.position - center;
            let turn = DVec2::from_angle(dir * TAU * c * p);
            shape.position = center + turn.rotate(rel);
        }
        Motion::Float => {
            let amp = FLOAT_AMPLITUDE * width.min(height) * intensity;
            let fx = (c / 2.0).ceil();
            shape.position.y += amp * (dir * TAU * c * p + phase).sin();
            shape.position.x += 0.5 * amp * (dir * TAU * fx * p + phase).sin();
        }
        Motion::Scan => {
            let buffer = shape.bounding_radius().max(0.5 * width);
            let track = width + 2.0 * buffer;
            let x = shape.position.x + buffer + dir * track * c * p;
            shape.position.x = x.rem_euclid(track) - buffer;
        }
        Motion::Pulse => {
            let a = (PULSE_AMPLITUDE * config.intensity).clamp(0.0, 0.9);
            shape.size *= 1.0 + a * (dir * TAU * c * p + phase).sin();
        }
        Motion::Spin => {
            shape.rotation += dir * 360.0 * c * p;
        }
    }
}

/// Loop progress in `[0, 1)` at `time_ms` for a loop of `duration` seconds.
pub fn progress_at(time_ms: u64, duration: f64) -> f64 {
    if !(duration > 0.0) {
        return 0.0;
    }
    let secs = time_ms as f64 / 1000.0;
    (secs / duration).rem_euclid(1.0)
}

/// Progress of frame `i` in an `n`-frame loop.
pub fn frame_progress(i: u32, n: u32) -> f64 {
    if n == 0 {
        return 0.0;
    }
    f64::from(i) / f64::from(n)
}

/// Frames in one loop, at least 1.
pub fn total_frames(fps: u32, duration: f64) -> u32 {
    let frames = (f64::from(fps) * duration.max(0.0)).round();
    (frames as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Srgb;
    use crate::config::Direction;
    use crate::shape::ShapeKind;

    const W: f64 = 640.0;
    const H: f64 = 480.0;
    const MOTIONS: [Motion; 6] = [
        Motion::None,
        Motion::Orbit,
        Motion::Float,
        Motion::Scan,
        Motion::Pulse,
        Motion::Spin,
    ];

    fn shape() -> ShapeData {
        let mut s = ShapeData::new(ShapeKind::Star { points: 5 }, DVec2::new(100.0, 80.0), 40.0, Srgb::WHITE);
        s.rotation = 12.0;
        s.speed_factor = 2;
        s.phase_offset = 0.7;
        s
    }

    fn config(primary: Motion, secondary: Motion) -> AnimationConfig {
        AnimationConfig {
            enabled: true,
            primary,
            secondary,
            intensity: 1.6,
            ..AnimationConfig::default()
        }
    }

    fn at(cfg: &AnimationConfig, p: f64) -> ShapeData {
        let mut s = shape();
        apply(&mut s, p, W, H, cfg);
        s
    }

    fn close(a: &ShapeData, b: &ShapeData) -> bool {
        let rot = (a.rotation - b.rotation).rem_euclid(360.0);
        a.position.distance(b.position) < 1e-6
            && (a.size - b.size).abs() < 1e-6
            && (rot < 1e-6 || (360.0 - rot) < 1e-6)
    }

    #[test]
    fn every_motion_pair_closes_the_loop() {
        for primary in MOTIONS {
            for secondary in MOTIONS {
                for direction in [Direction::Forward, Direction::Reverse] {
                    let cfg = AnimationConfig {
                        direction,
                        ..config(primary, secondary)
                    };
                    let start = at(&cfg, 0.0);
                    let end = at(&cfg, 1.0);
                    assert!(close(&start, &end), "{primary:?}+{secondary:?} {direction:?}");
                }
            }
        }
    }

    #[test]
    fn disabled_animation_is_identity() {
        let cfg = AnimationConfig {
            enabled: false,
            ..config(Motion::Orbit, Motion::Spin)
        };
        assert_eq!(at(&cfg, 0.3), shape());
    }

    #[test]
    fn cycles_rounds_intensity_and_multiplies_speed() {
        let s = shape();
        let mut cfg = config(Motion::Spin, Motion::None);
        assert_eq!(cycles(&cfg, &s), 4.0);
        cfg.intensity = 0.2;
        assert_eq!(cycles(&cfg, &s), 2.0);
    }

    #[test]
    fn reverse_spins_the_other_way() {
        let fwd = at(&config(Motion::Spin, Motion::None), 0.1);
        let rev = at(
            &AnimationConfig {
                direction: Direction::Reverse,
                ..config(Motion::Spin, Motion::None)
            },
            0.1,
        );
        assert!(fwd.rotation > 12.0);
        assert!(rev.rotation < 12.0);
    }

    #[test]
    fn orbit_keeps_radius() {
        let c = DVec2::new(W / 2.0, H / 2.0);
        let r0 = shape().position.distance(c);
        for i in 0..10 {
            let s = at(&config(Motion::Orbit, Motion::None), i as f64 / 10.0);
            assert!((s.position.distance(c) - r0).abs() < 1e-9);
        }
    }

    #[test]
    fn scan_stays_within_track() {
        let cfg = config(Motion::Scan, Motion::None);
        let buffer = 0.5 * W;
        for i in 0..50 {
            let s = at(&cfg, i as f64 / 50.0);
            assert!(s.position.x >= -buffer && s.position.x < W + buffer);
            assert_eq!(s.position.y, 80.0);
        }
    }

    #[test]
    fn pulse_amplitude_is_capped() {
        let cfg = AnimationConfig {
            intensity: 100.0,
            ..config(Motion::Pulse, Motion::None)
        };
        for i in 0..40 {
            let s = at(&cfg, i as f64 / 40.0);
            assert!(s.size >= 40.0 * 0.1 - 1e-9 && s.size <= 40.0 * 1.9 + 1e-9);
        }
    }

    #[test]
    fn progress_helpers() {
        assert_eq!(progress_at(1500, 3.0), 0.5);
        assert_eq!(progress_at(3000, 3.0), 0.0);
        assert_eq!(progress_at(1000, 0.0), 0.0);
        assert_eq!(frame_progress(15, 60), 0.25);
        assert_eq!(frame_progress(3, 0), 0.0);
        assert_eq!(total_frames(30, 6.0), 180);
        assert_eq!(total_frames(30, 0.0), 1);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn loop_closes_for_any_intensity_and_speed(
                intensity in 0.0_f64..8.0,
                speed in 1_u32..4,
                phase in 0.0_f64..TAU,
            ) {
                let cfg = AnimationConfig {
                    intensity,
                    ..config(Motion::Float, Motion::Pulse)
                };
                let mut a = shape();
                a.speed_factor = speed;
                a.phase_offset = phase;
                let mut b = a.clone();
                apply(&mut a, 0.0, W, H, &cfg);
                apply(&mut b, 1.0, W, H, &cfg);
                prop_assert!(a.position.distance(b.position) < 1e-6);
                prop_assert!((a.size - b.size).abs() < 1e-6);
            }
        }
    }
}
