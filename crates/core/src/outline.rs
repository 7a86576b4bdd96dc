//! Shape outlines.
//!
//! [`outline`] turns a [`ShapeData`] into drawable geometry in shape-local
//! coordinates (origin at the shape position, unrotated). [`shape_transform`]
//! maps local coordinates to the canvas. The raster and SVG backends both
//! draw from these two functions, so a shape looks the same in both.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use kurbo::{Affine, Arc, BezPath, Circle, Ellipse, Point, Rect, Shape, Vec2};

use crate::color::Srgb;
use crate::shape::{GuillochePath, ShapeData, ShapeKind, TruchetTile, TruchetVariant, WaveBand};

/// Flattening tolerance for curves converted to Bézier paths.
const TOLERANCE: f64 = 0.1;

/// How a path is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Fill,
    Stroke { width: f64 },
}

/// Which color a path takes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ink {
    /// The shape's own color.
    Shape,
    /// The shape's color with OKLCh lightness shifted by the given amount.
    Shaded(f64),
}

impl Ink {
    pub fn resolve(self, base: Srgb) -> Srgb {
        match self {
            Ink::Shape => base,
            Ink::Shaded(delta) => base.shade(delta),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub path: BezPath,
    pub paint: Paint,
    pub ink: Ink,
}

/// Drawable form of a shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Figure {
    Paths(Vec<Primitive>),
    /// A text glyph centered on the shape, `size` tall.
    Glyph { ch: char },
    /// An image asset drawn into a `size × size` box.
    Bitmap { asset_id: String },
    Nothing,
}

/// Local-to-canvas transform: translate, then rotate, then the optional
/// mirror flip.
pub fn shape_transform(shape: &ShapeData, offset: glam::DVec2) -> Affine {
    let p = shape.position + offset;
    let flip = if shape.mirrored {
        Affine::scale_non_uniform(-1.0, 1.0)
    } else {
        Affine::IDENTITY
    };
    Affine::translate((p.x, p.y)) * Affine::rotate(shape.rotation.to_radians()) * flip
}

/// Geometry for `shape` in local coordinates.
pub fn outline(shape: &ShapeData) -> Figure {
    let s = shape.size.max(0.0);
    let r = s / 2.0;
    let body = if shape.stroke || shape.kind.is_linear() {
        Paint::Stroke {
            width: shape.stroke_width.max(0.5),
        }
    } else {
        Paint::Fill
    };
    let one = |path: BezPath| Figure::Paths(vec![prim(path, body, Ink::Shape)]);

    match &shape.kind {
        ShapeKind::Circle => one(Circle::new(Point::ZERO, r).to_path(TOLERANCE)),
        ShapeKind::Square => one(Rect::new(-r, -r, r, r).to_path(TOLERANCE)),
        ShapeKind::Triangle => one(regular_polygon(3, r)),
        ShapeKind::Diamond => one(polygon(&[
            (0.0, -r),
            (0.7 * r, 0.0),
            (0.0, r),
            (-0.7 * r, 0.0),
        ])),
        ShapeKind::Hexagon => one(regular_polygon(6, r)),
        ShapeKind::Polygon { sides } => one(regular_polygon(usize::from(*sides).max(3), r)),
        ShapeKind::Star { points } => one(star(usize::from(*points).max(3), r, 0.45 * r)),
        ShapeKind::Ring => ring(shape, r),
        ShapeKind::Cross => {
            let a = 0.3 * r;
            one(polygon(&[
                (-a, -r),
                (a, -r),
                (a, -a),
                (r, -a),
                (r, a),
                (a, a),
                (a, r),
                (-a, r),
                (-a, a),
                (-r, a),
                (-r, -a),
                (-a, -a),
            ]))
        }
        ShapeKind::Heart => one(heart(r)),
        ShapeKind::Line => {
            let mut p = BezPath::new();
            p.move_to((-r, 0.0));
            p.line_to((r, 0.0));
            one(p)
        }
        ShapeKind::Arc => one(
            Arc {
                center: Point::ZERO,
                radii: Vec2::new(r, r),
                start_angle: PI,
                sweep_angle: PI,
                x_rotation: 0.0,
            }
            .to_path(TOLERANCE),
        ),
        ShapeKind::SemiCircle => {
            let mut p = Arc {
                center: Point::ZERO,
                radii: Vec2::new(r, r),
                start_angle: PI,
                sweep_angle: PI,
                x_rotation: 0.0,
            }
            .to_path(TOLERANCE);
            p.close_path();
            one(p)
        }
        ShapeKind::QuarterCircle => {
            let mut p = BezPath::new();
            p.move_to((-r, r));
            p.line_to((-r, -r));
            p.extend(
                Arc {
                    center: Point::new(-r, r),
                    radii: Vec2::new(2.0 * r, 2.0 * r),
                    start_angle: -FRAC_PI_2,
                    sweep_angle: FRAC_PI_2,
                    x_rotation: 0.0,
                }
                .append_iter(TOLERANCE),
            );
            p.close_path();
            one(p)
        }
        ShapeKind::Squiggle => one(polyline((0..=32).map(|i| {
            let t = i as f64 / 32.0;
            (-r + 2.0 * r * t, 0.3 * r * (t * 2.5 * TAU).sin())
        }))),
        ShapeKind::Zigzag => one(polyline((0..=6).map(|i| {
            let y = if i % 2 == 0 { -0.3 * r } else { 0.3 * r };
            (-r + 2.0 * r * i as f64 / 6.0, y)
        }))),
        ShapeKind::Spiral => one(polyline((0..=96).map(|i| {
            let t = i as f64 / 96.0;
            let a = t * 3.0 * TAU;
            (r * t * a.cos(), r * t * a.sin())
        }))),
        ShapeKind::Blob { lobes, wobble } => one(blob(usize::from(*lobes).max(3), *wobble, r)),
        ShapeKind::Flower { petals } => flower(usize::from(*petals).max(3), r, body),
        ShapeKind::Leaf => {
            let mut p = BezPath::new();
            p.move_to((0.0, -r));
            p.quad_to((0.9 * r, 0.0), (0.0, r));
            p.quad_to((-0.9 * r, 0.0), (0.0, -r));
            p.close_path();
            let mut rib = BezPath::new();
            rib.move_to((0.0, -0.8 * r));
            rib.line_to((0.0, 0.8 * r));
            Figure::Paths(vec![
                prim(p, body, Ink::Shape),
                prim(rib, Paint::Stroke { width: (0.06 * s).max(0.5) }, Ink::Shaded(-0.2)),
            ])
        }
        ShapeKind::Snowflake => {
            let width = shape.stroke_width.max(0.06 * s).max(0.5);
            one_stroke(snowflake(r), width)
        }
        ShapeKind::PineTree => {
            let mut parts = Vec::new();
            for (top, half, bottom) in [(-1.0, 0.45, -0.3), (-0.6, 0.6, 0.15), (-0.2, 0.8, 0.6)] {
                parts.push(prim(
                    polygon(&[(0.0, top * r), (half * r, bottom * r), (-half * r, bottom * r)]),
                    body,
                    Ink::Shape,
                ));
            }
            parts.push(prim(
                Rect::new(-0.1 * r, 0.6 * r, 0.1 * r, r).to_path(TOLERANCE),
                body,
                Ink::Shaded(-0.25),
            ));
            Figure::Paths(parts)
        }
        ShapeKind::Pumpkin => {
            let lobe = |cx: f64, rx: f64, ink| {
                prim(
                    Ellipse::new((cx * r, 0.1 * r), (rx * r, 0.75 * r), 0.0).to_path(TOLERANCE),
                    body,
                    ink,
                )
            };
            Figure::Paths(vec![
                lobe(-0.35, 0.5, Ink::Shape),
                lobe(0.35, 0.5, Ink::Shape),
                lobe(0.0, 0.45, Ink::Shaded(0.08)),
                prim(
                    Rect::new(-0.08 * r, -0.95 * r, 0.08 * r, -0.6 * r).to_path(TOLERANCE),
                    body,
                    Ink::Shaded(-0.3),
                ),
            ])
        }
        ShapeKind::Sun => {
            let mut parts = vec![prim(
                Circle::new(Point::ZERO, 0.55 * r).to_path(TOLERANCE),
                body,
                Ink::Shape,
            )];
            for k in 0..8 {
                let a = k as f64 * TAU / 8.0;
                let dir = Vec2::from_angle(a);
                let side = Vec2::from_angle(a + FRAC_PI_2) * 0.12 * r;
                let base = dir * 0.65 * r;
                let tip = dir * r;
                parts.push(prim(
                    polygon(&[
                        ((base + side).x, (base + side).y),
                        (tip.x, tip.y),
                        ((base - side).x, (base - side).y),
                    ]),
                    body,
                    Ink::Shape,
                ));
            }
            Figure::Paths(parts)
        }
        ShapeKind::Moon => one(crescent(r)),
        ShapeKind::Cloud => {
            let mut parts: Vec<Primitive> = [(-0.45, 0.15, 0.4), (0.0, -0.1, 0.55), (0.45, 0.15, 0.4)]
                .iter()
                .map(|&(x, y, cr)| {
                    prim(
                        Circle::new((x * r, y * r), cr * r).to_path(TOLERANCE),
                        body,
                        Ink::Shape,
                    )
                })
                .collect();
            parts.push(prim(
                Rect::new(-0.85 * r, 0.1 * r, 0.85 * r, 0.55 * r).to_path(TOLERANCE),
                body,
                Ink::Shape,
            ));
            Figure::Paths(parts)
        }
        ShapeKind::Raindrop => {
            let mut p = BezPath::new();
            p.move_to((0.0, -r));
            p.curve_to((0.15 * r, -0.55 * r), (0.65 * r, -0.1 * r), (0.65 * r, 0.3 * r));
            p.curve_to((0.65 * r, 0.7 * r), (0.3 * r, r), (0.0, r));
            p.curve_to((-0.3 * r, r), (-0.65 * r, 0.7 * r), (-0.65 * r, 0.3 * r));
            p.curve_to((-0.65 * r, -0.1 * r), (-0.15 * r, -0.55 * r), (0.0, -r));
            p.close_path();
            one(p)
        }
        ShapeKind::Character { ch } => Figure::Glyph { ch: *ch },
        ShapeKind::Image { asset_id } => Figure::Bitmap {
            asset_id: asset_id.clone(),
        },
        ShapeKind::Wave(band) => {
            let paint = if shape.stroke { body } else { Paint::Fill };
            Figure::Paths(vec![prim(wave_band(band), paint, Ink::Shape)])
        }
        ShapeKind::TruchetTile(tile) => Figure::Paths(truchet(tile, s)),
        ShapeKind::Guilloche(path) => guilloche(path),
        ShapeKind::Tile { corners } => one(polygon(&corners.map(|c| (c.x, c.y)))),
        ShapeKind::Blank => Figure::Nothing,
    }
}

fn prim(path: BezPath, paint: Paint, ink: Ink) -> Primitive {
    Primitive { path, paint, ink }
}

fn one_stroke(path: BezPath, width: f64) -> Figure {
    Figure::Paths(vec![prim(path, Paint::Stroke { width }, Ink::Shape)])
}

fn polygon(points: &[(f64, f64)]) -> BezPath {
    let mut p = BezPath::new();
    for (i, &pt) in points.iter().enumerate() {
        if i == 0 {
            p.move_to(pt);
        } else {
            p.line_to(pt);
        }
    }
    p.close_path();
    p
}

fn polyline(points: impl IntoIterator<Item = (f64, f64)>) -> BezPath {
    let mut p = BezPath::new();
    for (i, pt) in points.into_iter().enumerate() {
        if i == 0 {
            p.move_to(pt);
        } else {
            p.line_to(pt);
        }
    }
    p
}

/// Regular polygon with one vertex pointing up.
fn regular_polygon(sides: usize, r: f64) -> BezPath {
    let pts: Vec<_> = (0..sides)
        .map(|i| {
            let a = -FRAC_PI_2 + i as f64 * TAU / sides as f64;
            (r * a.cos(), r * a.sin())
        })
        .collect();
    polygon(&pts)
}

fn star(points: usize, outer: f64, inner: f64) -> BezPath {
    let pts: Vec<_> = (0..points * 2)
        .map(|i| {
            let rad = if i % 2 == 0 { outer } else { inner };
            let a = -FRAC_PI_2 + i as f64 * PI / points as f64;
            (rad * a.cos(), rad * a.sin())
        })
        .collect();
    polygon(&pts)
}

fn ring(shape: &ShapeData, r: f64) -> Figure {
    if shape.stroke {
        let w = shape.stroke_width.max(0.5);
        let mut p = Circle::new(Point::ZERO, r).to_path(TOLERANCE);
        p.extend(Circle::new(Point::ZERO, 0.55 * r).path_elements(TOLERANCE));
        one_stroke(p, w)
    } else {
        one_stroke(Circle::new(Point::ZERO, 0.775 * r).to_path(TOLERANCE), 0.45 * r)
    }
}

fn heart(r: f64) -> BezPath {
    let mut p = BezPath::new();
    p.move_to((0.0, 0.9 * r));
    p.curve_to((-0.2 * r, 0.7 * r), (-r, 0.25 * r), (-r, -0.3 * r));
    p.curve_to((-r, -0.8 * r), (-0.3 * r, -r), (0.0, -0.55 * r));
    p.curve_to((0.3 * r, -r), (r, -0.8 * r), (r, -0.3 * r));
    p.curve_to((r, 0.25 * r), (0.2 * r, 0.7 * r), (0.0, 0.9 * r));
    p.close_path();
    p
}

/// A closed wobbly outline whose lobe count and irregularity come from the
/// payload, never from the PRNG.
fn blob(lobes: usize, wobble: u32, r: f64) -> BezPath {
    let phase = f64::from(wobble & 0xffff) / 65536.0 * TAU;
    let amp = 0.1 + 0.15 * f64::from((wobble >> 16) & 0xff) / 255.0;
    let second = f64::from(wobble >> 24) / 255.0 * 0.08;
    let n = 72;
    let pts: Vec<_> = (0..n)
        .map(|i| {
            let a = i as f64 * TAU / n as f64;
            let rad = r
                * (1.0 - amp - second
                    + amp * (lobes as f64 * a + phase).sin()
                    + second * (2.0 * lobes as f64 * a).cos());
            (rad * a.cos(), rad * a.sin())
        })
        .collect();
    polygon(&pts)
}

fn flower(petals: usize, r: f64, body: Paint) -> Figure {
    let mut parts: Vec<Primitive> = (0..petals)
        .map(|k| {
            let petal = Ellipse::new((0.0, -0.5 * r), (0.25 * r, 0.5 * r), 0.0).to_path(TOLERANCE);
            let turn = Affine::rotate(k as f64 * TAU / petals as f64);
            prim(turn * petal, body, Ink::Shape)
        })
        .collect();
    parts.push(prim(
        Circle::new(Point::ZERO, 0.25 * r).to_path(TOLERANCE),
        body,
        Ink::Shaded(0.2),
    ));
    Figure::Paths(parts)
}

fn snowflake(r: f64) -> BezPath {
    let mut p = BezPath::new();
    for k in 0..6 {
        let a = k as f64 * TAU / 6.0 - FRAC_PI_2;
        let dir = Vec2::from_angle(a);
        let tip = dir * r;
        p.move_to((0.0, 0.0));
        p.line_to((tip.x, tip.y));
        let joint = dir * 0.6 * r;
        for side in [-1.0, 1.0] {
            let barb = Vec2::from_angle(a + side * PI / 4.0) * 0.25 * r;
            p.move_to((joint.x, joint.y));
            p.line_to(((joint + barb).x, (joint + barb).y));
        }
    }
    p
}

/// Crescent cut from a disk by an equal disk shifted right by `r / 2`.
fn crescent(r: f64) -> BezPath {
    let d = 0.5 * r;
    let y = (r * r - d * d / 4.0).sqrt();
    let theta1 = y.atan2(d / 2.0);
    let theta2 = (-y).atan2(-d / 2.0);

    let mut p = Arc {
        center: Point::ZERO,
        radii: Vec2::new(r, r),
        start_angle: theta1,
        sweep_angle: TAU - 2.0 * theta1,
        x_rotation: 0.0,
    }
    .to_path(TOLERANCE);
    p.extend(
        Arc {
            center: Point::new(d, 0.0),
            radii: Vec2::new(r, r),
            start_angle: theta2,
            sweep_angle: -TAU - 2.0 * theta2,
            x_rotation: 0.0,
        }
        .append_iter(TOLERANCE),
    );
    p.close_path();
    p
}

/// Samples per full sine cycle along each band edge.
const WAVE_SAMPLES_PER_CYCLE: u32 = 24;
const MAX_WAVE_SAMPLES: u32 = 4096;

fn wave_band(band: &WaveBand) -> BezPath {
    let n = band.cycles.saturating_mul(WAVE_SAMPLES_PER_CYCLE).clamp(48, MAX_WAVE_SAMPLES);
    let half_len = band.length / 2.0;
    let half_t = band.thickness / 2.0;
    let xs = || (0..=n).map(move |i| band.length * f64::from(i) / f64::from(n));

    let mut p = BezPath::new();
    for (i, x) in xs().enumerate() {
        let pt = (x - half_len, band.center_y(x) - half_t);
        if i == 0 {
            p.move_to(pt);
        } else {
            p.line_to(pt);
        }
    }
    let bottom: Vec<f64> = xs().collect();
    for &x in bottom.iter().rev() {
        p.line_to((x - half_len, band.center_y(x) + half_t));
    }
    p.close_path();
    p
}

/// Quarter arcs around two opposite corners of a `size` cell.
fn truchet(tile: &TruchetTile, size: f64) -> Vec<Primitive> {
    let h = size / 2.0;
    let n = tile.concentric.clamp(1, 5);
    let spacing = size / f64::from(n + 1);
    let band = tile.arc_weight.clamp(0.05, 1.0) * spacing;

    // (corner, start angle) pairs; each arc sweeps a quarter turn clockwise
    // in screen space.
    let corners = match tile.variant {
        TruchetVariant::NeSw => [((h, -h), FRAC_PI_2), ((-h, h), -FRAC_PI_2)],
        TruchetVariant::NwSe => [((-h, -h), 0.0), ((h, h), PI)],
    };

    let stretch = if tile.stretch.is_finite() && tile.stretch > 0.0 {
        tile.stretch
    } else {
        1.0
    };
    let squash = Affine::scale_non_uniform(1.0, stretch);

    let mut parts = Vec::new();
    for (corner, start) in corners {
        for k in 1..=n {
            let radius = spacing * f64::from(k);
            let arc_at = |rad: f64| {
                let mut path = Arc {
                    center: Point::from(corner),
                    radii: Vec2::new(rad, rad),
                    start_angle: start,
                    sweep_angle: FRAC_PI_2,
                    x_rotation: 0.0,
                }
                .to_path(TOLERANCE);
                path.apply_affine(squash);
                path
            };
            if tile.double_stroke {
                let width = tile.stroke_weight.max(0.5);
                for rad in [radius - band / 2.0, radius + band / 2.0] {
                    parts.push(prim(arc_at(rad.max(0.0)), Paint::Stroke { width }, Ink::Shape));
                }
            } else {
                parts.push(prim(arc_at(radius), Paint::Stroke { width: band.max(0.5) }, Ink::Shape));
            }
        }
    }
    parts
}

fn guilloche(path: &GuillochePath) -> Figure {
    if path.points.len() < 2 {
        return Figure::Nothing;
    }
    let mut p = polyline(path.points.iter().map(|v| (v.x, v.y)));
    let first = path.points[0];
    let last = path.points[path.points.len() - 1];
    if first.distance(last) < 1e-6 {
        p.close_path();
    }
    one_stroke(p, path.stroke_weight.max(0.25))
}
