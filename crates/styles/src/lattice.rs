//! Lattice styles: grid, hex, isometric and radial.
//!
//! Every lattice site first draws its drop roll, then (if kept) its shape
//! kind, rotation and dressing. Sites are visited in a fixed order so the
//! stream lines up between runs.

use std::f64::consts::TAU;

use glam::DVec2;
use motif_core::shape::{ShapeData, ShapeKind, ShapeType};

use crate::context::GenContext;

const GRID_DROP: f64 = 0.2;
const HEX_DROP: f64 = 0.25;
const ISOMETRIC_DROP: f64 = 0.2;
const RADIAL_DROP: f64 = 0.3;

/// Brightness delta of the lit top face and the shaded right face.
const FACE_SHADE: f64 = 0.15;

const GRID_SHAPES: &[ShapeType] = &[
    ShapeType::Square,
    ShapeType::Circle,
    ShapeType::Triangle,
    ShapeType::Diamond,
    ShapeType::Cross,
    ShapeType::Ring,
    ShapeType::QuarterCircle,
    ShapeType::SemiCircle,
];

const HEX_SHAPES: &[ShapeType] = &[
    ShapeType::Hexagon,
    ShapeType::Circle,
    ShapeType::Ring,
    ShapeType::Star,
];

const RADIAL_SHAPES: &[ShapeType] = &[
    ShapeType::Circle,
    ShapeType::Triangle,
    ShapeType::Diamond,
    ShapeType::SemiCircle,
    ShapeType::Star,
    ShapeType::Heart,
];

fn quarter_turn(ctx: &mut GenContext<'_>) -> f64 {
    ctx.rng.next_usize(4) as f64 * 90.0
}

/// Square cells of `base + gap`, stretched to divide the canvas evenly.
pub fn grid(ctx: &mut GenContext<'_>) -> Vec<ShapeData> {
    let gap = ctx.scaled(ctx.config.grid.gap);
    let pitch = ctx.base + gap;
    let cols = (ctx.width / pitch).round().max(1.0) as usize;
    let rows = (ctx.height / pitch).round().max(1.0) as usize;
    let (cw, ch) = (ctx.width / cols as f64, ctx.height / rows as f64);
    let size = (cw.min(ch) - gap).max(1.0);
    let types = ctx.allowed(GRID_SHAPES);

    let mut shapes = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            if ctx.rng.next_bool(GRID_DROP) {
                continue;
            }
            let pos = DVec2::new((col as f64 + 0.5) * cw, (row as f64 + 0.5) * ch);
            let kind = ctx.pick_kind(&types);
            let rotation = quarter_turn(ctx);
            shapes.push(ctx.dress(kind, pos, size, rotation));
        }
    }
    shapes
}

/// Sites per row and row count of a staggered lattice with site spacing
/// `dx` and row spacing `dy`, plus the stretch that makes it wrap. Rows
/// alternate their offset, so the lattice repeats every two rows.
fn staggered(ctx: &GenContext<'_>, dx: f64, dy: f64) -> (usize, usize, DVec2) {
    let (counts, stretch) = ctx.fit(DVec2::new(dx, 2.0 * dy));
    (counts.x as usize, 2 * counts.y as usize, stretch)
}

/// Pointy-top hexagonal lattice with circumradius `0.6 · base`.
pub fn hex(ctx: &mut GenContext<'_>) -> Vec<ShapeData> {
    let radius = 0.6 * ctx.base;
    let dx = 3f64.sqrt() * radius;
    let dy = 1.5 * radius;
    let (cols, rows, stretch) = staggered(ctx, dx, dy);
    let types = ctx.allowed(HEX_SHAPES);

    let mut shapes = Vec::new();
    for row in 0..rows {
        let shift = if row % 2 == 1 { dx / 2.0 } else { 0.0 };
        for col in 0..cols {
            if ctx.rng.next_bool(HEX_DROP) {
                continue;
            }
            let pos = DVec2::new(col as f64 * dx + shift, row as f64 * dy) * stretch;
            let kind = ctx.pick_kind(&types);
            let rotation = if kind == ShapeKind::Hexagon { 30.0 } else { 0.0 };
            shapes.push(ctx.dress(kind, pos, 1.8 * radius, rotation));
        }
    }
    shapes
}

/// Rhombus faces of an isometric cube of edge `a` centered on the origin:
/// top, left, right.
fn cube_faces(a: f64) -> [[DVec2; 4]; 3] {
    let s = a * 3f64.sqrt() / 2.0;
    let o = DVec2::ZERO;
    let top = DVec2::new(0.0, -a);
    let bottom = DVec2::new(0.0, a);
    let upper_left = DVec2::new(-s, -a / 2.0);
    let upper_right = DVec2::new(s, -a / 2.0);
    let lower_left = DVec2::new(-s, a / 2.0);
    let lower_right = DVec2::new(s, a / 2.0);
    [
        [o, upper_left, top, upper_right],
        [o, bottom, lower_left, upper_left],
        [o, upper_right, lower_right, bottom],
    ]
}

/// Stacked isometric cubes, each drawn as three shaded faces that share one
/// dressing. A configured allow-list replaces the cubes with those shapes
/// on the same lattice.
pub fn isometric(ctx: &mut GenContext<'_>) -> Vec<ShapeData> {
    let a = 0.8 * ctx.base;
    let dx = 3f64.sqrt() * a;
    let dy = 1.5 * a;
    let (cols, rows, stretch) = staggered(ctx, dx, dy);
    let faces = cube_faces(a).map(|face| face.map(|c| c * stretch));
    let cube_size = 1.5 * a * stretch.max_element().max(1.0);
    let custom = !ctx.config.shape_types.is_empty();
    let types = ctx.allowed(&[]);

    let mut shapes = Vec::new();
    for row in 0..rows {
        let shift = if row % 2 == 1 { dx / 2.0 } else { 0.0 };
        for col in 0..cols {
            if ctx.rng.next_bool(ISOMETRIC_DROP) {
                continue;
            }
            let pos = DVec2::new(col as f64 * dx + shift, row as f64 * dy) * stretch;
            if custom {
                let kind = ctx.pick_kind(&types);
                let rotation = quarter_turn(ctx);
                shapes.push(ctx.dress(kind, pos, 1.5 * a, rotation));
                continue;
            }
            let cube = ctx.dress(ShapeKind::Tile { corners: faces[0] }, pos, cube_size, 0.0);
            let colors = [
                cube.color.shade(FACE_SHADE),
                cube.color,
                cube.color.shade(-FACE_SHADE),
            ];
            for (corners, color) in faces.iter().zip(colors) {
                let mut face = cube.clone();
                face.kind = ShapeKind::Tile { corners: *corners };
                face.color = color;
                shapes.push(face);
            }
        }
    }
    shapes
}

/// Concentric rings around the canvas center, spaced `1.2 · base`. Odd
/// rings are offset by half a step; shapes face outward.
pub fn radial(ctx: &mut GenContext<'_>) -> Vec<ShapeData> {
    let center = DVec2::new(ctx.width / 2.0, ctx.height / 2.0);
    let spacing = 1.2 * ctx.base;
    let reach = center.length();
    let rings = (reach / spacing).ceil() as usize;
    let size = 0.9 * ctx.base;
    let types = ctx.allowed(RADIAL_SHAPES);

    let mut shapes = Vec::new();
    if !ctx.rng.next_bool(RADIAL_DROP) {
        let kind = ctx.pick_kind(&types);
        shapes.push(ctx.dress(kind, center, size, 0.0));
    }
    for ring in 1..=rings {
        let r = ring as f64 * spacing;
        let count = (TAU * r / spacing).round().max(1.0) as usize;
        let step = TAU / count as f64;
        let offset = if ring % 2 == 1 { step / 2.0 } else { 0.0 };
        for i in 0..count {
            let angle = offset + i as f64 * step;
            let pos = center + DVec2::from_angle(angle) * r;
            let inside = (0.0..=ctx.width).contains(&pos.x) && (0.0..=ctx.height).contains(&pos.y);
            if !inside {
                continue;
            }
            if ctx.rng.next_bool(RADIAL_DROP) {
                continue;
            }
            let kind = ctx.pick_kind(&types);
            shapes.push(ctx.dress(kind, pos, size, angle.to_degrees() + 90.0));
        }
    }
    shapes
}

#[cfg(test)]
mod tests {
    use super::*;
    use motif_core::config::LayerConfig;

    fn run(f: fn(&mut GenContext<'_>) -> Vec<ShapeData>, cfg: &LayerConfig, w: f64, h: f64) -> Vec<ShapeData> {
        let mut ctx = GenContext::new(w, h, cfg);
        f(&mut ctx)
    }

    // -- Grid --

    #[test]
    fn grid_drops_about_a_fifth() {
        let cfg = LayerConfig {
            scale: 0.25,
            grid: motif_core::config::GridOptions { gap: 0.0 },
            ..LayerConfig::default()
        };
        // base 25 → 40 × 40 cells
        let shapes = run(grid, &cfg, 1000.0, 1000.0);
        let kept = shapes.len() as f64 / 1600.0;
        assert!((0.76..0.84).contains(&kept), "kept {kept}");
    }

    #[test]
    fn grid_cells_sit_on_cell_centers() {
        let cfg = LayerConfig::default();
        let shapes = run(grid, &cfg, 400.0, 200.0);
        // base 20 + gap 8 → 14 × 7 cells
        let cw = 400.0 / 14.0;
        for s in &shapes {
            let fx = s.position.x / cw - 0.5;
            assert!((fx - fx.round()).abs() < 1e-9);
            assert_eq!(s.rotation % 90.0, 0.0);
        }
    }

    #[test]
    fn grid_honors_allow_list() {
        let cfg = LayerConfig {
            shape_types: vec![ShapeType::Heart],
            ..LayerConfig::default()
        };
        assert!(run(grid, &cfg, 300.0, 300.0).iter().all(|s| s.kind == ShapeKind::Heart));
    }

    // -- Hex --

    #[test]
    fn hex_rows_alternate_offset() {
        let cfg = LayerConfig {
            shape_types: vec![ShapeType::Circle],
            ..LayerConfig::default()
        };
        let shapes = run(hex, &cfg, 300.0, 300.0);
        let (dx, dy) = (3f64.sqrt() * 0.6 * 30.0, 1.5 * 0.6 * 30.0);
        let (_, _, stretch) = staggered(&GenContext::new(300.0, 300.0, &cfg), dx, dy);
        let (dx, dy) = (dx * stretch.x, dy * stretch.y);
        for s in &shapes {
            let row = (s.position.y / dy).round() as usize;
            let shift = if row % 2 == 1 { dx / 2.0 } else { 0.0 };
            let col = (s.position.x - shift) / dx;
            assert!((col - col.round()).abs() < 1e-9);
        }
    }

    #[test]
    fn staggered_lattices_wrap_exactly() {
        let cfg = LayerConfig {
            shape_types: vec![ShapeType::Circle],
            ..LayerConfig::default()
        };
        for f in [hex, isometric] {
            for (w, h) in [(300.0, 300.0), (317.0, 211.0)] {
                for s in run(f, &cfg, w, h) {
                    assert!((0.0..w).contains(&s.position.x), "x {}", s.position.x);
                    assert!((0.0..h).contains(&s.position.y), "y {}", s.position.y);
                }
            }
        }
        let ctx = GenContext::new(317.0, 211.0, &cfg);
        let (cols, rows, stretch) = staggered(&ctx, 20.0, 15.0);
        assert_eq!(rows % 2, 0);
        assert!((cols as f64 * 20.0 * stretch.x - 317.0).abs() < 1e-9);
        assert!((rows as f64 * 15.0 * stretch.y - 211.0).abs() < 1e-9);
    }

    // -- Isometric --

    #[test]
    fn isometric_emits_three_faces_per_cube() {
        let shapes = run(isometric, &LayerConfig::default(), 300.0, 300.0);
        assert_eq!(shapes.len() % 3, 0);
        for cube in shapes.chunks(3) {
            assert!(cube.iter().all(|s| s.position == cube[0].position));
            assert_eq!(cube[0].color, cube[1].color.shade(FACE_SHADE));
            assert!(cube.iter().all(|s| matches!(s.kind, ShapeKind::Tile { .. })));
        }
    }

    #[test]
    fn cube_faces_stay_inside_bounding_radius() {
        let a = 12.0;
        for face in cube_faces(a) {
            assert!(face.iter().all(|c| c.length() <= a + 1e-9));
        }
    }

    #[test]
    fn isometric_allow_list_replaces_cubes() {
        let cfg = LayerConfig {
            shape_types: vec![ShapeType::Star],
            ..LayerConfig::default()
        };
        let shapes = run(isometric, &cfg, 300.0, 300.0);
        assert!(shapes.iter().all(|s| matches!(s.kind, ShapeKind::Star { .. })));
    }

    // -- Radial --

    #[test]
    fn radial_shapes_face_outward_and_stay_on_canvas() {
        let shapes = run(radial, &LayerConfig::default(), 400.0, 300.0);
        let center = DVec2::new(200.0, 150.0);
        for s in shapes.iter().filter(|s| s.position != center) {
            assert!((0.0..=400.0).contains(&s.position.x));
            assert!((0.0..=300.0).contains(&s.position.y));
            let angle = (s.position - center).to_angle().to_degrees() + 90.0;
            let diff = (s.rotation - angle).rem_euclid(360.0);
            assert!(diff < 1e-6 || (360.0 - diff) < 1e-6);
        }
    }
}
