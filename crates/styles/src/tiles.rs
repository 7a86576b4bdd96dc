//! Floor tilings: herringbone, chevron and basket-weave.
//!
//! Tiles are `L × W` rectangles (or their sheared chevron cousins) with
//! `W = 0.4 · base` and `L = ratio · W`. Every tile gets one dressing; the
//! color mode then decides whether it keeps the drawn palette color
//! (`random`), takes the first palette color (`mono`) or alternates between
//! the first two (`alternating`). Grout is inset from each tile's edges.

use std::f64::consts::SQRT_2;

use glam::DVec2;
use motif_core::config::TileColorMode;
use motif_core::shape::{ShapeData, ShapeKind};

use crate::context::GenContext;

fn tile_width(ctx: &GenContext<'_>) -> f64 {
    0.4 * ctx.base
}

/// Whole tiles per long side, at least 2.
fn whole_ratio(ratio: f64) -> u32 {
    if ratio.is_finite() {
        ratio.round().clamp(2.0, 12.0) as u32
    } else {
        3
    }
}

/// Turns pattern-space corners into a tile shape, or `None` when the
/// tile's center falls outside the canvas. Corners are scaled by `stretch`
/// first. Tiles hanging over an edge are emitted once, by whichever copy
/// has its center inside; the wrap renderer draws the rest. `parity`
/// selects the alternating color.
fn emit(ctx: &mut GenContext<'_>, corners: [DVec2; 4], parity: usize, stretch: DVec2) -> Option<ShapeData> {
    let corners = corners.map(|c| c * stretch);
    let center = corners.iter().copied().sum::<DVec2>() / 4.0;
    if !ctx.owns(center) {
        return None;
    }
    let local = corners.map(|c| c - center);
    let half_diagonal = local.iter().map(|c| c.length()).fold(0.0, f64::max);

    let mut tile = ctx.dress(ShapeKind::Tile { corners: local }, center, 1.5 * half_diagonal, 0.0);
    match ctx.config.tiles.color_mode {
        TileColorMode::Mono => tile.color = ctx.config.palette.color(0),
        TileColorMode::Alternating => tile.color = ctx.config.palette.color(parity),
        TileColorMode::Random => {}
    }
    Some(tile)
}

/// Axis-aligned rectangle corners inset by `grout / 2`, clockwise from the
/// top-left.
fn rect(origin: DVec2, size: DVec2, grout: f64) -> [DVec2; 4] {
    let inset = (grout / 2.0).min(size.x / 4.0).min(size.y / 4.0);
    let a = origin + DVec2::splat(inset);
    let b = origin + size - DVec2::splat(inset);
    [a, DVec2::new(b.x, a.y), b, DVec2::new(a.x, b.y)]
}

/// Staircase strips of alternating horizontal and vertical tiles.
///
/// Step `k` of a strip places a horizontal `L × W` tile at `(kW, kW)` and a
/// vertical `W × L` tile right below it at `(kW, kW + W)`. Neighboring
/// strips are shifted by `(L, −L)`. The pattern repeats every `2L` on both
/// axes.
pub fn herringbone(ctx: &mut GenContext<'_>) -> Vec<ShapeData> {
    let w = tile_width(ctx);
    let l = f64::from(whole_ratio(ctx.config.tiles.ratio)) * w;
    let grout = ctx.scaled(ctx.config.tiles.grout);
    let (counts, stretch) = ctx.fit(DVec2::splat(2.0 * l));
    let (width, height) = (counts.x * 2.0 * l, counts.y * 2.0 * l);
    // Quarter-tile shift keeps tile centers off the canvas edges.
    let shift = DVec2::splat(w / 4.0);

    // Step origins are (kW + mL, kW − mL): k indexes x + y, m indexes x − y.
    let m_lo = (-(height + l + w) / (2.0 * l)).floor() as i64 - 1;
    let m_hi = ((width + l + w) / (2.0 * l)).ceil() as i64 + 1;

    let mut shapes = Vec::new();
    for m in m_lo..=m_hi {
        let ml = m as f64 * l;
        // steps whose tiles can have their center on the canvas
        let k_lo = ((ml - l - w) / w).floor().max((-ml - l) / w) as i64 - 1;
        let k_hi = ((ml + height) / w).ceil().min(((width - ml) / w).ceil()) as i64 + 1;
        for k in k_lo..=k_hi {
            let step = DVec2::new(k as f64 * w + ml, k as f64 * w - ml) + shift;
            let horizontal = rect(step, DVec2::new(l, w), grout);
            let vertical = rect(step + DVec2::new(0.0, w), DVec2::new(w, l), grout);
            shapes.extend(emit(ctx, horizontal, 0, stretch));
            shapes.extend(emit(ctx, vertical, 1, stretch));
        }
    }
    shapes
}

/// Columns of 45° parallelograms whose slope flips every column, so
/// neighboring columns meet in V shapes. Colors alternate by row, so the
/// pattern repeats every two columns and two rows.
pub fn chevron(ctx: &mut GenContext<'_>) -> Vec<ShapeData> {
    let w = tile_width(ctx);
    let ratio = if ctx.config.tiles.ratio.is_finite() {
        ctx.config.tiles.ratio.clamp(1.0, 12.0)
    } else {
        3.0
    };
    let column = ratio * w / SQRT_2;
    let thickness = w * SQRT_2;
    let grout = ctx.scaled(ctx.config.tiles.grout).min(thickness / 2.0);
    let (counts, stretch) = ctx.fit(DVec2::new(2.0 * column, 2.0 * thickness));
    let cols = 2 * counts.x as i64;
    let rows = 2 * counts.y as i64;

    let mut shapes = Vec::new();
    for col in 0..cols {
        let rising = col % 2 == 1;
        let slope = if rising { -1.0 } else { 1.0 };
        let x0 = col as f64 * column + grout / 2.0;
        let x1 = (col + 1) as f64 * column - grout / 2.0;
        let run = x1 - x0;
        // centers land on (row + ½) · thickness
        let lift = if rising { column / 2.0 } else { -column / 2.0 };
        for row in 0..rows {
            let y0 = row as f64 * thickness + lift + slope * grout / 2.0 + grout / 2.0;
            let t = thickness - grout;
            let corners = [
                DVec2::new(x0, y0),
                DVec2::new(x1, y0 + slope * run),
                DVec2::new(x1, y0 + slope * run + t),
                DVec2::new(x0, y0 + t),
            ];
            shapes.extend(emit(ctx, corners, row.rem_euclid(2) as usize, stretch));
        }
    }
    shapes
}

/// Square `L × L` blocks of `ratio` parallel tiles, orientation alternating
/// like a checkerboard.
pub fn basket_weave(ctx: &mut GenContext<'_>) -> Vec<ShapeData> {
    let w = tile_width(ctx);
    let n = whole_ratio(ctx.config.tiles.ratio);
    let l = f64::from(n) * w;
    let grout = ctx.scaled(ctx.config.tiles.grout);
    let (counts, stretch) = ctx.fit(DVec2::splat(2.0 * l));
    let cols = 2 * counts.x as usize;
    let rows = 2 * counts.y as usize;

    let mut shapes = Vec::new();
    for by in 0..rows {
        for bx in 0..cols {
            let block = DVec2::new(bx as f64 * l, by as f64 * l);
            let horizontal = (bx + by) % 2 == 0;
            for i in 0..n {
                let offset = f64::from(i) * w;
                let corners = if horizontal {
                    rect(block + DVec2::new(0.0, offset), DVec2::new(l, w), grout)
                } else {
                    rect(block + DVec2::new(offset, 0.0), DVec2::new(w, l), grout)
                };
                shapes.extend(emit(ctx, corners, usize::from(!horizontal), stretch));
            }
        }
    }
    shapes
}
