//! Edge wrapping for seamless tiles.
//!
//! A shape whose bounding circle crosses a canvas edge is drawn again on the
//! opposite side. Both renderers take their offsets from [`wrap_offsets`], so
//! raster and vector output agree on which copies exist.

use glam::DVec2;

/// Draw offsets for a shape at `position` with bounding `radius`.
///
/// The primary offset `(0, 0)` always comes first. Crossing the left or right
/// edge adds `±width`, crossing the top or bottom adds `±height`, and
/// crossing one of each also adds the diagonal copy.
pub fn wrap_offsets(position: DVec2, radius: f64, width: f64, height: f64) -> Vec<DVec2> {
    let mut xs = vec![0.0];
    if position.x - radius < 0.0 {
        xs.push(width);
    }
    if position.x + radius > width {
        xs.push(-width);
    }

    let mut ys = vec![0.0];
    if position.y - radius < 0.0 {
        ys.push(height);
    }
    if position.y + radius > height {
        ys.push(-height);
    }

    let mut offsets = Vec::with_capacity(xs.len() * ys.len());
    for &dy in &ys {
        for &dx in &xs {
            offsets.push(DVec2::new(dx, dy));
        }
    }
    offsets
}
