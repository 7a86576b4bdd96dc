//! Symmetry post-processor.
//!
//! Expands a generated shape list into `order` copies. Copies are appended
//! as whole blocks in order, each block preserving the source order, so copy
//! `k` of shape `i` lands at index `i + k·n`.

use glam::DVec2;

use crate::config::SymmetryGroup;
use crate::shape::ShapeData;

/// Reflection across the vertical center line.
fn mirror_x(shape: &mut ShapeData, width: f64) {
    shape.position.x = width - shape.position.x;
    shape.rotation = -shape.rotation;
    shape.mirrored = !shape.mirrored;
}

/// Reflection across the horizontal center line.
fn mirror_y(shape: &mut ShapeData, height: f64) {
    shape.position.y = height - shape.position.y;
    shape.rotation = 180.0 - shape.rotation;
    shape.mirrored = !shape.mirrored;
}

fn rotate_about_center(shape: &mut ShapeData, center: DVec2, quarter_turns: u32) {
    let angle = f64::from(quarter_turns) * std::f64::consts::FRAC_PI_2;
    let rel = shape.position - center;
    shape.position = center + DVec2::from_angle(angle).rotate(rel);
    shape.rotation += f64::from(quarter_turns) * 90.0;
}

/// Applies `group` to `shapes` and reindexes the result.
pub fn apply(shapes: Vec<ShapeData>, width: f64, height: f64, group: SymmetryGroup) -> Vec<ShapeData> {
    let n = shapes.len();
    let order = group.order();
    let center = DVec2::new(width / 2.0, height / 2.0);
    let mut out = Vec::with_capacity(n * order);

    for k in 0..order {
        for (i, source) in shapes.iter().enumerate() {
            let mut s = source.clone();
            match (group, k) {
                (_, 0) => {}
                (SymmetryGroup::Mirror, _) => mirror_x(&mut s, width),
                (SymmetryGroup::DoubleMirror, 1) => mirror_x(&mut s, width),
                (SymmetryGroup::DoubleMirror, 2) => mirror_y(&mut s, height),
                (SymmetryGroup::DoubleMirror, _) => {
                    mirror_x(&mut s, width);
                    mirror_y(&mut s, height);
                }
                (SymmetryGroup::Kaleidoscope, _) => {
                    rotate_about_center(&mut s, center, (k / 2) as u32);
                    if k % 2 == 1 {
                        mirror_x(&mut s, width);
                    }
                }
                (SymmetryGroup::None, _) => {}
            }
            s.index = i + k * n;
            out.push(s);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Srgb;
    use crate::shape::ShapeKind;

    const W: f64 = 400.0;
    const H: f64 = 300.0;

    fn shapes() -> Vec<ShapeData> {
        [(10.0, 20.0, 15.0), (300.0, 50.0, -30.0), (200.0, 250.0, 90.0)]
            .iter()
            .enumerate()
            .map(|(i, &(x, y, rot))| {
                let mut s = ShapeData::new(ShapeKind::Square, DVec2::new(x, y), 10.0, Srgb::BLACK);
                s.index = i;
                s.rotation = rot;
                s
            })
            .collect()
    }

    #[test]
    fn copy_counts_match_group_order() {
        for group in [
            SymmetryGroup::None,
            SymmetryGroup::Mirror,
            SymmetryGroup::DoubleMirror,
            SymmetryGroup::Kaleidoscope,
        ] {
            assert_eq!(apply(shapes(), W, H, group).len(), 3 * group.order());
        }
    }

    #[test]
    fn indices_follow_block_layout() {
        let out = apply(shapes(), W, H, SymmetryGroup::Kaleidoscope);
        for (pos, s) in out.iter().enumerate() {
            assert_eq!(s.index, pos);
        }
        // Copy 5 of shape 1 is at 1 + 5·3.
        let src = &out[1];
        let copy = &out[1 + 5 * 3];
        assert_eq!(copy.kind, src.kind);
    }

    #[test]
    fn mirror_reflects_and_toggles() {
        let out = apply(shapes(), W, H, SymmetryGroup::Mirror);
        let (a, b) = (&out[0], &out[3]);
        assert_eq!(b.position, DVec2::new(W - 10.0, 20.0));
        assert_eq!(b.rotation, -15.0);
        assert!(!a.mirrored && b.mirrored);
    }

    #[test]
    fn double_mirror_fourth_copy_is_point_reflection() {
        let out = apply(shapes(), W, H, SymmetryGroup::DoubleMirror);
        let s = &out[9];
        assert_eq!(s.position, DVec2::new(W - 10.0, H - 20.0));
        // Two reflections cancel the flip; rotation ends up 180 + original.
        assert!(!s.mirrored);
        assert!((s.rotation - 195.0).abs() < 1e-9);
    }

    #[test]
    fn kaleidoscope_rotations_keep_distance_to_center() {
        let out = apply(shapes(), W, H, SymmetryGroup::Kaleidoscope);
        let c = DVec2::new(W / 2.0, H / 2.0);
        let d0 = out[0].position.distance(c);
        for k in 0..8 {
            let d = out[k * 3].position.distance(c);
            assert!((d - d0).abs() < 1e-9);
        }
    }

    #[test]
    fn none_is_identity() {
        assert_eq!(apply(shapes(), W, H, SymmetryGroup::None), shapes());
    }
}
