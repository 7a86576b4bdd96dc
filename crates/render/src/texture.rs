//! Grain texture overlay.

use motif_core::error::MotifError;
use motif_core::field::Field;
use motif_core::grain::grain_field;
use resvg::tiny_skia::{BlendMode, FilterQuality, Paint, Pattern, Pixmap, Rect, SpreadMode, Transform};

use crate::pixel::{field_to_rgba, pixmap_from_rgba};
use crate::RenderResult;

/// A square tileable noise texture, repeated across the canvas and blended
/// with `overlay` at the layer's texture opacity. The tile is stretched so a
/// whole number of repeats spans the canvas, keeping the grain continuous
/// across the wrapped edges.
#[derive(Debug, Clone)]
pub struct GrainTexture {
    pixmap: Pixmap,
    seed: u64,
}

impl GrainTexture {
    /// Default tile edge in pixels.
    pub const DEFAULT_SIZE: usize = 256;

    pub fn generate(size: usize, seed: u64) -> RenderResult<Self> {
        let field = grain_field(size, size, seed)?;
        Self::from_field(&field, seed)
    }

    pub fn from_field(field: &Field, seed: u64) -> RenderResult<Self> {
        let w = u32::try_from(field.width()).map_err(|_| MotifError::InvalidDimensions)?;
        let h = u32::try_from(field.height()).map_err(|_| MotifError::InvalidDimensions)?;
        let pixmap = pixmap_from_rgba(w, h, &field_to_rgba(field)).ok_or(MotifError::InvalidDimensions)?;
        Ok(Self { pixmap, seed })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Per-axis scale that makes a whole number of tiles span a
    /// `width × height` canvas.
    pub fn tile_scale(&self, width: u32, height: u32) -> (f32, f32) {
        let fit = |canvas: u32, tile: u32| {
            let (canvas, tile) = (canvas as f32, tile as f32);
            let repeats = (canvas / tile).round().max(1.0);
            canvas / (repeats * tile)
        };
        (fit(width, self.pixmap.width()), fit(height, self.pixmap.height()))
    }

    /// Tiles the texture over all of `target`.
    pub fn overlay(&self, target: &mut Pixmap, opacity: f64) {
        let opacity = opacity.clamp(0.0, 1.0) as f32;
        if opacity <= 0.0 {
            return;
        }
        let Some(rect) = Rect::from_xywh(0.0, 0.0, target.width() as f32, target.height() as f32) else {
            return;
        };
        let (sx, sy) = self.tile_scale(target.width(), target.height());
        let paint = Paint {
            shader: Pattern::new(
                self.pixmap.as_ref(),
                SpreadMode::Repeat,
                FilterQuality::Nearest,
                opacity,
                Transform::from_scale(sx, sy),
            ),
            blend_mode: BlendMode::Overlay,
            ..Paint::default()
        };
        target.fill_rect(rect, &paint, Transform::identity(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resvg::tiny_skia::Color;

    #[test]
    fn generate_is_deterministic() {
        let a = GrainTexture::generate(16, 3).unwrap();
        let b = GrainTexture::generate(16, 3).unwrap();
        assert_eq!(a.pixmap().data(), b.pixmap().data());
        assert_eq!(a.seed(), 3);
    }

    #[test]
    fn zero_opacity_leaves_target_untouched() {
        let tex = GrainTexture::generate(8, 1).unwrap();
        let mut target = Pixmap::new(20, 20).unwrap();
        target.fill(Color::from_rgba8(100, 150, 200, 255));
        let before = target.data().to_vec();
        tex.overlay(&mut target, 0.0);
        assert_eq!(target.data(), &before[..]);
    }

    #[test]
    fn tile_scale_fits_whole_repeats() {
        let tex = GrainTexture::generate(GrainTexture::DEFAULT_SIZE, 1).unwrap();
        for (w, h) in [(300, 200), (1920, 1080), (256, 256), (100, 700)] {
            let (sx, sy) = tex.tile_scale(w, h);
            let rx = w as f32 / (256.0 * sx);
            let ry = h as f32 / (256.0 * sy);
            assert!((rx - rx.round()).abs() < 1e-4 && rx.round() >= 1.0, "{w}: {rx}");
            assert!((ry - ry.round()).abs() < 1e-4 && ry.round() >= 1.0, "{h}: {ry}");
        }
        assert_eq!(tex.tile_scale(256, 512), (1.0, 1.0));
    }

    #[test]
    fn grain_repeats_with_a_period_dividing_the_canvas() {
        // 7 px tile on an 18 px canvas: three repeats of 6 px
        let tex = GrainTexture::generate(7, 5).unwrap();
        let mut target = Pixmap::new(18, 18).unwrap();
        target.fill(Color::from_rgba8(128, 128, 128, 255));
        tex.overlay(&mut target, 1.0);
        for y in 0..18 {
            for x in 0..12 {
                assert_eq!(target.pixel(x, y), target.pixel(x + 6, y), "({x}, {y})");
                assert_eq!(target.pixel(y, x), target.pixel(y, x + 6), "({y}, {x})");
            }
        }
    }

    #[test]
    fn overlay_changes_pixels_and_keeps_alpha() {
        let tex = GrainTexture::generate(8, 1).unwrap();
        let mut target = Pixmap::new(20, 20).unwrap();
        target.fill(Color::from_rgba8(100, 150, 200, 255));
        let before = target.data().to_vec();
        tex.overlay(&mut target, 1.0);
        assert_ne!(target.data(), &before[..]);
        assert!(target.pixels().iter().all(|p| p.alpha() == 255));
    }
}
