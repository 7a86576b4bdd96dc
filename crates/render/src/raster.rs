//! CPU raster backend on tiny-skia.
//!
//! Each visible layer is drawn into its own full-size pixmap and then
//! composited onto the target with the layer's opacity and blend mode.

use kurbo::{Affine, BezPath, PathEl};
use motif_core::color::Srgb;
use motif_core::config::{TextMode, TextOverlay};
use motif_core::error::MotifError;
use motif_core::outline::{self, Figure, Paint, Primitive};
use motif_core::request::FrameSpec;
use motif_core::state::{AppState, BlendMode};
use resvg::tiny_skia::{
    self, Color, FillRule, FilterQuality, LineCap, LineJoin, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke,
    Transform,
};

use crate::assets::ImageStore;
use crate::scene::{self, DrawItem, LayerScene};
use crate::text::TextRenderer;
use crate::{DrawLog, DrawRecord, FrameRequest, GrainTexture, RenderResult};

/// tiny-skia blend mode for a layer or overlay blend mode.
pub fn sk_blend(mode: BlendMode) -> tiny_skia::BlendMode {
    match mode {
        BlendMode::Normal => tiny_skia::BlendMode::SourceOver,
        BlendMode::Additive => tiny_skia::BlendMode::Plus,
        BlendMode::Multiply => tiny_skia::BlendMode::Multiply,
        BlendMode::Screen => tiny_skia::BlendMode::Screen,
        BlendMode::Overlay => tiny_skia::BlendMode::Overlay,
    }
}

fn sk_color(c: Srgb) -> Color {
    let [r, g, b] = c.to_rgb8();
    Color::from_rgba8(r, g, b, 255)
}

/// Converts a kurbo affine to a tiny-skia transform.
pub fn sk_transform(a: Affine) -> Transform {
    let [sx, ky, kx, sy, tx, ty] = a.as_coeffs();
    Transform::from_row(sx as f32, ky as f32, kx as f32, sy as f32, tx as f32, ty as f32)
}

/// Converts a kurbo path. Returns `None` for paths with no drawable segment.
pub fn sk_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(a, p) => pb.quad_to(a.x as f32, a.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(a, b, p) => {
                pb.cubic_to(a.x as f32, a.y as f32, b.x as f32, b.y as f32, p.x as f32, p.y as f32)
            }
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

fn pixmap_paint(opacity: f64, blend: tiny_skia::BlendMode, quality: FilterQuality) -> PixmapPaint {
    PixmapPaint {
        opacity: opacity.clamp(0.0, 1.0) as f32,
        blend_mode: blend,
        quality,
    }
}

/// Renders frames into tiny-skia pixmaps.
#[derive(Clone, Default)]
pub struct RasterRenderer {
    text: TextRenderer,
}

impl RasterRenderer {
    /// A renderer using the system fonts.
    pub fn new() -> Self {
        Self::with_text(TextRenderer::new())
    }

    pub fn with_text(text: TextRenderer) -> Self {
        Self { text }
    }

    pub fn text(&self) -> &TextRenderer {
        &self.text
    }

    /// Allocates a pixmap for `spec` and renders `state` into it.
    pub fn render_frame(
        &self,
        state: &AppState,
        images: &ImageStore,
        grain: Option<&GrainTexture>,
        spec: &FrameSpec,
    ) -> RenderResult<(Pixmap, DrawLog)> {
        spec.validate()?;
        let mut pixmap = Pixmap::new(spec.width, spec.height).ok_or(MotifError::InvalidDimensions)?;
        let mut request = FrameRequest::new(state, images)
            .at(spec.time_ms)
            .with_transparent_background(spec.transparent_background);
        if let Some(g) = grain {
            request = request.with_grain(g);
        }
        let log = self.render(&mut pixmap, &request)?;
        Ok((pixmap, log))
    }

    /// Clears `target` and draws every visible layer into it, bottom to top.
    #[tracing::instrument(level = "debug", skip_all, fields(width = target.width(), height = target.height()))]
    pub fn render(&self, target: &mut Pixmap, request: &FrameRequest<'_>) -> RenderResult<DrawLog> {
        let (w, h) = (target.width(), target.height());
        let scenes = scene::prepare(request, f64::from(w), f64::from(h), &self.text)?;
        target.fill(Color::TRANSPARENT);

        let mut log = DrawLog::default();
        for layer in &scenes {
            let mut surface = Pixmap::new(w, h).ok_or(MotifError::InvalidDimensions)?;
            self.draw_layer(&mut surface, layer, request, &mut log)?;
            target.draw_pixmap(
                0,
                0,
                surface.as_ref(),
                &pixmap_paint(layer.opacity, sk_blend(layer.blend_mode), FilterQuality::Nearest),
                Transform::identity(),
                None,
            );
        }
        Ok(log)
    }

    fn draw_layer(
        &self,
        surface: &mut Pixmap,
        layer: &LayerScene,
        request: &FrameRequest<'_>,
        log: &mut DrawLog,
    ) -> RenderResult<()> {
        let (w, h) = (surface.width(), surface.height());
        match &layer.text {
            Some(overlay) if overlay.mode == TextMode::Clip => {
                let glyphs = self.text.overlay_pixmap(overlay, w, h, overlay.color)?;
                surface.draw_pixmap(
                    0,
                    0,
                    glyphs.as_ref(),
                    &pixmap_paint(overlay.opacity, tiny_skia::BlendMode::SourceOver, FilterQuality::Nearest),
                    Transform::identity(),
                    None,
                );
                if let Some(bg) = layer.background {
                    fill_surface(surface, bg, tiny_skia::BlendMode::SourceIn);
                }
                self.draw_items(surface, layer, request, tiny_skia::BlendMode::SourceAtop, log)?;
            }
            _ => {
                if let Some(bg) = layer.background {
                    surface.fill(sk_color(bg));
                }
                self.draw_items(surface, layer, request, tiny_skia::BlendMode::SourceOver, log)?;
                if let Some(overlay) = &layer.text {
                    self.draw_overlay(surface, overlay)?;
                }
            }
        }

        if let Some(grain) = request.grain {
            if layer.texture > 0.0 {
                grain.overlay(surface, layer.texture);
            }
        }
        Ok(())
    }

    fn draw_overlay(&self, surface: &mut Pixmap, overlay: &TextOverlay) -> RenderResult<()> {
        let glyphs = self
            .text
            .overlay_pixmap(overlay, surface.width(), surface.height(), overlay.color)?;
        surface.draw_pixmap(
            0,
            0,
            glyphs.as_ref(),
            &pixmap_paint(overlay.opacity, sk_blend(overlay.blend_mode), FilterQuality::Nearest),
            Transform::identity(),
            None,
        );
        Ok(())
    }

    fn draw_items(
        &self,
        surface: &mut Pixmap,
        layer: &LayerScene,
        request: &FrameRequest<'_>,
        blend: tiny_skia::BlendMode,
        log: &mut DrawLog,
    ) -> RenderResult<()> {
        for item in &layer.items {
            let figure = outline::outline(&item.shape);
            for &offset in &item.offsets {
                log.push(DrawRecord {
                    layer: layer.layer_id.clone(),
                    index: item.shape.index,
                    kind: item.shape.kind.tag(),
                    position: item.shape.position + offset,
                });
                let affine = outline::shape_transform(&item.shape, offset);
                self.draw_figure(surface, item, &figure, affine, layer, request, blend)?;
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_figure(
        &self,
        surface: &mut Pixmap,
        item: &DrawItem,
        figure: &Figure,
        affine: Affine,
        layer: &LayerScene,
        request: &FrameRequest<'_>,
        blend: tiny_skia::BlendMode,
    ) -> RenderResult<()> {
        let shape = &item.shape;
        match figure {
            Figure::Paths(prims) => {
                for prim in prims {
                    draw_primitive(surface, prim, shape.color, affine, blend);
                }
            }
            Figure::Glyph { ch } => {
                let glyph = self.text.glyph_pixmap(*ch, shape.size, &layer.font_family, shape.color)?;
                let half = f64::from(glyph.width()) / 2.0;
                let t = affine * Affine::translate((-half, -half));
                surface.draw_pixmap(
                    0,
                    0,
                    glyph.as_ref(),
                    &pixmap_paint(1.0, blend, FilterQuality::Bilinear),
                    sk_transform(t),
                    None,
                );
            }
            Figure::Bitmap { asset_id } => {
                let Some(image) = request.images.get(asset_id) else {
                    return Ok(());
                };
                let s = shape.size.max(0.0);
                let (iw, ih) = (f64::from(image.pixmap.width()), f64::from(image.pixmap.height()));
                let t = affine
                    * Affine::translate((-s / 2.0, -s / 2.0))
                    * Affine::scale_non_uniform(s / iw, s / ih);
                surface.draw_pixmap(
                    0,
                    0,
                    image.pixmap.as_ref(),
                    &pixmap_paint(1.0, blend, FilterQuality::Bilinear),
                    sk_transform(t),
                    None,
                );
            }
            Figure::Nothing => {}
        }
        Ok(())
    }
}

fn fill_surface(surface: &mut Pixmap, color: Srgb, blend: tiny_skia::BlendMode) {
    let Some(rect) = Rect::from_xywh(0.0, 0.0, surface.width() as f32, surface.height() as f32) else {
        return;
    };
    let mut paint = tiny_skia::Paint::default();
    paint.set_color(sk_color(color));
    paint.blend_mode = blend;
    surface.fill_rect(rect, &paint, Transform::identity(), None);
}

fn draw_primitive(surface: &mut Pixmap, prim: &Primitive, base: Srgb, affine: Affine, blend: tiny_skia::BlendMode) {
    let Some(path) = sk_path(&prim.path) else {
        return;
    };
    let mut paint = tiny_skia::Paint::default();
    paint.set_color(sk_color(prim.ink.resolve(base)));
    paint.anti_alias = true;
    paint.blend_mode = blend;
    let transform = sk_transform(affine);
    match prim.paint {
        Paint::Fill => surface.fill_path(&path, &paint, FillRule::EvenOdd, transform, None),
        Paint::Stroke { width } => {
            let stroke = Stroke {
                width: width as f32,
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                ..Stroke::default()
            };
            surface.stroke_path(&path, &paint, &stroke, transform, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motif_core::config::{LayerConfig, Style};
    use motif_core::palette::Palette;
    use motif_core::state::Layer;

    fn renderer() -> RasterRenderer {
        RasterRenderer::with_text(TextRenderer::empty())
    }

    fn pixel(p: &Pixmap, x: u32, y: u32) -> [u8; 4] {
        let c = p.pixel(x, y).unwrap().demultiply();
        [c.red(), c.green(), c.blue(), c.alpha()]
    }

    fn empty_layer() -> LayerConfig {
        LayerConfig {
            complexity: 0,
            ..LayerConfig::default()
        }
    }

    // -- Conversions --

    #[test]
    fn affine_maps_to_same_points() {
        let a = Affine::translate((10.0, 5.0)) * Affine::rotate(0.5) * Affine::scale_non_uniform(-1.0, 1.0);
        let t = sk_transform(a);
        let p = a * kurbo::Point::new(3.0, 4.0);
        let mut q = [tiny_skia::Point::from_xy(3.0, 4.0)];
        t.map_points(&mut q);
        assert!((f64::from(q[0].x) - p.x).abs() < 1e-4);
        assert!((f64::from(q[0].y) - p.y).abs() < 1e-4);
    }

    #[test]
    fn empty_path_converts_to_none() {
        assert!(sk_path(&BezPath::new()).is_none());
    }

    #[test]
    fn blend_modes_map() {
        assert_eq!(sk_blend(BlendMode::Additive), tiny_skia::BlendMode::Plus);
        assert_eq!(sk_blend(BlendMode::Normal), tiny_skia::BlendMode::SourceOver);
    }

    // -- Rendering --

    #[test]
    fn background_fills_canvas() {
        let state = AppState::single(empty_layer());
        let (pixmap, log) = renderer()
            .render_frame(&state, &ImageStore::new(), None, &FrameSpec::new(16, 8))
            .unwrap();
        let [r, g, b] = Palette::default().background.to_rgb8();
        assert_eq!(pixel(&pixmap, 3, 3), [r, g, b, 255]);
        assert!(log.is_empty());
    }

    #[test]
    fn transparent_request_leaves_alpha_zero() {
        let state = AppState::single(empty_layer());
        let spec = FrameSpec::new(8, 8).with_transparent_background(true);
        let (pixmap, _) = renderer().render_frame(&state, &ImageStore::new(), None, &spec).unwrap();
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn zero_size_is_rejected() {
        let state = AppState::default();
        let err = renderer()
            .render_frame(&state, &ImageStore::new(), None, &FrameSpec::new(0, 8))
            .unwrap_err();
        assert!(matches!(err, MotifError::InvalidDimensions));
    }

    #[test]
    fn log_counts_every_copy() {
        let state = AppState::single(LayerConfig::default());
        let images = ImageStore::new();
        let (_, log) = renderer()
            .render_frame(&state, &images, None, &FrameSpec::new(120, 80))
            .unwrap();
        let req = FrameRequest::new(&state, &images);
        let scenes = scene::prepare(&req, 120.0, 80.0, &TextRenderer::empty()).unwrap();
        let copies: usize = scenes[0].items.iter().map(|i| i.offsets.len()).sum();
        assert_eq!(log.len(), copies);
    }

    #[test]
    fn shapes_change_pixels() {
        let cfg = LayerConfig {
            style: Style::Grid,
            ..LayerConfig::default()
        };
        let state = AppState::single(cfg);
        let (pixmap, _) = renderer()
            .render_frame(&state, &ImageStore::new(), None, &FrameSpec::new(64, 64))
            .unwrap();
        let first = pixmap.pixels()[0];
        assert!(pixmap.pixels().iter().any(|p| *p != first));
    }

    #[test]
    fn layer_opacity_mixes_with_below() {
        let mut below = empty_layer();
        below.palette = Palette::from_hex("b", &["#000000"], "#000000").unwrap();
        let mut above = empty_layer();
        above.palette = Palette::from_hex("w", &["#ffffff"], "#ffffff").unwrap();

        let mut state = AppState::single(below);
        state
            .add_layer(Layer::new("top", above).with_opacity(0.5))
            .unwrap();
        let (pixmap, _) = renderer()
            .render_frame(&state, &ImageStore::new(), None, &FrameSpec::new(4, 4))
            .unwrap();
        let [r, _, _, a] = pixel(&pixmap, 1, 1);
        assert_eq!(a, 255);
        assert!((120..=135).contains(&r), "got {r}");
    }

    #[test]
    fn clip_without_glyphs_hides_everything() {
        let mut cfg = LayerConfig::default();
        cfg.text.enabled = true;
        cfg.text.content = "MOTIF".into();
        cfg.text.mode = TextMode::Clip;
        let state = AppState::single(cfg);
        // no fonts: the text covers nothing, so nothing survives the clip
        let (pixmap, _) = renderer()
            .render_frame(&state, &ImageStore::new(), None, &FrameSpec::new(32, 32))
            .unwrap();
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn grain_only_applies_with_texture() {
        let state = AppState::single(empty_layer());
        let grain = GrainTexture::generate(8, 1).unwrap();
        let r = renderer();
        let images = ImageStore::new();
        let spec = FrameSpec::new(16, 16);
        let (plain, _) = r.render_frame(&state, &images, None, &spec).unwrap();
        let (untextured, _) = r.render_frame(&state, &images, Some(&grain), &spec).unwrap();
        assert_eq!(plain.data(), untextured.data());

        let textured_state = AppState::single(LayerConfig {
            texture: 0.8,
            ..empty_layer()
        });
        let (textured, _) = r.render_frame(&textured_state, &images, Some(&grain), &spec).unwrap();
        assert_ne!(plain.data(), textured.data());
    }

    #[test]
    fn images_draw_into_their_box() {
        let cfg = LayerConfig {
            style: Style::Collage,
            images: vec!["red".into()],
            ..LayerConfig::default()
        };
        let state = AppState::single(cfg);
        let mut images = ImageStore::new();
        let mut red = Pixmap::new(2, 2).unwrap();
        red.fill(Color::from_rgba8(255, 0, 0, 255));
        images.insert("red", red, "red.png");
        let (pixmap, log) = renderer()
            .render_frame(&state, &images, None, &FrameSpec::new(64, 64))
            .unwrap();
        assert!(log.records().iter().all(|r| r.kind == "image"));
        assert!(!log.is_empty());
        assert!(pixmap.pixels().iter().any(|p| {
            let c = p.demultiply();
            c.red() == 255 && c.green() == 0
        }));
    }
}
