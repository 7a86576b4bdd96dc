//! SVG backend.
//!
//! Emits a standalone document whose `viewBox` matches the raster size. Each
//! visible layer becomes one isolated `<g>` carrying its opacity and
//! `mix-blend-mode`. Clip masks and grain filters live in `<defs>`.

use kurbo::Affine;
use motif_core::color::Srgb;
use motif_core::config::{TextMode, TextOverlay};
use motif_core::outline::{self, Figure, Paint, Primitive};
use motif_core::state::BlendMode;

use crate::scene::{self, DrawItem, LayerScene};
use crate::text::{escape, glyph_element, overlay_element, TextRenderer};
use crate::{DrawLog, DrawRecord, FrameRequest, RenderResult};

/// Base frequency of the grain turbulence.
const GRAIN_FREQUENCY: f64 = 0.8;

/// A rendered SVG document and the shape copies it contains.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    pub markup: String,
    pub log: DrawLog,
}

fn matrix(a: Affine) -> String {
    let [sa, sb, sc, sd, se, sf] = a.as_coeffs();
    format!("matrix({sa:.6} {sb:.6} {sc:.6} {sd:.6} {se:.4} {sf:.4})")
}

fn primitive_element(prim: &Primitive, base: Srgb, transform: &str) -> String {
    let color = prim.ink.resolve(base).to_hex();
    let d = prim.path.to_svg();
    match prim.paint {
        Paint::Fill => format!(r#"<path d="{d}" transform="{transform}" fill="{color}" fill-rule="evenodd"/>"#),
        Paint::Stroke { width } => format!(
            r#"<path d="{d}" transform="{transform}" fill="none" stroke="{color}" stroke-width="{width:.3}" stroke-linecap="round" stroke-linejoin="round"/>"#
        ),
    }
}

fn layer_style(mode: BlendMode) -> String {
    format!("isolation:isolate;mix-blend-mode:{}", mode.css_name())
}

#[derive(Clone, Default)]
pub struct SvgRenderer {
    text: TextRenderer,
}

impl SvgRenderer {
    /// A renderer using the system fonts (only needed for mosaic sampling;
    /// text itself is emitted as `<text>`).
    pub fn new() -> Self {
        Self::with_text(TextRenderer::new())
    }

    pub fn with_text(text: TextRenderer) -> Self {
        Self { text }
    }

    #[tracing::instrument(level = "debug", skip(self, request))]
    pub fn render(&self, width: u32, height: u32, request: &FrameRequest<'_>) -> RenderResult<SvgDocument> {
        let (w, h) = (f64::from(width), f64::from(height));
        let scenes = scene::prepare(request, w, h, &self.text)?;

        let mut defs = String::new();
        let mut body = String::new();
        let mut log = DrawLog::default();

        for (i, layer) in scenes.iter().enumerate() {
            let mut content = String::new();
            if let Some(bg) = layer.background {
                content.push_str(&format!(r#"<rect width="{w}" height="{h}" fill="{}"/>"#, bg.to_hex()));
            }
            for item in &layer.items {
                self.push_item(&mut content, item, layer, request, &mut log);
            }

            match &layer.text {
                Some(overlay) if overlay.mode == TextMode::Clip => {
                    let id = format!("text-mask-{i}");
                    defs.push_str(&format!(
                        r#"<mask id="{id}" maskUnits="userSpaceOnUse" x="0" y="0" width="{w}" height="{h}"><g opacity="{:.3}">{}</g></mask>"#,
                        overlay.opacity.clamp(0.0, 1.0),
                        overlay_element(overlay, w, h, Srgb::WHITE),
                    ));
                    content = format!(r#"<g mask="url(#{id})">{content}</g>"#);
                }
                Some(overlay) => content.push_str(&normal_overlay(overlay, w, h)),
                None => {}
            }

            if layer.texture > 0.0 {
                let id = format!("grain-{i}");
                let seed = request.grain.map_or(layer.seed, |g| g.seed()) % 100_000;
                defs.push_str(&format!(
                    r#"<filter id="{id}" x="0" y="0" width="100%" height="100%" filterUnits="objectBoundingBox"><feTurbulence type="fractalNoise" baseFrequency="{GRAIN_FREQUENCY}" numOctaves="3" seed="{seed}" stitchTiles="stitch"/><feColorMatrix type="saturate" values="0"/></filter>"#
                ));
                content.push_str(&format!(
                    r#"<rect width="{w}" height="{h}" filter="url(#{id})" opacity="{:.3}" style="mix-blend-mode:overlay"/>"#,
                    layer.texture
                ));
            }

            body.push_str(&format!(
                r#"<g id="layer-{}" opacity="{:.3}" style="{}">{content}</g>"#,
                escape(&layer.layer_id),
                layer.opacity.clamp(0.0, 1.0),
                layer_style(layer.blend_mode),
            ));
        }

        let mut markup = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        if !defs.is_empty() {
            markup.push_str(&format!("<defs>{defs}</defs>"));
        }
        markup.push_str(&body);
        markup.push_str("</svg>");
        Ok(SvgDocument { markup, log })
    }

    fn push_item(
        &self,
        out: &mut String,
        item: &DrawItem,
        layer: &LayerScene,
        request: &FrameRequest<'_>,
        log: &mut DrawLog,
    ) {
        let shape = &item.shape;
        let figure = outline::outline(shape);
        for &offset in &item.offsets {
            log.push(DrawRecord {
                layer: layer.layer_id.clone(),
                index: shape.index,
                kind: shape.kind.tag(),
                position: shape.position + offset,
            });
            let transform = matrix(outline::shape_transform(shape, offset));
            match &figure {
                Figure::Paths(prims) => {
                    for prim in prims {
                        out.push_str(&primitive_element(prim, shape.color, &transform));
                    }
                }
                Figure::Glyph { ch } => {
                    out.push_str(&glyph_element(*ch, shape.size, &layer.font_family, shape.color, &transform));
                }
                Figure::Bitmap { asset_id } => {
                    if let Some(image) = request.images.get(asset_id) {
                        let s = shape.size.max(0.0);
                        out.push_str(&format!(
                            r#"<image href="{}" x="{:.3}" y="{:.3}" width="{s:.3}" height="{s:.3}" preserveAspectRatio="none" transform="{transform}"/>"#,
                            escape(&image.href),
                            -s / 2.0,
                            -s / 2.0,
                        ));
                    }
                }
                Figure::Nothing => {}
            }
        }
    }
}

fn normal_overlay(overlay: &TextOverlay, w: f64, h: f64) -> String {
    format!(
        r#"<g opacity="{:.3}" style="mix-blend-mode:{}">{}</g>"#,
        overlay.opacity.clamp(0.0, 1.0),
        overlay.blend_mode.css_name(),
        overlay_element(overlay, w, h, overlay.color),
    )
}
