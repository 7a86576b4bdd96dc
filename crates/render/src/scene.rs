//! Frame preparation shared by both backends.
//!
//! For each visible layer: generate (or mosaic-sample) the shapes, merge and
//! apply overrides, drop shapes whose image asset is missing, animate working
//! copies and attach the wrap offsets each copy is drawn at. The raster and
//! SVG backends only ever draw what [`prepare`] returns.

use glam::DVec2;
use motif_core::animation;
use motif_core::color::Srgb;
use motif_core::config::{LayerConfig, TextMode, TextOverlay};
use motif_core::overrides::{self, OverrideMap};
use motif_core::shape::{ShapeData, ShapeKind};
use motif_core::state::{BlendMode, Layer};
use motif_core::wrap::wrap_offsets;

use crate::assets::ImageStore;
use crate::text::TextRenderer;
use crate::{FrameRequest, RenderResult};

/// One shape and the offsets its copies are drawn at. The first offset is
/// always `(0, 0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub shape: ShapeData,
    pub offsets: Vec<DVec2>,
}

/// A layer ready to draw.
#[derive(Debug, Clone)]
pub struct LayerScene {
    pub layer_id: String,
    /// `None` when the layer or the request is transparent.
    pub background: Option<Srgb>,
    pub blend_mode: BlendMode,
    pub opacity: f64,
    pub items: Vec<DrawItem>,
    /// Overlay drawn in `normal` or `clip` mode. Mosaic overlays are already
    /// expressed by `items`.
    pub text: Option<TextOverlay>,
    /// Grain opacity.
    pub texture: f64,
    pub seed: u64,
    /// Font used for character shapes.
    pub font_family: String,
}

/// Loop progress of a layer for this request.
pub fn layer_progress(config: &LayerConfig, request: &FrameRequest<'_>) -> f64 {
    request
        .progress
        .unwrap_or_else(|| animation::progress_at(request.time_ms, config.animation.duration))
}

/// The merged, override-applied shape list of a layer: what the user sees
/// at rest and what hit-testing works against.
pub fn layer_shapes(
    layer: &Layer,
    width: f64,
    height: f64,
    transient: Option<&OverrideMap>,
    text: &TextRenderer,
) -> RenderResult<Vec<ShapeData>> {
    let config = layer.config();
    let shapes = if config.text.is_active() && config.text.mode == TextMode::Mosaic {
        let mask = text.glyph_mask(&config.text, width.round() as u32, height.round() as u32)?;
        motif_styles::mosaic_scatter(&mask, width, height, config)
    } else {
        motif_styles::generate(width, height, config)
    };

    let merged = match transient {
        Some(t) => overrides::merge(&config.overrides, t),
        None => config.overrides.clone(),
    };
    let stale = overrides::stale_overrides(&shapes, &merged);
    if !stale.is_empty() {
        tracing::debug!(layer = layer.id(), ?stale, "overrides without a matching shape");
    }
    Ok(overrides::apply_all(shapes, &merged, width, height))
}

fn has_asset(shape: &ShapeData, images: &ImageStore) -> bool {
    match &shape.kind {
        ShapeKind::Image { asset_id } => images.contains(asset_id),
        _ => true,
    }
}

/// Prepares one layer.
pub fn prepare_layer(
    layer: &Layer,
    width: f64,
    height: f64,
    request: &FrameRequest<'_>,
    text: &TextRenderer,
) -> RenderResult<LayerScene> {
    let config = layer.config();
    let shapes = layer_shapes(layer, width, height, request.transient_for(layer.id()), text)?;
    let progress = layer_progress(config, request);

    let items = shapes
        .into_iter()
        .filter(|s| {
            let keep = has_asset(s, request.images);
            if !keep {
                tracing::debug!(layer = layer.id(), index = s.index, "dropping shape with missing image asset");
            }
            keep
        })
        .map(|mut shape| {
            animation::apply(&mut shape, progress, width, height, &config.animation);
            let offsets = wrap_offsets(shape.position, shape.bounding_radius(), width, height);
            DrawItem { shape, offsets }
        })
        .collect();

    let transparent = config.transparent || request.transparent_background;
    let text_overlay = (config.text.is_active() && config.text.mode != TextMode::Mosaic)
        .then(|| config.text.clone());

    Ok(LayerScene {
        layer_id: layer.id().to_string(),
        background: (!transparent).then_some(config.palette.background),
        blend_mode: layer.blend_mode(),
        opacity: layer.opacity(),
        items,
        text: text_overlay,
        texture: config.texture.clamp(0.0, 1.0),
        seed: config.seed,
        font_family: config.typography.font_family.clone(),
    })
}

/// Prepares every visible layer, bottom to top.
#[tracing::instrument(level = "debug", skip(request, text), fields(layers = request.state.layer_count()))]
pub fn prepare(request: &FrameRequest<'_>, width: f64, height: f64, text: &TextRenderer) -> RenderResult<Vec<LayerScene>> {
    request
        .state
        .visible_layers()
        .map(|layer| prepare_layer(layer, width, height, request, text))
        .collect()
}
