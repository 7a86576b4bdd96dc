//! Raster and SVG output must contain the same shape copies.

use motif_core::config::{AnimationConfig, LayerConfig, Motion, Style, SymmetryGroup, TextMode};
use motif_core::state::{AppState, Layer};
use motif_render::text::TextRenderer;
use motif_render::{FrameRequest, ImageStore, RasterRenderer, SvgRenderer};
use resvg::tiny_skia::Pixmap;

const W: u32 = 180;
const H: u32 = 120;

fn backends() -> (RasterRenderer, SvgRenderer) {
    (
        RasterRenderer::with_text(TextRenderer::empty()),
        SvgRenderer::with_text(TextRenderer::empty()),
    )
}

fn assert_parity(request: &FrameRequest<'_>) {
    let (raster, svg) = backends();
    let mut pixmap = Pixmap::new(W, H).unwrap();
    let raster_log = raster.render(&mut pixmap, request).unwrap();
    let doc = svg.render(W, H, request).unwrap();
    assert!(
        raster_log.matches(&doc.log, 1e-9),
        "raster drew {} copies, svg {}",
        raster_log.len(),
        doc.log.len()
    );
}

#[test]
fn every_style_draws_the_same_copies() {
    for style in Style::ALL {
        let state = AppState::single(LayerConfig {
            style,
            complexity: 30,
            ..LayerConfig::default()
        });
        let images = ImageStore::new();
        assert_parity(&FrameRequest::new(&state, &images));
    }
}

#[test]
fn animated_frames_agree() {
    let state = AppState::single(LayerConfig {
        animation: AnimationConfig {
            enabled: true,
            primary: Motion::Orbit,
            secondary: Motion::Float,
            ..AnimationConfig::default()
        },
        ..LayerConfig::default()
    });
    let images = ImageStore::new();
    for p in [0.0, 0.25, 0.7] {
        assert_parity(&FrameRequest::new(&state, &images).at_progress(p));
    }
    assert_parity(&FrameRequest::new(&state, &images).at(2_345));
}

#[test]
fn missing_assets_are_dropped_by_both() {
    let state = AppState::single(LayerConfig {
        style: Style::Collage,
        images: vec!["here".into(), "gone".into()],
        ..LayerConfig::default()
    });
    let mut images = ImageStore::new();
    images.insert("here", Pixmap::new(4, 4).unwrap(), "here.png");

    let (raster, svg) = backends();
    let mut pixmap = Pixmap::new(W, H).unwrap();
    let request = FrameRequest::new(&state, &images);
    let log = raster.render(&mut pixmap, &request).unwrap();
    let doc = svg.render(W, H, &request).unwrap();
    assert!(log.matches(&doc.log, 1e-9));
    assert!(!log.is_empty());
    assert!(log.records().iter().all(|r| r.kind == "image"));
    assert_eq!(doc.markup.matches("<image").count(), doc.log.len());
}

#[test]
fn layer_stacks_agree() {
    let mut state = AppState::single(LayerConfig {
        style: Style::Hex,
        symmetry: SymmetryGroup::DoubleMirror,
        ..LayerConfig::default()
    });
    let mut top = LayerConfig {
        style: Style::Wave,
        seed: 9,
        transparent: true,
        ..LayerConfig::default()
    };
    top.text.enabled = true;
    top.text.content = "motif".into();
    top.text.mode = TextMode::Clip;
    state.add_layer(Layer::new("top", top).with_opacity(0.6)).unwrap();

    let images = ImageStore::new();
    assert_parity(&FrameRequest::new(&state, &images));
}
