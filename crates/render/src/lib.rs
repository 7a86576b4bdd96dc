#![deny(unsafe_code)]
//! Output side of motif: frame preparation, the raster and SVG backends, the
//! layer compositor and frame export.
//!
//! Both backends draw from the same prepared [`scene`], so the shapes they
//! emit (wrap copies included) are identical by construction. Each returns a
//! [`DrawLog`] of what it drew so callers can check that.

pub mod assets;
pub mod export;
pub mod pixel;
pub mod raster;
pub mod scene;
pub mod snapshot;
pub mod svg;
pub mod text;
pub mod texture;

use std::collections::BTreeMap;

use glam::DVec2;
use motif_core::error::MotifError;
use motif_core::overrides::OverrideMap;
use motif_core::state::AppState;

pub use assets::ImageStore;
pub use raster::RasterRenderer;
pub use svg::{SvgDocument, SvgRenderer};
pub use texture::GrainTexture;

pub type RenderResult<T> = Result<T, MotifError>;

/// Transient overrides keyed by layer id. They sit on top of each layer's
/// persisted overrides and win field by field.
pub type TransientOverrides = BTreeMap<String, OverrideMap>;

/// Everything one render call needs besides the surface size.
#[derive(Clone, Copy)]
pub struct FrameRequest<'a> {
    pub state: &'a AppState,
    pub images: &'a ImageStore,
    /// Elapsed time since the animation loop started.
    pub time_ms: u64,
    /// Loop progress in [0, 1); when set it replaces the time-derived
    /// progress of every layer.
    pub progress: Option<f64>,
    pub grain: Option<&'a GrainTexture>,
    pub transparent_background: bool,
    pub overrides: Option<&'a TransientOverrides>,
}

impl<'a> FrameRequest<'a> {
    pub fn new(state: &'a AppState, images: &'a ImageStore) -> Self {
        Self {
            state,
            images,
            time_ms: 0,
            progress: None,
            grain: None,
            transparent_background: false,
            overrides: None,
        }
    }

    pub fn at(mut self, time_ms: u64) -> Self {
        self.time_ms = time_ms;
        self
    }

    pub fn at_progress(mut self, progress: f64) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_grain(mut self, grain: &'a GrainTexture) -> Self {
        self.grain = Some(grain);
        self
    }

    pub fn with_transparent_background(mut self, transparent: bool) -> Self {
        self.transparent_background = transparent;
        self
    }

    pub fn with_overrides(mut self, overrides: &'a TransientOverrides) -> Self {
        self.overrides = Some(overrides);
        self
    }

    /// Transient overrides for one layer, if any.
    pub fn transient_for(&self, layer_id: &str) -> Option<&'a OverrideMap> {
        self.overrides.and_then(|o| o.get(layer_id))
    }
}

/// One drawn copy of one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub layer: String,
    pub index: usize,
    pub kind: &'static str,
    /// Canvas position of this copy (shape position plus wrap offset).
    pub position: DVec2,
}

/// Ordered record of the shape copies a backend drew.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawLog {
    records: Vec<DrawRecord>,
}

impl DrawLog {
    pub fn push(&mut self, record: DrawRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[DrawRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Same records in the same order, positions within `tolerance`.
    pub fn matches(&self, other: &DrawLog, tolerance: f64) -> bool {
        self.records.len() == other.records.len()
            && self.records.iter().zip(&other.records).all(|(a, b)| {
                a.layer == b.layer
                    && a.index == b.index
                    && a.kind == b.kind
                    && a.position.distance(b.position) <= tolerance
            })
    }
}
