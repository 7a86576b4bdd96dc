//! Layer stack and document state.
//!
//! An [`AppState`] holds an ordered stack of [`Layer`]s plus the active layer
//! and the document aspect ratio. Layers are identified by unique ids and
//! rendered bottom-to-top (index 0 = bottom).

use serde::{Deserialize, Serialize};

use crate::config::LayerConfig;
use crate::error::MotifError;

/// Blend mode used when compositing a layer (or a text overlay) onto the
/// layers below it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Normal,
    Additive,
    Multiply,
    Screen,
    Overlay,
}

impl BlendMode {
    /// CSS `mix-blend-mode` keyword. `Additive` maps to `plus-lighter`.
    pub fn css_name(self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Additive => "plus-lighter",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_opacity() -> f64 {
    1.0
}

/// A single layer in the stack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Layer {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    locked: bool,
    #[serde(default)]
    blend_mode: BlendMode,
    #[serde(default = "default_opacity")]
    opacity: f64,
    #[serde(default)]
    config: LayerConfig,
}

impl Layer {
    /// Creates a visible, unlocked layer with normal blending at full opacity.
    ///
    /// The display name starts out equal to the id.
    pub fn new(id: impl Into<String>, config: LayerConfig) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            visible: true,
            locked: false,
            blend_mode: BlendMode::Normal,
            opacity: 1.0,
            config,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Locked layers still render; the flag is for editors.
    pub fn locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend_mode = mode;
    }

    /// Returns the opacity in [0.0, 1.0].
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Sets the opacity, clamping to [0.0, 1.0].
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut LayerConfig {
        &mut self.config
    }

    /// Returns a new layer with the given display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns a new layer with the given blend mode.
    pub fn with_blend_mode(mut self, mode: BlendMode) -> Self {
        self.blend_mode = mode;
        self
    }

    /// Returns a new layer with the given opacity, clamped to [0.0, 1.0].
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Returns a new layer with the given visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// Document aspect ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "4:5")]
    Social,
    #[serde(rename = "3:4")]
    Classic,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Landscape,
        AspectRatio::Portrait,
        AspectRatio::Social,
        AspectRatio::Classic,
    ];

    /// Width and height terms of the ratio.
    pub fn terms(self) -> (u32, u32) {
        match self {
            AspectRatio::Square => (1, 1),
            AspectRatio::Landscape => (16, 9),
            AspectRatio::Portrait => (9, 16),
            AspectRatio::Social => (4, 5),
            AspectRatio::Classic => (3, 4),
        }
    }

    /// Parses the `"w:h"` form used in serialized documents.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.label() == s.trim())
    }

    pub fn label(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Social => "4:5",
            AspectRatio::Classic => "3:4",
        }
    }

    /// Canvas size whose longer side is `base`.
    pub fn dimensions(self, base: u32) -> (u32, u32) {
        let (w, h) = self.terms();
        let long = w.max(h);
        let scale = |t: u32| {
            let v = (f64::from(base) * f64::from(t) / f64::from(long)).round() as u32;
            v.max(1)
        };
        (scale(w), scale(h))
    }
}

/// The full document: layer stack, active layer and aspect ratio.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppState {
    layers: Vec<Layer>,
    #[serde(default)]
    active_layer: Option<String>,
    #[serde(default)]
    aspect_ratio: AspectRatio,
}

impl AppState {
    pub fn new(aspect_ratio: AspectRatio) -> Self {
        Self {
            layers: Vec::new(),
            active_layer: None,
            aspect_ratio,
        }
    }

    /// A one-layer document.
    pub fn single(config: LayerConfig) -> Self {
        let mut state = Self::default();
        state.layers.push(Layer::new("layer-1", config));
        state.active_layer = Some("layer-1".to_string());
        state
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn set_aspect_ratio(&mut self, ratio: AspectRatio) {
        self.aspect_ratio = ratio;
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// All layers, bottom-to-top.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Visible layers, bottom-to-top.
    pub fn visible_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|l| l.visible)
    }

    /// Adds a layer to the top of the stack. The first layer added becomes
    /// active.
    ///
    /// Returns `MotifError::DuplicateLayerId` if the id is taken.
    pub fn add_layer(&mut self, layer: Layer) -> Result<(), MotifError> {
        if self.layers.iter().any(|l| l.id == layer.id) {
            return Err(MotifError::DuplicateLayerId(layer.id));
        }
        if self.active_layer.is_none() {
            self.active_layer = Some(layer.id.clone());
        }
        self.layers.push(layer);
        Ok(())
    }

    /// Removes a layer by id and returns it.
    ///
    /// Removing the active layer activates the new top layer, if any.
    pub fn remove_layer(&mut self, id: &str) -> Result<Layer, MotifError> {
        let idx = self.index_of(id)?;
        let removed = self.layers.remove(idx);
        if self.active_layer.as_deref() == Some(id) {
            self.active_layer = self.layers.last().map(|l| l.id.clone());
        }
        Ok(removed)
    }

    pub fn layer(&self, id: &str) -> Result<&Layer, MotifError> {
        self.layers
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| MotifError::LayerNotFound(id.to_string()))
    }

    pub fn layer_mut(&mut self, id: &str) -> Result<&mut Layer, MotifError> {
        self.layers
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| MotifError::LayerNotFound(id.to_string()))
    }

    /// The active layer, if the stack is non-empty and the id resolves.
    pub fn active_layer(&self) -> Option<&Layer> {
        let id = self.active_layer.as_deref()?;
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn set_active_layer(&mut self, id: &str) -> Result<(), MotifError> {
        self.index_of(id)?;
        self.active_layer = Some(id.to_string());
        Ok(())
    }

    /// Moves a layer to the given index in the stack.
    ///
    /// Index 0 is the bottom. If `index >= layer_count()`, the layer moves
    /// to the top.
    pub fn move_layer_to(&mut self, id: &str, index: usize) -> Result<(), MotifError> {
        let idx = self.index_of(id)?;
        let layer = self.layers.remove(idx);
        let target = index.min(self.layers.len());
        self.layers.insert(target, layer);
        Ok(())
    }

    /// Moves a layer one position toward the top. No-op at the top.
    pub fn move_layer_up(&mut self, id: &str) -> Result<(), MotifError> {
        let idx = self.index_of(id)?;
        if idx + 1 < self.layers.len() {
            self.layers.swap(idx, idx + 1);
        }
        Ok(())
    }

    /// Moves a layer one position toward the bottom. No-op at the bottom.
    pub fn move_layer_down(&mut self, id: &str) -> Result<(), MotifError> {
        let idx = self.index_of(id)?;
        if idx > 0 {
            self.layers.swap(idx, idx - 1);
        }
        Ok(())
    }

    /// A copy of the document with every layer reseeded: layer `i` gets
    /// `seed + i` (wrapping). Overrides are kept.
    pub fn reseeded(&self, seed: u64) -> AppState {
        let mut next = self.clone();
        for (i, layer) in next.layers.iter_mut().enumerate() {
            layer.config.seed = seed.wrapping_add(i as u64);
        }
        next
    }

    fn index_of(&self, id: &str) -> Result<usize, MotifError> {
        self.layers
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| MotifError::LayerNotFound(id.to_string()))
    }
}
