//! Shared state for one generation pass.

use std::f64::consts::TAU;

use glam::DVec2;
use motif_core::composition;
use motif_core::config::{LayerConfig, StrokeMode};
use motif_core::prng::Xorshift64;
use motif_core::shape::{ShapeData, ShapeKind, ShapeType};

/// Upper bound on the shape count a single scatter pass produces.
pub const MAX_COMPLEXITY: u32 = 5000;

/// Canvas, config and the layer's PRNG stream.
pub struct GenContext<'a> {
    pub width: f64,
    pub height: f64,
    /// `min(width, height) / 10 · scale`, bounded by `LayerConfig::base_size`.
    pub base: f64,
    pub config: &'a LayerConfig,
    pub rng: Xorshift64,
}

impl<'a> GenContext<'a> {
    pub fn new(width: f64, height: f64, config: &'a LayerConfig) -> Self {
        Self {
            width,
            height,
            base: config.base_size(width, height),
            config,
            rng: Xorshift64::new(config.seed),
        }
    }

    /// Number of shapes a scatter-style pass emits.
    pub fn count(&self) -> usize {
        self.config.complexity.min(MAX_COMPLEXITY) as usize
    }

    /// The configured allow-list, or `defaults` when it is empty.
    pub fn allowed(&self, defaults: &[ShapeType]) -> Vec<ShapeType> {
        if self.config.shape_types.is_empty() {
            defaults.to_vec()
        } else {
            self.config.shape_types.clone()
        }
    }

    /// Draws a shape type and instantiates it.
    pub fn pick_kind(&mut self, types: &[ShapeType]) -> ShapeKind {
        let t = self
            .rng
            .next_item(types)
            .copied()
            .unwrap_or(ShapeType::Circle);
        t.instantiate(&mut self.rng)
    }

    /// Samples a position with the layer's composition strategy.
    pub fn place(&mut self) -> DVec2 {
        composition::sample(
            self.config.composition,
            self.width,
            self.height,
            &mut self.rng,
            &self.config.composition_options,
        )
    }

    /// Converts a length given in pixels at scale 1 to this pass's scale.
    pub fn scaled(&self, px: f64) -> f64 {
        let unscaled = self.width.min(self.height) / 10.0;
        if unscaled > 0.0 {
            px.max(0.0) * self.base / unscaled
        } else {
            0.0
        }
    }

    /// Fits a lattice with the given `period` to the canvas. Returns how
    /// many periods span each axis and the per-axis stretch that makes them
    /// span it exactly, so the lattice wraps at the edges.
    pub fn fit(&self, period: DVec2) -> (DVec2, DVec2) {
        let canvas = DVec2::new(self.width, self.height);
        let counts = (canvas / period).round().max(DVec2::ONE);
        let stretch = canvas / (counts * period);
        if stretch.is_finite() && stretch.cmpgt(DVec2::ZERO).all() {
            (counts, stretch)
        } else {
            (DVec2::ONE, DVec2::ONE)
        }
    }

    /// Whether `p` lies in the canvas's fundamental domain `[0, w) × [0, h)`.
    pub fn owns(&self, p: DVec2) -> bool {
        (0.0..self.width).contains(&p.x) && (0.0..self.height).contains(&p.y)
    }

    /// Random size in `[lo, hi)` times the base size.
    pub fn size(&mut self, lo: f64, hi: f64) -> f64 {
        self.base * self.rng.next_range(lo, hi)
    }

    /// Finishes a shape. Draws, in order: palette color, stroke roll, speed
    /// factor (1..=3) and phase offset. The stroke roll is drawn for every
    /// stroke mode so switching modes leaves the rest of the pattern intact.
    pub fn dress(&mut self, kind: ShapeKind, position: DVec2, size: f64, rotation: f64) -> ShapeData {
        let color = self.config.palette.pick(&mut self.rng);
        let roll = self.rng.next_f64();
        let stroke = match self.config.stroke_mode {
            StrokeMode::Fill => false,
            StrokeMode::Stroke => true,
            StrokeMode::Mixed => roll < 0.5,
        };
        let speed_factor = 1 + self.rng.next_usize(3) as u32;
        let phase_offset = self.rng.next_f64() * TAU;

        let mut shape = ShapeData::new(kind, position, size, color);
        shape.rotation = rotation;
        shape.stroke = stroke;
        shape.stroke_width = self.config.stroke_width.max(0.0);
        shape.speed_factor = speed_factor;
        shape.phase_offset = phase_offset;
        shape
    }
}
