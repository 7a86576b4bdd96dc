#![deny(unsafe_code)]
//! Core types and algorithms for the motif pattern generator.
//!
//! Provides the `Xorshift64` PRNG, colors and palettes, the `LayerConfig` /
//! `AppState` data model, `ShapeData` and its `ShapeKind` payloads, and the
//! pure stages of the pipeline: composition sampling, symmetry, overrides,
//! the seamless-loop animation transform, edge wrapping and shape outlines.

pub mod animation;
pub mod color;
pub mod composition;
pub mod config;
pub mod error;
pub mod field;
pub mod grain;
pub mod outline;
pub mod overrides;
pub mod palette;
pub mod prng;
pub mod request;
pub mod shape;
pub mod state;
pub mod symmetry;
pub mod wrap;

pub use color::{OkLch, Srgb};
pub use config::{
    AnimationConfig, CompositionOptions, CompositionType, LayerConfig, Motion, Style,
    SymmetryGroup, TextMode, TextOverlay,
};
pub use error::MotifError;
pub use field::Field;
pub use outline::{Figure, Ink, Paint, Primitive};
pub use overrides::{OverrideMap, ShapeOverride};
pub use palette::Palette;
pub use prng::Xorshift64;
pub use request::FrameSpec;
pub use shape::{ShapeData, ShapeKind, ShapeType};
pub use state::{AppState, AspectRatio, BlendMode, Layer};
pub use wrap::wrap_offsets;
