//! Error types for motif.
//!
//! Generation itself never fails for a structurally valid config; these errors
//! cover the edges of the system: canvas sizes, parsing user input, layer
//! bookkeeping and I/O performed by the output crates.

use thiserror::Error;

/// Errors produced by motif operations.
#[derive(Debug, Error)]
pub enum MotifError {
    /// Width or height was zero (or their product overflowed) when sizing a
    /// canvas, field or surface.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A palette could not be constructed from the given colors.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// No built-in palette has the requested name.
    #[error("unknown palette: {0}")]
    UnknownPalette(String),

    /// No layer with the given id exists in the app state.
    #[error("layer not found: {0}")]
    LayerNotFound(String),

    /// A layer with the same id already exists in the app state.
    #[error("duplicate layer id: {0}")]
    DuplicateLayerId(String),

    /// Two buffers had incompatible dimensions.
    #[error("dimension mismatch: ({lhs_w}, {lhs_h}) vs ({rhs_w}, {rhs_h})")]
    DimensionMismatch {
        lhs_w: usize,
        lhs_h: usize,
        rhs_w: usize,
        rhs_h: usize,
    },

    /// Reading or writing a file failed.
    #[error("i/o error: {0}")]
    Io(String),

    /// A config document could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The background export worker failed.
    #[error("export error: {0}")]
    Export(String),
}

impl From<serde_json::Error> for MotifError {
    fn from(e: serde_json::Error) -> Self {
        MotifError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for MotifError {
    fn from(e: std::io::Error) -> Self {
        MotifError::Io(e.to_string())
    }
}
