//! Output frame description.
//!
//! A [`FrameSpec`] pins down the surface one render call draws into: pixel
//! size, the elapsed animation time and whether the page background is left
//! transparent. Together with an `AppState` it fully determines a frame.

use serde::{Deserialize, Serialize};

use crate::error::MotifError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrameSpec {
    pub width: u32,
    pub height: u32,
    /// Elapsed time since the animation loop started.
    #[serde(default)]
    pub time_ms: u64,
    /// Leave every layer's background unfilled.
    #[serde(default)]
    pub transparent_background: bool,
}

impl FrameSpec {
    /// An opaque still frame at time 0.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            time_ms: 0,
            transparent_background: false,
        }
    }

    pub fn at(mut self, time_ms: u64) -> Self {
        self.time_ms = time_ms;
        self
    }

    pub fn with_transparent_background(mut self, transparent: bool) -> Self {
        self.transparent_background = transparent;
        self
    }

    /// Validates that both dimensions are non-zero and that the RGBA byte
    /// count `width * height * 4` does not overflow.
    pub fn validate(&self) -> Result<(), MotifError> {
        if self.width == 0 || self.height == 0 {
            return Err(MotifError::InvalidDimensions);
        }
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or(MotifError::InvalidDimensions)?;
        Ok(())
    }

    pub fn size(&self) -> (f64, f64) {
        (f64::from(self.width), f64::from(self.height))
    }
}
