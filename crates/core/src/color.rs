//! Shape and palette colors.
//!
//! [`Srgb`] is the color carried by every shape and serialized as a `"#rrggbb"`
//! hex string. Shading (the lighter/darker faces of isometric cubes, palette
//! gradients) happens in OKLCh so lightness steps look even across hues.

use crate::error::MotifError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components in [0, 1].
///
/// The hex round-trip quantizes to 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// OKLCh (cylindrical OKLab): lightness, chroma, hue in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OkLch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

impl Srgb {
    pub const BLACK: Srgb = Srgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Srgb = Srgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    ///
    /// The three-digit shorthand "#f0a" is accepted as well.
    pub fn from_hex(hex: &str) -> Result<Srgb, MotifError> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            n => {
                return Err(MotifError::InvalidColor(format!(
                    "expected 3 or 6 hex digits, got {n}"
                )))
            }
        };
        let channel = |range: std::ops::Range<usize>, name: &str| {
            expanded
                .get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| MotifError::InvalidColor(format!("invalid {name} component")))
        };
        Ok(Srgb::from_rgb8(
            channel(0..2, "red")?,
            channel(2..4, "green")?,
            channel(4..6, "blue")?,
        ))
    }

    /// Builds a color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Srgb {
        Srgb {
            r: f64::from(r) / 255.0,
            g: f64::from(g) / 255.0,
            b: f64::from(b) / 255.0,
        }
    }

    /// Quantizes to 8-bit channels with rounding.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Converts the color to a hex string like `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Shifts OKLCh lightness by `delta`, keeping chroma and hue.
    pub fn shade(self, delta: f64) -> Srgb {
        let mut lch = srgb_to_oklch(self);
        lch.l = (lch.l + delta).clamp(0.0, 1.0);
        oklch_to_srgb(lch)
    }

    /// Relative luminance (Rec. 709 weights on linear channels).
    pub fn luminance(self) -> f64 {
        let lin = srgb_to_linear(self);
        0.2126 * lin[0] + 0.7152 * lin[1] + 0.0722 * lin[2]
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

fn srgb_component_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_component_to_srgb(c: f64) -> f64 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn srgb_to_linear(c: Srgb) -> [f64; 3] {
    [
        srgb_component_to_linear(c.r),
        srgb_component_to_linear(c.g),
        srgb_component_to_linear(c.b),
    ]
}

/// Converts sRGB to OKLCh.
///
/// Achromatic colors (chroma below 1e-10) get hue 0 instead of an
/// indeterminate `atan2(0, 0)`.
pub fn srgb_to_oklch(c: Srgb) -> OkLch {
    let [r, g, b] = srgb_to_linear(c);
    let l_ = (0.4122214708 * r + 0.5363325363 * g + 0.0514459929 * b).cbrt();
    let m_ = (0.2119034982 * r + 0.6806995451 * g + 0.1073969566 * b).cbrt();
    let s_ = (0.0883024619 * r + 0.2817188376 * g + 0.6299787005 * b).cbrt();

    let l = 0.2104542553 * l_ + 0.7936177850 * m_ - 0.0040720468 * s_;
    let a = 1.9779984951 * l_ - 2.4285922050 * m_ + 0.4505937099 * s_;
    let bb = 0.0259040371 * l_ + 0.7827717662 * m_ - 0.8086757660 * s_;

    let chroma = (a * a + bb * bb).sqrt();
    let h = if chroma < 1e-10 {
        0.0
    } else {
        bb.atan2(a).to_degrees().rem_euclid(360.0)
    };
    OkLch { l, c: chroma, h }
}

/// Converts OKLCh to sRGB, clamping out-of-gamut results to [0, 1].
pub fn oklch_to_srgb(c: OkLch) -> Srgb {
    let h = c.h.to_radians();
    let (a, b) = (c.c * h.cos(), c.c * h.sin());

    let l_ = c.l + 0.3963377774 * a + 0.2158037573 * b;
    let m_ = c.l - 0.1055613458 * a - 0.0638541728 * b;
    let s_ = c.l - 0.0894841775 * a - 1.2914855480 * b;
    let (l, m, s) = (l_ * l_ * l_, m_ * m_ * m_, s_ * s_ * s_);

    let r = 4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s;
    let g = -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s;
    let bl = -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s;

    Srgb {
        r: linear_component_to_srgb(r).clamp(0.0, 1.0),
        g: linear_component_to_srgb(g).clamp(0.0, 1.0),
        b: linear_component_to_srgb(bl).clamp(0.0, 1.0),
    }
}
