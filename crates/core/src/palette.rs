//! Named palettes: an ordered list of shape colors plus a background.
//!
//! Generators pick shape colors from [`Palette::colors`] through the layer's
//! PRNG; [`Palette::sample`] interpolates between stops in OKLCh for the
//! places that want a smooth ramp (guilloché layers, text mosaics).

use serde::{Deserialize, Serialize};

use crate::color::{oklch_to_srgb, srgb_to_oklch, OkLch, Srgb};
use crate::error::MotifError;
use crate::prng::Xorshift64;

/// Names of the built-in palettes, in listing order.
const PALETTE_NAMES: &[&str] = &[
    "ocean",
    "neon",
    "earth",
    "monochrome",
    "vapor",
    "fire",
    "bauhaus",
    "memphis",
    "pastel",
    "forest",
];

/// A palette: name, ordered shape colors and a background color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub name: String,
    pub colors: Vec<Srgb>,
    pub background: Srgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self::ocean()
    }
}

impl Palette {
    /// Creates a palette. Requires at least one color.
    pub fn new(
        name: impl Into<String>,
        colors: Vec<Srgb>,
        background: Srgb,
    ) -> Result<Self, MotifError> {
        if colors.is_empty() {
            return Err(MotifError::InvalidPalette(
                "palette requires at least 1 color".to_string(),
            ));
        }
        Ok(Self {
            name: name.into(),
            colors,
            background,
        })
    }

    /// Creates a palette from hex strings.
    pub fn from_hex(name: &str, hexes: &[&str], background: &str) -> Result<Self, MotifError> {
        let colors = hexes
            .iter()
            .map(|h| Srgb::from_hex(h))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(name, colors, Srgb::from_hex(background)?)
    }

    /// Looks up a built-in palette by name.
    pub fn from_name(name: &str) -> Result<Self, MotifError> {
        match name {
            "ocean" => Ok(Self::ocean()),
            "neon" => Ok(Self::neon()),
            "earth" => Ok(Self::earth()),
            "monochrome" => Ok(Self::monochrome()),
            "vapor" => Ok(Self::vapor()),
            "fire" => Ok(Self::fire()),
            "bauhaus" => Ok(Self::bauhaus()),
            "memphis" => Ok(Self::memphis()),
            "pastel" => Ok(Self::pastel()),
            "forest" => Ok(Self::forest()),
            other => Err(MotifError::UnknownPalette(other.to_string())),
        }
    }

    /// Names of all built-in palettes.
    pub fn list_names() -> &'static [&'static str] {
        PALETTE_NAMES
    }

    /// Color at `i`, wrapping around the palette.
    ///
    /// A deserialized palette may have an empty color list; the background
    /// color stands in for it.
    pub fn color(&self, i: usize) -> Srgb {
        if self.colors.is_empty() {
            return self.background;
        }
        self.colors[i % self.colors.len()]
    }

    /// Draws a uniformly random palette color.
    pub fn pick(&self, rng: &mut Xorshift64) -> Srgb {
        rng.next_item(&self.colors)
            .copied()
            .unwrap_or(self.background)
    }

    /// Samples the palette at `t` in [0, 1], interpolating in OKLCh with
    /// shortest-arc hue. NaN is treated as 0.
    pub fn sample(&self, t: f64) -> Srgb {
        let n = self.colors.len();
        match n {
            0 => return self.background,
            1 => return self.colors[0],
            _ => {}
        }
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let scaled = t * (n - 1) as f64;
        let idx = (scaled as usize).min(n - 2);
        let frac = scaled - idx as f64;

        let c0 = srgb_to_oklch(self.colors[idx]);
        let c1 = srgb_to_oklch(self.colors[idx + 1]);
        oklch_to_srgb(OkLch {
            l: c0.l + frac * (c1.l - c0.l),
            c: c0.c + frac * (c1.c - c0.c),
            h: interpolate_hue(c0.h, c1.h, frac),
        })
    }

    /// Deep blues to cyan.
    pub fn ocean() -> Self {
        Self::builtin(
            "ocean",
            &["#003366", "#005f73", "#0a9396", "#94d2bd", "#e9d8a6"],
            "#001f3f",
        )
    }

    /// Vibrant pinks, greens, yellows.
    pub fn neon() -> Self {
        Self::builtin(
            "neon",
            &["#ff00ff", "#00ff41", "#ffff00", "#ff0080", "#00ffff"],
            "#0b0b12",
        )
    }

    /// Browns, greens, golds.
    pub fn earth() -> Self {
        Self::builtin(
            "earth",
            &["#5c4033", "#8b6914", "#6b8e23", "#daa520", "#d2b48c"],
            "#f4ecd8",
        )
    }

    /// Grays on white.
    pub fn monochrome() -> Self {
        Self::builtin(
            "monochrome",
            &["#000000", "#404040", "#808080", "#c0c0c0"],
            "#ffffff",
        )
    }

    /// Pastel purples, pinks, teals.
    pub fn vapor() -> Self {
        Self::builtin(
            "vapor",
            &["#7b2d8e", "#c77dff", "#ff9ebb", "#80ced6", "#a0e7e5"],
            "#1d1135",
        )
    }

    /// Reds, oranges, yellows.
    pub fn fire() -> Self {
        Self::builtin(
            "fire",
            &["#800000", "#cc0000", "#ff4500", "#ff8c00", "#ffd700"],
            "#1a0500",
        )
    }

    /// Primary red, blue, yellow and black on cream.
    pub fn bauhaus() -> Self {
        Self::builtin(
            "bauhaus",
            &["#d62828", "#003049", "#f7b801", "#1b1b1b"],
            "#f1e9da",
        )
    }

    /// Loud 80s candy colors.
    pub fn memphis() -> Self {
        Self::builtin(
            "memphis",
            &["#ff6f91", "#ffc75f", "#00c9a7", "#845ec2", "#2c73d2"],
            "#fff6e9",
        )
    }

    /// Soft sorbet tones.
    pub fn pastel() -> Self {
        Self::builtin(
            "pastel",
            &["#ffadad", "#ffd6a5", "#fdffb6", "#caffbf", "#9bf6ff", "#bdb2ff"],
            "#fffdf7",
        )
    }

    /// Greens and mosses.
    pub fn forest() -> Self {
        Self::builtin(
            "forest",
            &["#2d6a4f", "#40916c", "#52b788", "#95d5b2", "#d8f3dc"],
            "#081c15",
        )
    }

    fn builtin(name: &str, hexes: &[&str], background: &str) -> Self {
        Self::from_hex(name, hexes, background).expect("built-in palette hex values are valid")
    }
}

/// Interpolates hue using shortest-arc logic, handling wraparound at 360.
fn interpolate_hue(h0: f64, h1: f64, t: f64) -> f64 {
    let delta = match h1 - h0 {
        d if d > 180.0 => d - 360.0,
        d if d < -180.0 => d + 360.0,
        d => d,
    };
    (h0 + t * delta).rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_with_empty_colors_returns_error() {
        assert!(Palette::new("x", vec![], Srgb::BLACK).is_err());
    }

    #[test]
    fn every_listed_name_resolves() {
        for name in Palette::list_names() {
            let p = Palette::from_name(name).unwrap();
            assert_eq!(p.name, *name);
            assert!(!p.colors.is_empty());
        }
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert!(matches!(
            Palette::from_name("plaid"),
            Err(MotifError::UnknownPalette(_))
        ));
    }

    #[test]
    fn color_wraps_around() {
        let p = Palette::bauhaus();
        assert_eq!(p.color(0), p.color(p.colors.len()));
    }

    #[test]
    fn empty_deserialized_palette_falls_back_to_background() {
        let p: Palette =
            serde_json::from_str(r##"{"name":"x","colors":[],"background":"#123456"}"##).unwrap();
        assert_eq!(p.color(3).to_hex(), "#123456");
        assert_eq!(p.sample(0.5).to_hex(), "#123456");
        let mut rng = Xorshift64::new(1);
        assert_eq!(p.pick(&mut rng).to_hex(), "#123456");
    }

    #[test]
    fn sample_endpoints_match_first_and_last_stop() {
        let p = Palette::fire();
        assert_eq!(p.sample(0.0).to_hex(), p.colors[0].to_hex());
        assert_eq!(p.sample(1.0).to_hex(), p.colors[4].to_hex());
        assert_eq!(p.sample(f64::NAN).to_hex(), p.colors[0].to_hex());
    }

    #[test]
    fn interpolate_hue_takes_short_arc() {
        let h = interpolate_hue(350.0, 10.0, 0.5);
        assert!(h < 1e-9 || (h - 360.0).abs() < 1e-9, "got {h}");
    }

    #[test]
    fn serde_round_trip() {
        let p = Palette::pastel();
        let json = serde_json::to_string(&p).unwrap();
        let back: Palette = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }

    #[test]
    fn pick_returns_palette_members() {
        let p = Palette::neon();
        let mut rng = Xorshift64::new(9);
        for _ in 0..100 {
            let c = p.pick(&mut rng);
            assert!(p.colors.contains(&c));
        }
    }
}
