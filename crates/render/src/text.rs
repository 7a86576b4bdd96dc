//! Text shaping and glyph rasterization through `usvg`.
//!
//! Text is always expressed as an SVG `<text>` element. The SVG backend
//! embeds the element as is; the raster backend wraps it in a small
//! document and lets resvg shape and draw it, so both backends lay out text
//! with the same font database.

use std::path::Path;
use std::sync::Arc;

use motif_core::color::Srgb;
use motif_core::config::TextOverlay;
use motif_core::error::MotifError;
use motif_core::field::Field;
use resvg::tiny_skia::{Pixmap, Transform};
use usvg::fontdb::Database;

use crate::pixel::alpha_field;
use crate::RenderResult;

/// Escapes text for use in XML content and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Font size of an overlay on a `width × height` canvas.
pub fn overlay_font_size(overlay: &TextOverlay, width: f64, height: f64) -> f64 {
    let fraction = if overlay.font_size.is_finite() {
        overlay.font_size.max(0.0)
    } else {
        0.0
    };
    fraction * width.min(height)
}

/// The overlay as an SVG `<text>` element, centered on its anchor.
pub fn overlay_element(overlay: &TextOverlay, width: f64, height: f64, fill: Srgb) -> String {
    let content = overlay.content.replace(['\n', '\r'], " ");
    format!(
        r#"<text x="{:.3}" y="{:.3}" font-family="{}" font-size="{:.3}" font-weight="{}" text-anchor="middle" dominant-baseline="central" fill="{}">{}</text>"#,
        overlay.x / 100.0 * width,
        overlay.y / 100.0 * height,
        escape(&overlay.font_family),
        overlay_font_size(overlay, width, height),
        overlay.font_weight,
        fill.to_hex(),
        escape(content.trim()),
    )
}

/// A single glyph centered on the origin, `size` pixels tall.
pub fn glyph_element(ch: char, size: f64, family: &str, fill: Srgb, transform: &str) -> String {
    let mut buf = [0u8; 4];
    format!(
        r#"<text x="0" y="0" transform="{transform}" font-family="{}" font-size="{size:.3}" font-weight="700" text-anchor="middle" dominant-baseline="central" fill="{}">{}</text>"#,
        escape(family),
        fill.to_hex(),
        escape(ch.encode_utf8(&mut buf)),
    )
}

/// Owns the font database used to shape text.
#[derive(Clone)]
pub struct TextRenderer {
    fontdb: Arc<Database>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderer {
    /// A renderer backed by the system fonts.
    pub fn new() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        Self::with_database(db)
    }

    /// A renderer with no fonts loaded; text draws nothing.
    pub fn empty() -> Self {
        Self::with_database(Database::new())
    }

    pub fn with_database(db: Database) -> Self {
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Loads every `.ttf`, `.otf` and `.ttc` file in `dir`. Returns how many
    /// faces the database holds afterwards.
    pub fn load_font_dir(&mut self, dir: &Path) -> usize {
        let db = Arc::make_mut(&mut self.fontdb);
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                let is_font = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
                    .unwrap_or(false);
                if is_font && db.load_font_file(&path).is_err() {
                    tracing::debug!(path = %path.display(), "skipping unreadable font");
                }
            }
        }
        db.len()
    }

    pub fn font_count(&self) -> usize {
        self.fontdb.len()
    }

    /// Parses an SVG fragment placed in a `width × height` document and
    /// draws it onto `target` with `transform`.
    pub fn draw_fragment(
        &self,
        fragment: &str,
        width: f64,
        height: f64,
        target: &mut Pixmap,
        transform: Transform,
    ) -> RenderResult<()> {
        let doc = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">{fragment}</svg>"#
        );
        let opts = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&doc, &opts)
            .map_err(|e| MotifError::Serialization(format!("text markup: {e}")))?;
        resvg::render(&tree, transform, &mut target.as_mut());
        Ok(())
    }

    /// The overlay drawn alone on a transparent canvas.
    pub fn overlay_pixmap(&self, overlay: &TextOverlay, width: u32, height: u32, fill: Srgb) -> RenderResult<Pixmap> {
        let mut pixmap = Pixmap::new(width, height).ok_or(MotifError::InvalidDimensions)?;
        if overlay.is_active() {
            let (w, h) = (f64::from(width), f64::from(height));
            self.draw_fragment(&overlay_element(overlay, w, h, fill), w, h, &mut pixmap, Transform::identity())?;
        }
        Ok(pixmap)
    }

    /// Glyph coverage of the overlay in [0, 1], one cell per pixel.
    #[tracing::instrument(level = "debug", skip(self, overlay))]
    pub fn glyph_mask(&self, overlay: &TextOverlay, width: u32, height: u32) -> RenderResult<Field> {
        let pixmap = self.overlay_pixmap(overlay, width, height, Srgb::WHITE)?;
        alpha_field(&pixmap)
    }

    /// A glyph rendered into a square pixmap of side `2 · size`, centered.
    pub fn glyph_pixmap(&self, ch: char, size: f64, family: &str, fill: Srgb) -> RenderResult<Pixmap> {
        let side = (2.0 * size).ceil().max(1.0);
        let mut pixmap = Pixmap::new(side as u32, side as u32).ok_or(MotifError::InvalidDimensions)?;
        let half = side / 2.0;
        let element = glyph_element(ch, size, family, fill, &format!("translate({half} {half})"));
        self.draw_fragment(&element, side, side, &mut pixmap, Transform::identity())?;
        Ok(pixmap)
    }
}
