//! Decoded image assets for the collage style.
//!
//! The store maps an asset id to a premultiplied pixmap for the raster
//! backend and an `href` for the SVG backend. It is plain owned data, so an
//! export job can move it to the worker thread.

use std::collections::HashMap;
use std::path::Path;

use motif_core::error::MotifError;
use resvg::tiny_skia::Pixmap;

use crate::pixel::pixmap_from_rgba;
use crate::RenderResult;

/// One decoded asset.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub pixmap: Pixmap,
    /// Reference written into SVG `<image>` elements.
    pub href: String,
}

#[derive(Debug, Clone, Default)]
pub struct ImageStore {
    images: HashMap<String, StoredImage>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, pixmap: Pixmap, href: impl Into<String>) {
        self.images.insert(
            id.into(),
            StoredImage {
                pixmap,
                href: href.into(),
            },
        );
    }

    /// Decodes encoded image bytes (any format the `image` crate reads with
    /// the enabled features) and stores them under `id`.
    pub fn insert_encoded(&mut self, id: impl Into<String>, bytes: &[u8], href: impl Into<String>) -> RenderResult<()> {
        let rgba = image::load_from_memory(bytes)
            .map_err(|e| MotifError::Io(format!("decode image: {e}")))?
            .to_rgba8();
        let (w, h) = rgba.dimensions();
        let pixmap = pixmap_from_rgba(w, h, rgba.as_raw()).ok_or(MotifError::InvalidDimensions)?;
        self.insert(id, pixmap, href);
        Ok(())
    }

    /// Reads and decodes an image file. The path doubles as the SVG href.
    pub fn load(&mut self, id: impl Into<String>, path: &Path) -> RenderResult<()> {
        let bytes = std::fs::read(path)?;
        self.insert_encoded(id, &bytes, path.display().to_string())
    }

    pub fn get(&self, id: &str) -> Option<&StoredImage> {
        self.images.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.images.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
