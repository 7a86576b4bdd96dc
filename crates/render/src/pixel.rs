//! Pixel buffer conversions between [`Field`]s, pixmaps and straight RGBA8.

use motif_core::field::Field;
use resvg::tiny_skia::{Pixmap, PremultipliedColorU8};

use crate::RenderResult;

/// Maps field values to opaque gray pixels: `t` in [0, 1] becomes
/// `(t, t, t, 255)`. The buffer length is `width * height * 4`.
pub fn field_to_rgba(field: &Field) -> Vec<u8> {
    field
        .data()
        .iter()
        .flat_map(|&t| {
            let v = (t.clamp(0.0, 1.0) * 255.0).round() as u8;
            [v, v, v, 255u8]
        })
        .collect()
}

/// Straight (non-premultiplied) RGBA8 bytes of a pixmap.
pub fn demultiply(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}

/// Copies straight RGBA8 bytes into a pixmap, premultiplying.
pub fn pixmap_from_rgba(width: u32, height: u32, rgba: &[u8]) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(width, height)?;
    if rgba.len() != pixmap.pixels().len() * 4 {
        return None;
    }
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.chunks_exact(4)) {
        let a = u16::from(src[3]);
        let premul = |c: u8| ((u16::from(c) * a + 127) / 255) as u8;
        *dst = PremultipliedColorU8::from_rgba(premul(src[0]), premul(src[1]), premul(src[2]), src[3])?;
    }
    Some(pixmap)
}

/// Alpha channel of a pixmap as a [`Field`] in [0, 1].
pub fn alpha_field(pixmap: &Pixmap) -> RenderResult<Field> {
    let data = pixmap
        .pixels()
        .iter()
        .map(|p| f64::from(p.alpha()) / 255.0)
        .collect();
    Field::from_data(pixmap.width() as usize, pixmap.height() as usize, data)
}
