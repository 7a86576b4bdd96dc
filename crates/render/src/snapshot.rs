//! PNG and SVG snapshots on disk.

use std::path::Path;

use motif_core::error::MotifError;
use resvg::tiny_skia::Pixmap;

use crate::pixel::demultiply;
use crate::svg::SvgDocument;
use crate::RenderResult;

fn to_image(pixmap: &Pixmap) -> RenderResult<image::RgbaImage> {
    image::RgbaImage::from_raw(pixmap.width(), pixmap.height(), demultiply(pixmap))
        .ok_or_else(|| MotifError::Io("RGBA buffer size mismatch".into()))
}

/// Writes a pixmap as a PNG file (straight alpha).
pub fn write_png(pixmap: &Pixmap, path: &Path) -> RenderResult<()> {
    to_image(pixmap)?
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| MotifError::Io(e.to_string()))
}

/// Encodes a pixmap as PNG bytes.
pub fn encode_png(pixmap: &Pixmap) -> RenderResult<Vec<u8>> {
    let mut out = std::io::Cursor::new(Vec::new());
    to_image(pixmap)?
        .write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| MotifError::Io(e.to_string()))?;
    Ok(out.into_inner())
}

pub fn write_svg(doc: &SvgDocument, path: &Path) -> RenderResult<()> {
    std::fs::write(path, &doc.markup)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DrawLog;
    use resvg::tiny_skia::Color;

    #[test]
    fn write_png_round_trip() {
        let mut pixmap = Pixmap::new(16, 8).unwrap();
        pixmap.fill(Color::from_rgba8(200, 100, 50, 128));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");

        write_png(&pixmap, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!((img.width(), img.height()), (16, 8));
        let px = img.get_pixel(0, 0).0;
        assert_eq!(px[3], 128);
        assert!((i32::from(px[0]) - 200).abs() <= 2);
    }

    #[test]
    fn encode_png_has_signature() {
        let pixmap = Pixmap::new(2, 2).unwrap();
        let bytes = encode_png(&pixmap).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn write_png_into_missing_dir_fails() {
        let pixmap = Pixmap::new(2, 2).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let err = write_png(&pixmap, &dir.path().join("nope/frame.png")).unwrap_err();
        assert!(matches!(err, MotifError::Io(_)));
    }

    #[test]
    fn write_svg_writes_markup() {
        let doc = SvgDocument {
            markup: "<svg/>".into(),
            log: DrawLog::default(),
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.svg");
        write_svg(&doc, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<svg/>");
    }
}
