//! PDF and PNG artifact assembly.
//!
//! A capture that fits one A4-proportioned page at the canvas width becomes
//! a single-page PDF. Taller captures are sliced into page-height chunks of
//! the full-resolution bitmap, one page per chunk, so tall infographics keep
//! their pixel density instead of being scaled down onto one page.

use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;

use printpdf::image_crate::codecs::jpeg::{JpegDecoder, JpegEncoder};
use printpdf::image_crate::{self, GenericImageView};
use printpdf::{Image, ImageTransform, Mm, PdfDocument};
use tracing::info;

use crate::capture::Capture;
use crate::error::Result;

/// A4 height over width.
pub const A4_RATIO: f64 = 297.0 / 210.0;

/// JPEG quality for PDF page bitmaps.
const JPEG_QUALITY: u8 = 92;

/// CSS reference pixel density.
const BASE_DPI: f64 = 96.0;

/// One horizontal band of the capture, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice {
    pub y: u32,
    pub height: u32,
}

/// Split a logical-pixel canvas into A4-proportioned page bands. Content
/// that fits one page yields a single full-height slice.
pub fn page_slices(logical_width: u32, logical_height: u32) -> Vec<PageSlice> {
    let page_height = (f64::from(logical_width) * A4_RATIO).floor() as u32;
    if page_height == 0 || logical_height <= page_height {
        return vec![PageSlice {
            y: 0,
            height: logical_height,
        }];
    }

    let mut slices = Vec::new();
    let mut y = 0;
    while y < logical_height {
        let height = page_height.min(logical_height - y);
        slices.push(PageSlice { y, height });
        y += height;
    }
    slices
}

/// Write the capture as a PNG file.
pub fn write_png(capture: &Capture, path: &Path) -> Result<()> {
    std::fs::write(path, &capture.png)?;
    info!(path = %path.display(), bytes = capture.png.len(), "PNG written");
    Ok(())
}

/// Write the capture as a paginated PDF file.
pub fn write_pdf(capture: &Capture, path: &Path) -> Result<()> {
    let bitmap = image_crate::load_from_memory_with_format(
        &capture.png,
        image_crate::ImageFormat::Png,
    )?;
    let (phys_width, phys_height) = bitmap.dimensions();

    // Physical-to-logical factor; normally CAPTURE_SCALE.
    let scale = f64::from(phys_width) / f64::from(capture.logical_width.max(1));
    let dpi = (BASE_DPI * scale) as f32;

    let page_width_mm = Mm(px_to_mm(capture.logical_width));
    let page_height_px = (f64::from(capture.logical_width) * A4_RATIO).floor() as u32;
    let slices = page_slices(capture.logical_width, capture.logical_height);
    let single_page = slices.len() == 1;

    let page_height_mm = |slice: &PageSlice| {
        if single_page {
            Mm(px_to_mm(slice.height))
        } else {
            Mm(px_to_mm(page_height_px))
        }
    };

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Glance Export",
        page_width_mm,
        page_height_mm(&slices[0]),
        "Layer 1",
    );

    for (index, slice) in slices.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(page_width_mm, page_height_mm(slice), "Layer 1");
            doc.get_page(page).get_layer(layer)
        };

        let phys_y = (f64::from(slice.y) * scale) as u32;
        let phys_slice_height =
            ((f64::from(slice.height) * scale) as u32).min(phys_height.saturating_sub(phys_y));
        let band = bitmap
            .crop_imm(0, phys_y, phys_width, phys_slice_height.max(1))
            .to_rgb8();

        // Round-trip through JPEG so each page carries compressed data.
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut Cursor::new(&mut jpeg), JPEG_QUALITY).encode(
            band.as_raw(),
            band.width(),
            band.height(),
            image_crate::ColorType::Rgb8,
        )?;
        let page_image = Image::try_from(JpegDecoder::new(Cursor::new(&jpeg))?)?;

        // Anchor each band at the top of its page.
        let band_height_mm = Mm(px_to_mm(slice.height));
        let translate_y = Mm((page_height_mm(slice).0 - band_height_mm.0).max(0.0));
        page_image.add_to_layer(
            layer,
            ImageTransform {
                translate_x: Some(Mm(0.0)),
                translate_y: Some(translate_y),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
    }

    doc.save(&mut BufWriter::new(File::create(path)?))?;
    info!(path = %path.display(), pages = slices.len(), "PDF written");
    Ok(())
}

fn px_to_mm(px: u32) -> f32 {
    (f64::from(px) * 25.4 / BASE_DPI) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_content_is_a_single_slice() {
        let slices = page_slices(1200, 900);
        assert_eq!(slices, vec![PageSlice { y: 0, height: 900 }]);
    }

    #[test]
    fn test_exact_page_height_is_a_single_slice() {
        // 1200 * 297/210 = 1697.14..., floors to 1697.
        let slices = page_slices(1200, 1697);
        assert_eq!(slices, vec![PageSlice { y: 0, height: 1697 }]);
    }

    #[test]
    fn test_tall_content_slices_cover_everything_without_overlap() {
        let slices = page_slices(1200, 4000);
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0], PageSlice { y: 0, height: 1697 });
        assert_eq!(slices[1], PageSlice { y: 1697, height: 1697 });
        assert_eq!(slices[2], PageSlice { y: 3394, height: 606 });

        let covered: u32 = slices.iter().map(|s| s.height).sum();
        assert_eq!(covered, 4000);
    }

    #[test]
    fn test_degenerate_width_still_yields_one_slice() {
        let slices = page_slices(0, 500);
        assert_eq!(slices, vec![PageSlice { y: 0, height: 500 }]);
    }

    fn synthetic_capture(logical_width: u32, logical_height: u32) -> Capture {
        let bitmap = image_crate::RgbImage::from_pixel(
            logical_width * 2,
            logical_height * 2,
            image_crate::Rgb([180, 200, 220]),
        );
        let mut png = Vec::new();
        image_crate::DynamicImage::ImageRgb8(bitmap)
            .write_to(
                &mut Cursor::new(&mut png),
                image_crate::ImageOutputFormat::Png,
            )
            .unwrap();
        Capture {
            png,
            logical_width,
            logical_height,
        }
    }

    #[test]
    fn test_write_pdf_produces_a_pdf_from_a_scaled_bitmap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        write_pdf(&synthetic_capture(120, 90), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_write_pdf_paginates_tall_captures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tall.pdf");
        // 120 px wide pages are 169 px tall; 400 px of content needs 3 pages.
        write_pdf(&synthetic_capture(120, 400), &path).unwrap();
        let text = String::from_utf8_lossy(&std::fs::read(&path).unwrap()).into_owned();
        assert!(text.contains("/Count 3"));
    }
}
