//! QR code rendering.
//!
//! Encodes text at the highest error-correction level and rasterizes the
//! matrix module-by-module into a PNG with a standard quiet zone.

use qrcode::{Color, EcLevel, QrCode};

use crate::PdfError;

/// Pixels per QR module.
const MODULE_SIZE: usize = 10;
/// Quiet-zone border width, in modules.
const QUIET_ZONE: usize = 4;

/// Encode `data` as a QR code and render it to PNG bytes.
///
/// The output is square: `(width + 2 * quiet zone) * module size` pixels a
/// side, black on white.
pub fn qr_png_bytes(data: &str) -> Result<Vec<u8>, PdfError> {
    let code = QrCode::with_error_correction_level(data, EcLevel::H)
        .map_err(|e| PdfError::Qr(format!("failed to encode QR data: {e}")))?;

    let qr_width = code.width();
    let side = (qr_width + QUIET_ZONE * 2) * MODULE_SIZE;

    let mut img = image::RgbImage::from_pixel(side as u32, side as u32, image::Rgb([255, 255, 255]));

    let quiet_px = QUIET_ZONE * MODULE_SIZE;
    for (y, row) in code.to_colors().chunks(qr_width).enumerate() {
        for (x, &module) in row.iter().enumerate() {
            if module == Color::Dark {
                let start_x = quiet_px + x * MODULE_SIZE;
                let start_y = quiet_px + y * MODULE_SIZE;
                for dy in 0..MODULE_SIZE {
                    for dx in 0..MODULE_SIZE {
                        img.put_pixel(
                            (start_x + dx) as u32,
                            (start_y + dy) as u32,
                            image::Rgb([0, 0, 0]),
                        );
                    }
                }
            }
        }
    }

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PdfError::Image(format!("failed to encode PNG: {e}")))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_a_square_png() {
        let bytes = qr_png_bytes("0301R0011234567890").unwrap();
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!(img.width(), img.height());
        assert!(img.width() > 0);
    }

    #[test]
    fn quiet_zone_is_white() {
        let bytes = qr_png_bytes("hello").unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgb8();
        // Corner pixel sits inside the quiet zone.
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(img.get_pixel(img.width() - 1, img.height() - 1).0, [255, 255, 255]);
    }

    #[test]
    fn dark_modules_are_drawn() {
        let bytes = qr_png_bytes("hello").unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgb8();
        // The finder pattern's outer ring starts right after the quiet zone.
        let p = (QUIET_ZONE * MODULE_SIZE) as u32;
        assert_eq!(img.get_pixel(p, p).0, [0, 0, 0]);
    }

    #[test]
    fn oversized_payload_is_a_qr_error() {
        let data = "x".repeat(8000);
        assert!(matches!(qr_png_bytes(&data), Err(PdfError::Qr(_))));
    }
}
