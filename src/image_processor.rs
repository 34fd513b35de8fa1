use base64::{engine::general_purpose, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;

use crate::errors::{AppError, AppResult};

pub const THUMBNAIL_MAX_DIMENSION: u32 = 768;
pub const THUMBNAIL_QUALITY: u8 = 75;

/// File type identified from a buffer's leading bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedType {
    pub extension: &'static str,
    pub mime_type: &'static str,
}

pub fn decode_base64_image(input: &str) -> AppResult<Vec<u8>> {
    general_purpose::STANDARD
        .decode(input.trim())
        .map_err(|e| AppError::thumbnail(format!("input is not valid base64: {}", e)))
}

/// Fit `width`x`height` inside a `max`x`max` box. Never upscales.
pub fn thumbnail_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }

    let ratio = max as f64 / width.max(height) as f64;
    let scaled = |side: u32| ((side as f64 * ratio).round() as u32).clamp(1, max);

    (scaled(width), scaled(height))
}

/// Derive a JPEG preview bounded by `THUMBNAIL_MAX_DIMENSION`.
pub fn generate_thumbnail(image_data: &[u8]) -> AppResult<Vec<u8>> {
    let img = image::load_from_memory(image_data).map_err(AppError::thumbnail)?;

    let (width, height) =
        thumbnail_dimensions(img.width(), img.height(), THUMBNAIL_MAX_DIMENSION);

    let thumbnail = if (width, height) == (img.width(), img.height()) {
        img
    } else {
        log::debug!(
            "Resizing from {}x{} to {}x{}",
            img.width(),
            img.height(),
            width,
            height
        );
        img.thumbnail_exact(width, height)
    };

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(thumbnail.to_rgb8());

    let mut output = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut output, THUMBNAIL_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(AppError::thumbnail)?;

    log::debug!(
        "Generated {}x{} thumbnail ({} bytes)",
        rgb.width(),
        rgb.height(),
        output.len()
    );

    Ok(output)
}

/// Sniff the magic bytes of `data`. `label` names the buffer in the error.
pub fn detect_file_type(data: &[u8], label: &str) -> AppResult<DetectedType> {
    let kind = infer::get(data).ok_or_else(|| AppError::detection(label))?;

    log::debug!("Detected {} as {}", label, kind.mime_type());

    Ok(DetectedType {
        extension: kind.extension(),
        mime_type: kind.mime_type(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn encode_test_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, format)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_thumbnail_dimensions_landscape() {
        assert_eq!(thumbnail_dimensions(1500, 1000, 768), (768, 512));
    }

    #[test]
    fn test_thumbnail_dimensions_portrait() {
        assert_eq!(thumbnail_dimensions(1000, 3000, 768), (256, 768));
    }

    #[test]
    fn test_thumbnail_dimensions_never_upscales() {
        assert_eq!(thumbnail_dimensions(640, 480, 768), (640, 480));
        assert_eq!(thumbnail_dimensions(768, 768, 768), (768, 768));
    }

    #[test]
    fn test_thumbnail_dimensions_extreme_ratio_keeps_one_pixel() {
        assert_eq!(thumbnail_dimensions(10_000, 2, 768), (768, 1));
    }

    #[test]
    fn test_generate_thumbnail_downscales() {
        let png = encode_test_image(1500, 1000, ImageFormat::Png);

        let thumbnail = generate_thumbnail(&png).unwrap();
        let decoded = image::load_from_memory(&thumbnail).unwrap();

        assert_eq!(decoded.width(), 768);
        assert!((511..=513).contains(&decoded.height()));
        assert_eq!(detect_file_type(&thumbnail, "thumbnail").unwrap().extension, "jpg");
    }

    #[test]
    fn test_generate_thumbnail_keeps_small_size() {
        let png = encode_test_image(120, 80, ImageFormat::Png);

        let thumbnail = generate_thumbnail(&png).unwrap();
        let decoded = image::load_from_memory(&thumbnail).unwrap();

        assert_eq!((decoded.width(), decoded.height()), (120, 80));
    }

    #[test]
    fn test_generate_thumbnail_rejects_garbage() {
        let result = generate_thumbnail(b"definitely not an image");
        assert!(matches!(result, Err(AppError::Thumbnail { .. })));
    }

    #[test]
    fn test_detect_file_type_png() {
        let png = encode_test_image(4, 4, ImageFormat::Png);
        let detected = detect_file_type(&png, "image").unwrap();
        assert_eq!(detected.extension, "png");
        assert_eq!(detected.mime_type, "image/png");
    }

    #[test]
    fn test_detect_file_type_unknown() {
        match detect_file_type(b"plain text", "image") {
            Err(AppError::Detection { label }) => assert_eq!(label, "image"),
            other => panic!("Expected detection error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_base64_image() {
        let encoded = general_purpose::STANDARD.encode(b"\x89PNG");
        assert_eq!(decode_base64_image(&format!(" {}\n", encoded)).unwrap(), b"\x89PNG");
        assert!(matches!(
            decode_base64_image("***"),
            Err(AppError::Thumbnail { .. })
        ));
    }
}
