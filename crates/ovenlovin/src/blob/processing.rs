//! Upload image processing.
//!
//! Detects the format from magic bytes (the client's content-type header is
//! not trusted), validates it against the allow-list, downscales oversized
//! images, and re-encodes everything as WebP.

use std::io::Cursor;

use image::{codecs::webp::WebPEncoder, DynamicImage, ImageFormat, ImageReader};

/// Maximum accepted upload size in bytes (before transcoding).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Images are downscaled to fit within this square, never enlarged.
pub const MAX_DIMENSION: u32 = 1200;

/// Formats accepted for upload.
pub const ALLOWED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Process an uploaded image: sniff and validate the format, downscale to
/// fit within [`MAX_DIMENSION`], and re-encode as WebP.
///
/// Returns the WebP bytes on success.
pub fn process_image(data: &[u8]) -> Result<Vec<u8>, String> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("Failed to read image: {e}"))?;

    let format = reader
        .format()
        .ok_or_else(|| "Could not detect image format".to_string())?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(format!(
            "Unsupported image format: {format:?}. Allowed: JPEG, PNG, GIF, WebP"
        ));
    }

    let img = reader
        .decode()
        .map_err(|e| format!("Failed to decode image: {e}"))?;

    // thumbnail() preserves aspect ratio, fitting within the given
    // dimensions. Skip it entirely for small images so they are never
    // enlarged.
    let img = if img.width() > MAX_DIMENSION || img.height() > MAX_DIMENSION {
        img.thumbnail(MAX_DIMENSION, MAX_DIMENSION)
    } else {
        img
    };

    // The WebP encoder only accepts 8-bit RGB/RGBA buffers.
    let img = DynamicImage::ImageRgba8(img.to_rgba8());

    let mut buf = Vec::new();
    let encoder = WebPEncoder::new_lossless(&mut buf);
    img.write_with_encoder(encoder)
        .map_err(|e| format!("Failed to encode image: {e}"))?;

    Ok(buf)
}
