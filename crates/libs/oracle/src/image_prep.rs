use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Decode any supported image and re-encode it as an 8-bit RGB JPEG, so every photo
/// reaches the oracle in the same color representation.
pub fn normalize_to_rgb_jpeg(bytes: &[u8]) -> image::ImageResult<Vec<u8>> {
    let img = image::load_from_memory(bytes)?;
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut out = Cursor::new(Vec::new());
    rgb.write_to(&mut out, ImageFormat::Jpeg)?;
    Ok(out.into_inner())
}
