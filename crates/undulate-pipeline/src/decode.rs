//! Image decoding.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP) and produces the RGBA
//! buffer the [`ImageSampler`](crate::ImageSampler) is built from.

use image::RgbaImage;

use crate::types::RenderError;

/// Decode raw image bytes into an RGBA buffer.
///
/// Supports whatever formats the `image` crate was built with (PNG, JPEG,
/// BMP and WebP in this workspace).
///
/// # Errors
///
/// Returns [`RenderError::EmptyInput`] if `bytes` is empty.
/// Returns [`RenderError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn load_image(bytes: &[u8]) -> Result<RgbaImage, RenderError> {
    if bytes.is_empty() {
        return Err(RenderError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgba8())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Encode an RGBA image as PNG bytes.
    fn encode_png(img: &RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        buf
    }

    #[test]
    fn empty_input_returns_error() {
        let result = load_image(&[]);
        assert!(matches!(result, Err(RenderError::EmptyInput)));
    }

    #[test]
    fn corrupt_bytes_returns_image_decode_error() {
        let result = load_image(&[0xFF, 0xFE, 0x00, 0x01]);
        assert!(matches!(result, Err(RenderError::ImageDecode(_))));
    }

    #[test]
    fn valid_png_keeps_dimensions_and_pixels() {
        let img = RgbaImage::from_fn(17, 31, |x, _| image::Rgba([x as u8, 64, 32, 255]));
        let decoded = load_image(&encode_png(&img)).unwrap();
        assert_eq!(decoded.dimensions(), (17, 31));
        assert_eq!(decoded.get_pixel(5, 3).0, [5, 64, 32, 255]);
    }
}
