//! Lossless PNG encoding.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{validate, EncodeError};
use crate::buffer::{ImageBuffer, PixelLayout};
use crate::format::ImageFormat;

/// Encode a buffer to PNG, keeping its alpha channel if it has one.
pub fn encode_png(image: &ImageBuffer) -> Result<Vec<u8>, EncodeError> {
    validate(image)?;

    let color = match image.layout {
        PixelLayout::Rgb => ExtendedColorType::Rgb8,
        PixelLayout::Rgba => ExtendedColorType::Rgba8,
    };

    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(&image.pixels, image.width, image.height, color)
        .map_err(|e| EncodeError::EncodingFailed {
            format: ImageFormat::Png,
            message: e.to_string(),
        })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_image;

    #[test]
    fn test_png_preserves_alpha() {
        let mut img = ImageBuffer::filled(3, 3, [255, 0, 0, 255]);
        img.pixels[3] = 0;
        let bytes = encode_png(&img).unwrap();

        let decoded = decode_image(&bytes).unwrap();
        assert!(decoded.has_alpha());
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_png_is_lossless_for_rgb() {
        let pixels: Vec<u8> = (0..4 * 2 * 3).map(|i| (i * 10) as u8).collect();
        let img = ImageBuffer::new(4, 2, PixelLayout::Rgb, pixels);
        let decoded = decode_image(&encode_png(&img).unwrap()).unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_png_zero_dimensions() {
        let img = ImageBuffer::new(0, 0, PixelLayout::Rgba, vec![]);
        assert!(matches!(
            encode_png(&img),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }
}
