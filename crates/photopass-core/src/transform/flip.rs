//! Mirror operations over any channel layout.

use crate::buffer::ImageBuffer;
use crate::error::ValidationError;

/// Mirror top-to-bottom.
pub fn flip_vertical(image: ImageBuffer) -> Result<ImageBuffer, ValidationError> {
    if image.is_empty() {
        return Ok(image);
    }
    image.map_dynamic(|img| img.flipv())
}

/// Mirror left-to-right.
pub fn flip_horizontal(image: ImageBuffer) -> Result<ImageBuffer, ValidationError> {
    if image.is_empty() {
        return Ok(image);
    }
    image.map_dynamic(|img| img.fliph())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelLayout;

    fn two_by_two() -> ImageBuffer {
        // R G
        // B Y
        ImageBuffer::new(
            2,
            2,
            PixelLayout::Rgb,
            vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 0],
        )
    }

    #[test]
    fn test_flip_horizontal() {
        let out = flip_horizontal(two_by_two()).unwrap();
        assert_eq!(out.rgba_at(0, 0), [0, 255, 0, 255]);
        assert_eq!(out.rgba_at(1, 1), [0, 0, 255, 255]);
    }

    #[test]
    fn test_flip_vertical() {
        let out = flip_vertical(two_by_two()).unwrap();
        assert_eq!(out.rgba_at(0, 0), [0, 0, 255, 255]);
        assert_eq!(out.rgba_at(1, 0), [255, 255, 0, 255]);
    }

    #[test]
    fn test_flip_keeps_alpha() {
        let mut img = ImageBuffer::filled(3, 1, [9, 9, 9, 255]);
        img.pixels[3] = 0;
        let out = flip_horizontal(img).unwrap();
        assert_eq!(out.rgba_at(2, 0)[3], 0);
        assert_eq!(out.rgba_at(0, 0)[3], 255);
    }
}
