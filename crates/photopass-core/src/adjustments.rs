//! Brightness, saturation and contrast.
//!
//! ## Adjustment Order
//! 1. Modulate (brightness and saturation, one pass)
//! 2. Contrast
//!
//! Both passes touch only the color channels. Alpha is left as it is.

use serde::{Deserialize, Serialize};

use crate::buffer::ImageBuffer;

/// BT.709 luma weights.
const LUMA_R: f64 = 0.2126;
const LUMA_G: f64 = 0.7152;
const LUMA_B: f64 = 0.0722;

/// Contrast pivots around this channel value.
const MIDPOINT: f64 = 128.0;

/// Color adjustments, each in -100 to 100 where 0 is neutral.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Adjustments {
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
}

impl Adjustments {
    pub const MIN: f64 = -100.0;
    pub const MAX: f64 = 100.0;

    pub fn new(brightness: f64, contrast: f64, saturation: f64) -> Self {
        Self {
            brightness,
            contrast,
            saturation,
        }
    }

    /// Clamp every value into range. Non-finite values become 0.
    pub fn clamped(self) -> Self {
        let clamp = |v: f64| {
            if v.is_finite() {
                v.clamp(Self::MIN, Self::MAX)
            } else {
                0.0
            }
        };
        Self {
            brightness: clamp(self.brightness),
            contrast: clamp(self.contrast),
            saturation: clamp(self.saturation),
        }
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn needs_modulate(&self) -> bool {
        self.brightness != 0.0 || self.saturation != 0.0
    }
}

#[inline]
fn to_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Scale luma by `1 + brightness/100` and chroma by `1 + saturation/100`.
///
/// Chroma is each channel's distance from the pixel's luma.
pub(crate) fn apply_modulate(mut image: ImageBuffer, brightness: f64, saturation: f64) -> ImageBuffer {
    if brightness == 0.0 && saturation == 0.0 {
        return image;
    }
    let luma_scale = 1.0 + brightness / 100.0;
    let chroma_scale = 1.0 + saturation / 100.0;
    let ch = image.layout.channels();

    for px in image.pixels.chunks_exact_mut(ch) {
        let (r, g, b) = (px[0] as f64, px[1] as f64, px[2] as f64);
        let luma = LUMA_R * r + LUMA_G * g + LUMA_B * b;
        let new_luma = luma * luma_scale;
        px[0] = to_u8(new_luma + (r - luma) * chroma_scale);
        px[1] = to_u8(new_luma + (g - luma) * chroma_scale);
        px[2] = to_u8(new_luma + (b - luma) * chroma_scale);
    }
    image
}

/// `out = in * m + 128 * (1 - m)` with `m = 1 + contrast/100`.
pub(crate) fn apply_contrast(mut image: ImageBuffer, contrast: f64) -> ImageBuffer {
    if contrast == 0.0 {
        return image;
    }
    let m = 1.0 + contrast / 100.0;
    let offset = MIDPOINT * (1.0 - m);

    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        *slot = to_u8(i as f64 * m + offset);
    }

    let ch = image.layout.channels();
    for px in image.pixels.chunks_exact_mut(ch) {
        px[0] = lut[px[0] as usize];
        px[1] = lut[px[1] as usize];
        px[2] = lut[px[2] as usize];
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelLayout;

    fn pixel(r: u8, g: u8, b: u8) -> ImageBuffer {
        ImageBuffer::new(1, 1, PixelLayout::Rgb, vec![r, g, b])
    }

    #[test]
    fn test_clamped() {
        let adj = Adjustments::new(150.0, -250.0, f64::NAN).clamped();
        assert_eq!(adj, Adjustments::new(100.0, -100.0, 0.0));
    }

    #[test]
    fn test_identity_no_adjustments() {
        let img = pixel(12, 200, 77);
        assert_eq!(apply_contrast(apply_modulate(img.clone(), 0.0, 0.0), 0.0), img);
    }

    #[test]
    fn test_brightness_scales_gray() {
        let out = apply_modulate(pixel(100, 100, 100), 50.0, 0.0);
        assert_eq!(out.pixels, vec![150, 150, 150]);

        let out = apply_modulate(pixel(100, 100, 100), -100.0, 0.0);
        assert_eq!(out.pixels, vec![0, 0, 0]);
    }

    #[test]
    fn test_saturation_leaves_gray_alone() {
        let out = apply_modulate(pixel(90, 90, 90), 0.0, 100.0);
        assert_eq!(out.pixels, vec![90, 90, 90]);
    }

    #[test]
    fn test_full_desaturation_gives_luma() {
        let out = apply_modulate(pixel(255, 0, 0), 0.0, -100.0);
        // 0.2126 * 255 = 54.2
        assert_eq!(out.pixels, vec![54, 54, 54]);
    }

    #[test]
    fn test_saturation_increase_spreads_channels() {
        let out = apply_modulate(pixel(150, 100, 100), 0.0, 50.0);
        let [r, g, _, _] = out.rgba_at(0, 0);
        assert!(r > 150);
        assert!(g < 100);
    }

    #[test]
    fn test_contrast_positive_and_negative() {
        assert_eq!(apply_contrast(pixel(64, 192, 0), 100.0).pixels, vec![0, 255, 0]);
        assert_eq!(apply_contrast(pixel(64, 192, 0), -50.0).pixels, vec![96, 160, 64]);
        assert_eq!(apply_contrast(pixel(0, 255, 128), -100.0).pixels, vec![128, 128, 128]);
    }

    #[test]
    fn test_alpha_untouched() {
        let img = ImageBuffer::filled(2, 1, [200, 50, 50, 77]);
        let out = apply_contrast(apply_modulate(img, 30.0, -40.0), 60.0);
        assert!(out.pixels.chunks_exact(4).all(|px| px[3] == 77));
    }
}
