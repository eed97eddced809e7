//! Owned raster buffers passed between pipeline stages.

use image::{DynamicImage, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Largest canvas any stage will allocate, in pixels.
pub const MAX_CANVAS_PIXELS: u64 = 50_000_000;

/// Reject a `width x height` canvas above [`MAX_CANVAS_PIXELS`].
pub fn check_canvas(width: u32, height: u32) -> Result<(), ValidationError> {
    let pixels = width as u64 * height as u64;
    if pixels > MAX_CANVAS_PIXELS {
        return Err(ValidationError::new(format!(
            "Image size {}x{} exceeds the limit of {} pixels",
            width, height, MAX_CANVAS_PIXELS
        )));
    }
    Ok(())
}

/// Channel layout of an [`ImageBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelLayout {
    /// 3 bytes per pixel, always opaque.
    Rgb,
    /// 4 bytes per pixel, straight (non-premultiplied) alpha.
    Rgba,
}

impl PixelLayout {
    /// Bytes per pixel.
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba => 4,
        }
    }
}

/// A decoded image with row-major 8-bit pixel data.
///
/// Every pipeline step takes a buffer by value and returns a new one, so a
/// buffer is never observed half-transformed.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Channel layout of `pixels`.
    pub layout: PixelLayout,
    /// Pixel data, `width * height * layout.channels()` bytes.
    pub pixels: Vec<u8>,
}

impl ImageBuffer {
    /// Create a buffer from raw parts.
    pub fn new(width: u32, height: u32, layout: PixelLayout, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * layout.channels(),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            layout,
            pixels,
        }
    }

    /// A buffer of the given size with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * 4);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Self::new(width, height, PixelLayout::Rgba, pixels)
    }

    pub fn from_rgb_image(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(width, height, PixelLayout::Rgb, img.into_raw())
    }

    pub fn from_rgba_image(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(width, height, PixelLayout::Rgba, img.into_raw())
    }

    /// Convert a decoded `image` crate value, keeping alpha only when present.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        if img.color().has_alpha() {
            Self::from_rgba_image(img.into_rgba8())
        } else {
            Self::from_rgb_image(img.into_rgb8())
        }
    }

    /// View as an `image` crate buffer for resampling.
    pub(crate) fn into_dynamic(self) -> Option<DynamicImage> {
        match self.layout {
            PixelLayout::Rgb => {
                RgbImage::from_raw(self.width, self.height, self.pixels).map(DynamicImage::ImageRgb8)
            }
            PixelLayout::Rgba => RgbaImage::from_raw(self.width, self.height, self.pixels)
                .map(DynamicImage::ImageRgba8),
        }
    }

    /// Run an `image` crate operation, keeping this buffer's channel layout.
    pub(crate) fn map_dynamic<F>(self, op: F) -> Result<Self, ValidationError>
    where
        F: FnOnce(DynamicImage) -> DynamicImage,
    {
        let layout = self.layout;
        let dynamic = self.into_dynamic().ok_or_else(size_mismatch)?;
        let out = op(dynamic);
        Ok(match layout {
            PixelLayout::Rgb => Self::from_rgb_image(out.into_rgb8()),
            PixelLayout::Rgba => Self::from_rgba_image(out.into_rgba8()),
        })
    }

    pub(crate) fn into_rgba_image(self) -> Result<RgbaImage, ValidationError> {
        let rgba = self.into_rgba();
        RgbaImage::from_raw(rgba.width, rgba.height, rgba.pixels).ok_or_else(size_mismatch)
    }

    /// Return the same image with an alpha channel.
    pub fn into_rgba(self) -> Self {
        match self.layout {
            PixelLayout::Rgba => self,
            PixelLayout::Rgb => {
                let mut pixels = Vec::with_capacity(self.pixels.len() / 3 * 4);
                for px in self.pixels.chunks_exact(3) {
                    pixels.extend_from_slice(&[px[0], px[1], px[2], 255]);
                }
                Self::new(self.width, self.height, PixelLayout::Rgba, pixels)
            }
        }
    }

    /// Drop the alpha channel without compositing. Only meaningful for opaque images.
    pub fn into_rgb(self) -> Self {
        match self.layout {
            PixelLayout::Rgb => self,
            PixelLayout::Rgba => {
                let mut pixels = Vec::with_capacity(self.pixels.len() / 4 * 3);
                for px in self.pixels.chunks_exact(4) {
                    pixels.extend_from_slice(&px[..3]);
                }
                Self::new(self.width, self.height, PixelLayout::Rgb, pixels)
            }
        }
    }

    /// Get a pixel as RGBA. Panics when out of bounds.
    #[inline]
    pub fn rgba_at(&self, x: u32, y: u32) -> [u8; 4] {
        let ch = self.layout.channels();
        let idx = (y as usize * self.width as usize + x as usize) * ch;
        match self.layout {
            PixelLayout::Rgb => [
                self.pixels[idx],
                self.pixels[idx + 1],
                self.pixels[idx + 2],
                255,
            ],
            PixelLayout::Rgba => [
                self.pixels[idx],
                self.pixels[idx + 1],
                self.pixels[idx + 2],
                self.pixels[idx + 3],
            ],
        }
    }

    pub fn has_alpha(&self) -> bool {
        self.layout == PixelLayout::Rgba
    }

    /// True when no pixel is even partially transparent.
    pub fn is_opaque(&self) -> bool {
        match self.layout {
            PixelLayout::Rgb => true,
            PixelLayout::Rgba => self.pixels.chunks_exact(4).all(|px| px[3] == 255),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

fn size_mismatch() -> ValidationError {
    ValidationError::new("Pixel buffer does not match image dimensions")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_buffer() {
        let img = ImageBuffer::filled(3, 2, [1, 2, 3, 4]);
        assert_eq!(img.layout, PixelLayout::Rgba);
        assert_eq!(img.pixels.len(), 24);
        assert_eq!(img.rgba_at(2, 1), [1, 2, 3, 4]);
    }

    #[test]
    fn test_rgb_rgba_conversion() {
        let img = ImageBuffer::new(2, 1, PixelLayout::Rgb, vec![10, 20, 30, 40, 50, 60]);
        let rgba = img.clone().into_rgba();
        assert_eq!(rgba.pixels, vec![10, 20, 30, 255, 40, 50, 60, 255]);
        assert!(rgba.is_opaque());
        assert_eq!(rgba.into_rgb(), img);
    }

    #[test]
    fn test_is_opaque_detects_transparency() {
        let mut img = ImageBuffer::filled(2, 2, [0, 0, 0, 255]);
        assert!(img.is_opaque());
        img.pixels[7] = 128;
        assert!(!img.is_opaque());
    }

    #[test]
    fn test_from_dynamic_keeps_alpha_only_when_present() {
        let rgb = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        assert_eq!(ImageBuffer::from_dynamic(rgb).layout, PixelLayout::Rgb);

        let rgba = DynamicImage::ImageRgba8(RgbaImage::new(4, 4));
        assert_eq!(ImageBuffer::from_dynamic(rgba).layout, PixelLayout::Rgba);
    }

    #[test]
    fn test_empty() {
        let img = ImageBuffer::new(0, 0, PixelLayout::Rgb, vec![]);
        assert!(img.is_empty());
    }

    #[test]
    fn test_canvas_limit() {
        assert!(check_canvas(10_000, 5_000).is_ok());
        assert!(check_canvas(10_000, 5_001).is_err());
        assert!(check_canvas(u32::MAX, u32::MAX).is_err());
        assert!(check_canvas(0, u32::MAX).is_ok());
    }

    #[test]
    fn test_map_dynamic_keeps_layout() {
        let rgb = ImageBuffer::filled(3, 2, [1, 2, 3, 255]).into_rgb();
        let out = rgb.map_dynamic(|img| img.rotate90()).unwrap();
        assert_eq!(out.layout, PixelLayout::Rgb);
        assert_eq!(out.dimensions(), (2, 3));

        let rgba = ImageBuffer::filled(3, 2, [1, 2, 3, 4]);
        let out = rgba.map_dynamic(|img| img.fliph()).unwrap();
        assert_eq!(out.layout, PixelLayout::Rgba);
        assert_eq!(out.rgba_at(0, 0), [1, 2, 3, 4]);
    }
}
