//! WASM-compatible wrapper types for image data.

use photopass_core::ImageBuffer;
use wasm_bindgen::prelude::*;

/// An RGBA image held in WASM memory.
///
/// The pixel layout matches canvas `ImageData`, so
/// `new ImageData(new Uint8ClampedArray(img.pixels()), img.width)` works
/// directly.
///
/// The `free()` method can be called to explicitly release WASM memory, but this is
/// optional as wasm-bindgen's finalizer will handle cleanup automatically.
#[wasm_bindgen]
pub struct JsImageBuffer {
    inner: ImageBuffer,
}

#[wasm_bindgen]
impl JsImageBuffer {
    /// Create an image from RGBA pixel data (4 bytes per pixel, row-major).
    ///
    /// Missing bytes are zero-filled and extra bytes are dropped, so the
    /// buffer always matches its dimensions.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, mut pixels: Vec<u8>) -> JsImageBuffer {
        pixels.resize(width as usize * height as usize * 4, 0);
        Self {
            inner: ImageBuffer::new(width, height, photopass_core::PixelLayout::Rgba, pixels),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsImageBuffer {
    pub(crate) fn from_buffer(buffer: ImageBuffer) -> Self {
        Self {
            inner: buffer.into_rgba(),
        }
    }

    pub(crate) fn as_buffer(&self) -> &ImageBuffer {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photopass_core::PixelLayout;

    #[test]
    fn test_creation() {
        let img = JsImageBuffer::new(100, 50, vec![0u8; 100 * 50 * 4]);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 20000);
    }

    #[test]
    fn test_short_pixel_data_is_padded() {
        let img = JsImageBuffer::new(2, 2, vec![255u8; 4]);
        assert_eq!(img.byte_length(), 16);
        assert_eq!(&img.pixels()[..4], &[255, 255, 255, 255]);
        assert_eq!(&img.pixels()[4..8], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_from_rgb_buffer_becomes_rgba() {
        let rgb = ImageBuffer::new(2, 1, PixelLayout::Rgb, vec![1, 2, 3, 4, 5, 6]);
        let img = JsImageBuffer::from_buffer(rgb);
        assert_eq!(img.pixels(), vec![1, 2, 3, 255, 4, 5, 6, 255]);
        assert_eq!(img.as_buffer().layout, PixelLayout::Rgba);
    }
}
