//! Image encoding WASM bindings.
//!
//! JPEG output is always opaque; transparent pixels are composited onto white.
//! PNG output keeps alpha.
//!
//! # Example
//!
//! ```typescript
//! import { encode_image } from '@photopass/wasm';
//!
//! const bytes = encode_image(preview, 'jpeg', 90);
//! const blob = new Blob([bytes], { type: 'image/jpeg' });
//! ```

use crate::js_error;
use crate::types::JsImageBuffer;
use photopass_core::encode::clamp_quality;
use photopass_core::ImageFormat;
use wasm_bindgen::prelude::*;

/// Encode an image as `jpeg` or `png`.
///
/// `quality` is clamped to 1-100 and only affects JPEG.
///
/// # Quality Guidelines
///
/// * 90-100: High quality, the default for passport prints (90)
/// * 80-90: Good quality, fine for online applications
/// * Below 80: Visible artifacts around hair and edges
#[wasm_bindgen]
pub fn encode_image(
    image: &JsImageBuffer,
    format: &str,
    quality: i32,
) -> Result<Vec<u8>, JsValue> {
    let format: ImageFormat = format.parse().map_err(js_error)?;
    encode_buffer(image, format, quality).map_err(js_error)
}

pub(crate) fn encode_buffer(
    image: &JsImageBuffer,
    format: ImageFormat,
    quality: i32,
) -> Result<Vec<u8>, photopass_core::EncodeError> {
    photopass_core::encode(image.as_buffer(), format, clamp_quality(i64::from(quality)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_jpeg_magic_bytes() {
        let img = JsImageBuffer::new(10, 10, vec![128u8; 10 * 10 * 4]);
        let jpeg = encode_buffer(&img, ImageFormat::Jpeg, 90).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_png_keeps_alpha() {
        let img = JsImageBuffer::new(4, 4, vec![0u8; 4 * 4 * 4]);
        let png = encode_buffer(&img, ImageFormat::Png, 0).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        let decoded = photopass_core::decode_image(&png).unwrap();
        assert_eq!(decoded.rgba_at(0, 0)[3], 0);
    }

    #[test]
    fn test_empty_image_fails() {
        let img = JsImageBuffer::new(0, 10, Vec::new());
        assert!(encode_buffer(&img, ImageFormat::Jpeg, 90).is_err());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_unknown_format_throws() {
        let img = JsImageBuffer::new(2, 2, vec![0; 16]);
        assert!(encode_image(&img, "webp", 90).is_err());
    }

    #[wasm_bindgen_test]
    fn test_encode_image_jpeg() {
        let img = JsImageBuffer::new(2, 2, vec![0; 16]);
        let bytes = encode_image(&img, "jpeg", 90).unwrap();
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
    }
}
