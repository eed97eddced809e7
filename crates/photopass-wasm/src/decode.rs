//! Upload checks and decoding.

use crate::types::JsImageBuffer;
use crate::{js_error, to_js};
use photopass_core::intake::MAX_UPLOAD_BYTES;
use wasm_bindgen::prelude::*;

/// Decode JPEG or PNG bytes into an RGBA image, applying EXIF orientation.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const image = decode_image(new Uint8Array(await file.arrayBuffer()));
/// ctx.putImageData(new ImageData(new Uint8ClampedArray(image.pixels()), image.width), 0, 0);
/// ```
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsImageBuffer, JsValue> {
    decode_buffer(bytes).map_err(js_error)
}

/// Check a file before upload: type, size and a readable header.
///
/// Returns `{ mime, size, width, height, format }`.
#[wasm_bindgen]
pub fn validate_upload(bytes: &[u8], mime: &str) -> Result<JsValue, JsValue> {
    let info = photopass_core::validate_upload(bytes, mime, MAX_UPLOAD_BYTES).map_err(js_error)?;
    to_js(&info)
}

pub(crate) fn decode_buffer(bytes: &[u8]) -> photopass_core::Result<JsImageBuffer> {
    let buffer = photopass_core::decode_image(bytes)?;
    Ok(JsImageBuffer::from_buffer(buffer))
}
