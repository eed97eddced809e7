//! Photopass WASM - WebAssembly bindings for the photopass editor
//!
//! The browser runs the same photopass-core code the server does: the crop box
//! and its drag handling, the edit session, sheet planning for the
//! "photos per sheet" readout, and a local preview through `pipeline::apply`.
//!
//! # Module Structure
//!
//! - `types` - `JsImageBuffer`, RGBA pixels shared with canvas `ImageData`
//! - `decode` - Upload checks and decoding
//! - `crop` - Crop box and pointer dragging
//! - `session` - `JsEditSession`, the editor state
//! - `layout` - Print sheet planning
//! - `transform` - Local preview transform
//! - `encode` - JPEG/PNG encoding for download
//! - `catalog` - Passport sizes, print sheets and background presets
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditSession, decode_image, apply_transform } from '@photopass/wasm';
//!
//! await init();
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const session = new JsEditSession('us-standard');
//! session.set_image(image.width, image.height);
//! session.rotate_right();
//! const preview = apply_transform(image, session.transform_spec());
//! ```

use std::fmt::Display;

use wasm_bindgen::prelude::*;

mod catalog;
mod crop;
mod decode;
mod encode;
mod layout;
mod session;
mod transform;
mod types;

pub use catalog::{background_colors, normalize_color, passport_sizes, print_sheets};
pub use crop::{compute_crop_box, crop_box_for_size, JsCropBox, JsCropDrag};
pub use decode::{decode_image, validate_upload};
pub use encode::encode_image;
pub use layout::{plan_sheet, sheet_capacity};
pub use session::JsEditSession;
pub use transform::apply_transform;
pub use types::JsImageBuffer;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Convert an error into a JS exception, logging it to the browser console.
pub(crate) fn js_error(err: impl Display) -> JsValue {
    let message = err.to_string();
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

/// Serialize a value for JavaScript.
pub(crate) fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(js_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
