//! WASM binding for the transform pipeline.
//!
//! The browser preview runs the exact chain used for export, on whatever
//! (usually downscaled) image the caller holds.

use crate::js_error;
use crate::types::JsImageBuffer;
use photopass_core::TransformSpec;
use wasm_bindgen::prelude::*;

/// Apply a transform spec to an image.
///
/// `spec` is the camelCase object produced by `JsEditSession.transform_spec()`.
/// Missing fields take their defaults.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const preview = apply_transform(image, { rotationDegrees: 90, flipHorizontal: true });
/// ```
#[wasm_bindgen]
pub fn apply_transform(image: &JsImageBuffer, spec: JsValue) -> Result<JsImageBuffer, JsValue> {
    let spec: TransformSpec = serde_wasm_bindgen::from_value(spec)
        .map_err(|e| js_error(format!("Invalid transform spec: {}", e)))?;
    transform_buffer(image, &spec).map_err(js_error)
}

pub(crate) fn transform_buffer(
    image: &JsImageBuffer,
    spec: &TransformSpec,
) -> photopass_core::Result<JsImageBuffer> {
    let output = photopass_core::apply(image.as_buffer().clone(), &spec.clamped())?;
    Ok(JsImageBuffer::from_buffer(output))
}
