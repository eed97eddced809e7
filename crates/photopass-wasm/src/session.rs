//! Editor session bindings.
//!
//! `JsEditSession` is a mutable handle around the immutable core
//! `EditSession`: each method swaps in the updated value.

use crate::crop::JsCropBox;
use crate::{js_error, to_js};
use photopass_core::catalog::{self, PassportSize, PrintSheet};
use photopass_core::encode::clamp_quality;
use photopass_core::{Adjustments, Color, EditSession, ImageFormat, ValidationError};
use wasm_bindgen::prelude::*;

fn lookup_size(id: &str) -> Result<PassportSize, ValidationError> {
    catalog::passport_size(id)
        .cloned()
        .ok_or_else(|| ValidationError::new(format!("Unknown passport size '{}'", id)))
}

fn lookup_sheet(id: &str) -> Result<PrintSheet, ValidationError> {
    catalog::print_sheet(id)
        .cloned()
        .ok_or_else(|| ValidationError::new(format!("Unknown print sheet '{}'", id)))
}

/// The editor state for one photo.
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct JsEditSession {
    inner: EditSession,
}

#[wasm_bindgen]
impl JsEditSession {
    /// Start a session for a passport size id, or the default size.
    #[wasm_bindgen(constructor)]
    pub fn new(size_id: Option<String>) -> Result<JsEditSession, JsValue> {
        match size_id {
            Some(id) => Ok(Self {
                inner: EditSession::new(lookup_size(&id).map_err(js_error)?),
            }),
            None => Ok(Self::default()),
        }
    }

    pub fn set_image(&mut self, width: u32, height: u32) {
        self.inner = self.inner.set_image(width, height);
    }

    pub fn rotate_left(&mut self) {
        self.inner = self.inner.rotate_left();
    }

    pub fn rotate_right(&mut self) {
        self.inner = self.inner.rotate_right();
    }

    pub fn toggle_flip_horizontal(&mut self) {
        self.inner = self.inner.toggle_flip_horizontal();
    }

    pub fn toggle_flip_vertical(&mut self) {
        self.inner = self.inner.toggle_flip_vertical();
    }

    /// Brightness, contrast and saturation in -100..=100.
    pub fn set_adjustments(&mut self, brightness: f64, contrast: f64, saturation: f64) {
        self.inner = self
            .inner
            .set_adjustments(Adjustments::new(brightness, contrast, saturation));
    }

    /// Accepts hex colors, `white`/`black`/`transparent` and preset ids.
    pub fn set_background_color(&mut self, color: &str) -> Result<(), JsValue> {
        let color = Color::parse(color).map_err(js_error)?;
        self.inner = self.inner.set_background_color(color);
        Ok(())
    }

    pub fn mark_background_removed(&mut self) {
        self.inner = self.inner.mark_background_removed();
    }

    pub fn reset_background(&mut self) {
        self.inner = self.inner.reset_background();
    }

    pub fn set_passport_size(&mut self, size_id: &str) -> Result<(), JsValue> {
        let size = lookup_size(size_id).map_err(js_error)?;
        self.inner = self.inner.set_passport_size(size);
        Ok(())
    }

    /// Select a sheet for tiled export, or `undefined` for a single photo.
    pub fn set_print_sheet(&mut self, sheet_id: Option<String>) -> Result<(), JsValue> {
        let sheet = match sheet_id {
            Some(id) => Some(lookup_sheet(&id).map_err(js_error)?),
            None => None,
        };
        self.inner = self.inner.set_print_sheet(sheet);
        Ok(())
    }

    pub fn set_crop_position(&mut self, x: f64, y: f64) {
        self.inner = self.inner.set_crop_position(x, y);
    }

    /// `format` is `jpeg` or `png`; quality is clamped to 1-100.
    pub fn set_output(&mut self, format: &str, quality: i32) -> Result<(), JsValue> {
        let format: ImageFormat = format.parse().map_err(js_error)?;
        self.inner = self
            .inner
            .set_output(format, clamp_quality(i64::from(quality)));
        Ok(())
    }

    /// Start over, keeping the current passport size.
    pub fn reset(&mut self) {
        self.inner = self.inner.reset(self.inner.passport_size.clone());
    }

    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> i32 {
        self.inner.rotation
    }

    #[wasm_bindgen(getter)]
    pub fn flip_horizontal(&self) -> bool {
        self.inner.flip_horizontal
    }

    #[wasm_bindgen(getter)]
    pub fn flip_vertical(&self) -> bool {
        self.inner.flip_vertical
    }

    #[wasm_bindgen(getter)]
    pub fn background_color(&self) -> String {
        self.inner.background_color.to_hex()
    }

    #[wasm_bindgen(getter)]
    pub fn background_removed(&self) -> bool {
        self.inner.background_removed
    }

    #[wasm_bindgen(getter)]
    pub fn passport_size_id(&self) -> String {
        self.inner.passport_size.id.to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn print_sheet_id(&self) -> Option<String> {
        self.inner.print_sheet.as_ref().map(|s| s.id.to_string())
    }

    /// The crop box at its current position; `undefined` before an image is
    /// loaded or for the custom size.
    pub fn crop_box(&self) -> Option<JsCropBox> {
        self.inner.crop_box().map(JsCropBox::from)
    }

    /// The pipeline parameters, as accepted by `apply_transform` and the
    /// server's `transform` field.
    pub fn transform_spec(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.to_transform_spec())
    }

    pub fn process_request(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.to_process_request())
    }

    pub fn print_sheet_request(&self) -> Result<JsValue, JsValue> {
        let request = self.inner.to_print_sheet_request().map_err(js_error)?;
        to_js(&request)
    }

    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner)
    }
}

impl JsEditSession {
    #[cfg(test)]
    pub(crate) fn session(&self) -> &EditSession {
        &self.inner
    }
}
