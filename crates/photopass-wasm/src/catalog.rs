//! Catalog bindings for the size and color pickers.

use crate::{js_error, to_js};
use photopass_core::catalog;
use photopass_core::Color;
use wasm_bindgen::prelude::*;

/// `[{ id, label, widthMm, heightMm, widthPx, heightPx }]`
#[wasm_bindgen]
pub fn passport_sizes() -> Result<JsValue, JsValue> {
    to_js(catalog::passport_sizes())
}

#[wasm_bindgen]
pub fn print_sheets() -> Result<JsValue, JsValue> {
    to_js(catalog::print_sheets())
}

/// `[{ id, label, value }]` where `value` is a hex color.
#[wasm_bindgen]
pub fn background_colors() -> Result<JsValue, JsValue> {
    to_js(catalog::background_colors())
}

/// Canonical `#RRGGBB` (or `#RRGGBBAA`) spelling of any accepted color.
#[wasm_bindgen]
pub fn normalize_color(value: &str) -> Result<String, JsValue> {
    Color::parse(value).map(|c| c.to_hex()).map_err(js_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_color() {
        assert_eq!(normalize_color("#fff").unwrap(), "#FFFFFF");
        assert_eq!(normalize_color("white").unwrap(), "#FFFFFF");
        assert_eq!(normalize_color("transparent").unwrap(), "#00000000");
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_catalogs_are_arrays() {
        assert!(js_sys::Array::is_array(&passport_sizes().unwrap()));
        assert!(js_sys::Array::is_array(&print_sheets().unwrap()));
        assert!(js_sys::Array::is_array(&background_colors().unwrap()));
    }

    #[wasm_bindgen_test]
    fn test_bad_color_throws() {
        assert!(normalize_color("#12").is_err());
    }
}
