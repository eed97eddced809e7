//! Print sheet planning bindings.

use crate::{js_error, to_js};
use photopass_core::{LayoutSpacing, SheetPlan};
use wasm_bindgen::prelude::*;

fn plan(cell_w: u32, cell_h: u32, sheet_w: u32, sheet_h: u32) -> photopass_core::Result<SheetPlan> {
    photopass_core::plan_sheet(cell_w, cell_h, sheet_w, sheet_h, LayoutSpacing::default())
}

/// Plan a sheet with the default margin and spacing.
///
/// Returns `{ placements: [{ x, y }], cols, rows, cellWidth, cellHeight,
/// sheetWidth, sheetHeight }`, or throws when not even one photo fits.
#[wasm_bindgen]
pub fn plan_sheet(
    cell_width: u32,
    cell_height: u32,
    sheet_width: u32,
    sheet_height: u32,
) -> Result<JsValue, JsValue> {
    let plan = plan(cell_width, cell_height, sheet_width, sheet_height).map_err(js_error)?;
    to_js(&plan)
}

/// Number of photos that fit on the sheet, 0 when none do.
///
/// Counts the grid without planning it, saturating at `u32::MAX`.
#[wasm_bindgen]
pub fn sheet_capacity(
    cell_width: u32,
    cell_height: u32,
    sheet_width: u32,
    sheet_height: u32,
) -> u32 {
    let count = photopass_core::sheet_capacity(
        cell_width,
        cell_height,
        sheet_width,
        sheet_height,
        LayoutSpacing::default(),
    );
    u32::try_from(count).unwrap_or(u32::MAX)
}
