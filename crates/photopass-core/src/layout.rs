//! Grid planning for print sheets.
//!
//! Cells are tiled row-major with a fixed outer margin and a fixed gap
//! between neighbours, and the whole grid is centered on the sheet. All
//! arithmetic is on signed integers with floor division, so results are
//! exact and reproducible.

use serde::{Deserialize, Serialize};

use crate::buffer::check_canvas;
use crate::error::{InfeasibleLayoutError, Result, ValidationError};

/// Most cells a single sheet may hold.
pub const MAX_SHEET_CELLS: u64 = 1_000_000;

/// Outer margin and inter-cell gap, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSpacing {
    pub margin: u32,
    pub spacing: u32,
}

impl LayoutSpacing {
    pub const DEFAULT_MARGIN: u32 = 20;
    pub const DEFAULT_SPACING: u32 = 15;
}

impl Default for LayoutSpacing {
    fn default() -> Self {
        Self {
            margin: Self::DEFAULT_MARGIN,
            spacing: Self::DEFAULT_SPACING,
        }
    }
}

/// Top-left corner of one cell on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
}

/// A feasible grid of cells on a sheet. Always has at least one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetPlan {
    pub placements: Vec<Placement>,
    pub cols: u32,
    pub rows: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub sheet_width: u32,
    pub sheet_height: u32,
}

impl SheetPlan {
    /// Number of photos on the sheet.
    pub fn count(&self) -> usize {
        self.placements.len()
    }
}

/// Columns and rows of the grid, possibly less than one.
fn grid(
    cell_w: u32,
    cell_h: u32,
    sheet_w: u32,
    sheet_h: u32,
    spacing: LayoutSpacing,
) -> (i64, i64) {
    let m = spacing.margin as i64;
    let s = spacing.spacing as i64;
    let cols = (sheet_w as i64 - 2 * m + s).div_euclid(cell_w as i64 + s);
    let rows = (sheet_h as i64 - 2 * m + s).div_euclid(cell_h as i64 + s);
    (cols, rows)
}

/// How many cells fit, without building the placements. Zero when the
/// layout is infeasible or the cell size is zero.
pub fn sheet_capacity(
    cell_w: u32,
    cell_h: u32,
    sheet_w: u32,
    sheet_h: u32,
    spacing: LayoutSpacing,
) -> u64 {
    if cell_w == 0 || cell_h == 0 {
        return 0;
    }
    let (cols, rows) = grid(cell_w, cell_h, sheet_w, sheet_h, spacing);
    if cols < 1 || rows < 1 {
        return 0;
    }
    (cols as u64).saturating_mul(rows as u64)
}

/// Plan how many `cell_w x cell_h` cells fit on a `sheet_w x sheet_h` sheet.
///
/// ```text
/// cols = floor((sheet_w - 2m + s) / (cell_w + s))
/// rows = floor((sheet_h - 2m + s) / (cell_h + s))
/// ```
///
/// # Errors
///
/// * `ValidationError` for a zero cell size, a sheet above the canvas pixel
///   limit, or more than [`MAX_SHEET_CELLS`] cells.
/// * `InfeasibleLayoutError` when not even one cell fits.
pub fn plan_sheet(
    cell_w: u32,
    cell_h: u32,
    sheet_w: u32,
    sheet_h: u32,
    spacing: LayoutSpacing,
) -> Result<SheetPlan> {
    if cell_w == 0 || cell_h == 0 {
        return Err(ValidationError::new(format!(
            "Passport size must be non-zero, got {}x{}",
            cell_w, cell_h
        ))
        .into());
    }
    check_canvas(sheet_w, sheet_h)?;

    let (cols, rows) = grid(cell_w, cell_h, sheet_w, sheet_h, spacing);
    if cols < 1 || rows < 1 {
        return Err(InfeasibleLayoutError {
            cell_width: cell_w,
            cell_height: cell_h,
            sheet_width: sheet_w,
            sheet_height: sheet_h,
        }
        .into());
    }

    let count = cols as u64 * rows as u64;
    if count > MAX_SHEET_CELLS {
        return Err(ValidationError::new(format!(
            "Sheet would hold {} photos, more than the limit of {}",
            count, MAX_SHEET_CELLS
        ))
        .into());
    }

    let (cw, ch) = (cell_w as i64, cell_h as i64);
    let (sw, sh) = (sheet_w as i64, sheet_h as i64);
    let s = spacing.spacing as i64;
    let used_w = cols * cw + (cols - 1) * s;
    let used_h = rows * ch + (rows - 1) * s;
    let start_x = (sw - used_w).div_euclid(2);
    let start_y = (sh - used_h).div_euclid(2);

    let mut placements = Vec::with_capacity(count as usize);
    for r in 0..rows {
        for c in 0..cols {
            placements.push(Placement {
                x: start_x + c * (cw + s),
                y: start_y + r * (ch + s),
            });
        }
    }

    tracing::debug!(cols, rows, start_x, start_y, "planned sheet");

    Ok(SheetPlan {
        placements,
        cols: cols as u32,
        rows: rows as u32,
        cell_width: cell_w,
        cell_height: cell_h,
        sheet_width: sheet_w,
        sheet_height: sheet_h,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn overlaps(a: &Placement, b: &Placement, w: i64, h: i64) -> bool {
        a.x < b.x + w && b.x < a.x + w && a.y < b.y + h && b.y < a.y + h
    }

    proptest! {
        #[test]
        fn prop_placements_never_overlap(
            cell_w in 1u32..800,
            cell_h in 1u32..800,
            sheet_w in 1u32..3000,
            sheet_h in 1u32..3000,
            margin in 0u32..60,
            spacing in 0u32..40,
        ) {
            let layout = LayoutSpacing { margin, spacing };
            if let Ok(plan) = plan_sheet(cell_w, cell_h, sheet_w, sheet_h, layout) {
                let (w, h) = (cell_w as i64, cell_h as i64);
                for (i, a) in plan.placements.iter().enumerate() {
                    for b in &plan.placements[i + 1..] {
                        prop_assert!(!overlaps(a, b, w, h), "{:?} overlaps {:?}", a, b);
                    }
                }
            }
        }

        #[test]
        fn prop_placements_inside_sheet(
            cell_w in 1u32..800,
            cell_h in 1u32..800,
            sheet_w in 1u32..3000,
            sheet_h in 1u32..3000,
        ) {
            if let Ok(plan) = plan_sheet(cell_w, cell_h, sheet_w, sheet_h, LayoutSpacing::default()) {
                prop_assert!(plan.cols >= 1 && plan.rows >= 1);
                prop_assert_eq!(plan.count(), (plan.cols * plan.rows) as usize);
                for p in &plan.placements {
                    prop_assert!(p.x >= 0 && p.y >= 0);
                    prop_assert!(p.x + cell_w as i64 <= sheet_w as i64);
                    prop_assert!(p.y + cell_h as i64 <= sheet_h as i64);
                }
            }
        }

        #[test]
        fn prop_feasible_iff_one_cell_fits(cell in 1u32..3000, sheet in 1u32..3000) {
            let fits = cell as i64 <= sheet as i64 - 40;
            let result = plan_sheet(cell, cell, sheet, sheet, LayoutSpacing::default());
            prop_assert_eq!(result.is_ok(), fits);
        }

        #[test]
        fn prop_capacity_agrees_with_plan(
            cell_w in 1u32..800,
            cell_h in 1u32..800,
            sheet_w in 1u32..3000,
            sheet_h in 1u32..3000,
        ) {
            let spacing = LayoutSpacing::default();
            let capacity = sheet_capacity(cell_w, cell_h, sheet_w, sheet_h, spacing);
            match plan_sheet(cell_w, cell_h, sheet_w, sheet_h, spacing) {
                Ok(plan) => prop_assert_eq!(capacity, plan.count() as u64),
                Err(_) => prop_assert_eq!(capacity, 0),
            }
        }
    }
}
