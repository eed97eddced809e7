//! The passport crop box shown over the source image.
//!
//! The box has the target size's aspect ratio and covers about 70% of the
//! limiting source dimension. It starts centered and can be dragged anywhere
//! inside the image.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::transform::CropRegion;

/// Fraction of the limiting source edge the box initially spans.
pub const COVERAGE: f64 = 0.7;

/// A crop rectangle in source pixel coordinates, always inside the source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub source_width: u32,
    pub source_height: u32,
}

/// Size and center a crop box of aspect `target_aspect` on a
/// `src_w x src_h` image.
///
/// # Errors
///
/// `ValidationError` when either source dimension is zero or the aspect ratio
/// is not a finite positive number.
pub fn compute_crop_box(
    src_w: u32,
    src_h: u32,
    target_aspect: f64,
) -> Result<CropBox, ValidationError> {
    if src_w == 0 || src_h == 0 {
        return Err(ValidationError::new(format!(
            "Source image must be non-empty, got {}x{}",
            src_w, src_h
        )));
    }
    if !target_aspect.is_finite() || target_aspect <= 0.0 {
        return Err(ValidationError::new(format!(
            "Aspect ratio must be a positive number, got {}",
            target_aspect
        )));
    }

    let (sw, sh) = (src_w as f64, src_h as f64);
    let (mut width, mut height) = if sw / sh > target_aspect {
        let height = (COVERAGE * sh).min(sh);
        (height * target_aspect, height)
    } else {
        let width = (COVERAGE * sw).min(sw);
        (width, width / target_aspect)
    };

    if width > sw {
        width = sw;
        height = width / target_aspect;
    }
    if height > sh {
        height = sh;
        width = height * target_aspect;
    }

    Ok(CropBox {
        x: (sw - width) / 2.0,
        y: (sh - height) / 2.0,
        width,
        height,
        source_width: src_w,
        source_height: src_h,
    })
}

impl CropBox {
    /// Largest allowed `x`.
    pub fn max_x(&self) -> f64 {
        (self.source_width as f64 - self.width).max(0.0)
    }

    /// Largest allowed `y`.
    pub fn max_y(&self) -> f64 {
        (self.source_height as f64 - self.height).max(0.0)
    }

    /// The same box with its origin moved to `(x, y)`, clamped to the source.
    pub fn move_to(&self, x: f64, y: f64) -> CropBox {
        let clamp = |v: f64, max: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, max) };
        CropBox {
            x: clamp(x, self.max_x()),
            y: clamp(y, self.max_y()),
            ..*self
        }
    }

    /// The same box re-centered on the source.
    pub fn centered(&self) -> CropBox {
        self.move_to(self.max_x() / 2.0, self.max_y() / 2.0)
    }

    /// Integer pixel rectangle, rounded and kept inside the source.
    pub fn to_region(&self) -> CropRegion {
        let width = (self.width.round() as u32).clamp(1, self.source_width);
        let height = (self.height.round() as u32).clamp(1, self.source_height);
        let x = (self.x.round() as u32).min(self.source_width - width);
        let y = (self.y.round() as u32).min(self.source_height - height);
        CropRegion::new(x, y, width, height)
    }
}
