//! Editor state for one photo.
//!
//! An [`EditSession`] is an immutable value. Every edit returns a new session,
//! and the export parameters are derived from it on demand, so the preview
//! and the final export are always built from the same [`TransformSpec`].

use serde::Serialize;

use crate::adjustments::Adjustments;
use crate::catalog::{self, PassportSize, PrintSheet};
use crate::color::Color;
use crate::crop_box::{compute_crop_box, CropBox};
use crate::encode::DEFAULT_QUALITY;
use crate::error::ValidationError;
use crate::export::{PrintSheetRequest, ProcessRequest};
use crate::format::ImageFormat;
use crate::layout::LayoutSpacing;
use crate::pipeline::TransformSpec;
use crate::transform::compute_rotated_bounds;

/// Everything the user has chosen for the current photo.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSession {
    /// Displayed size of the loaded photo, `None` before an upload.
    pub dimensions: Option<(u32, u32)>,
    pub passport_size: PassportSize,
    /// Sheet for tiled export, `None` for a single photo.
    pub print_sheet: Option<PrintSheet>,
    pub background_color: Color,
    pub background_removed: bool,
    pub adjustments: Adjustments,
    /// Clockwise degrees, always a multiple of 90 in (-360, 360).
    pub rotation: i32,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    /// Top-left of the crop box once the user has moved it.
    pub crop_position: Option<(f64, f64)>,
    pub format: ImageFormat,
    pub quality: u8,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(catalog::default_passport_size().clone())
    }
}

impl EditSession {
    pub fn new(passport_size: PassportSize) -> Self {
        Self {
            dimensions: None,
            passport_size,
            print_sheet: None,
            background_color: Color::WHITE,
            background_removed: false,
            adjustments: Adjustments::default(),
            rotation: 0,
            flip_horizontal: false,
            flip_vertical: false,
            crop_position: None,
            format: ImageFormat::Jpeg,
            quality: DEFAULT_QUALITY,
        }
    }

    /// Load a new photo. Geometry, crop and background removal start over;
    /// the chosen sizes, adjustments and output settings are kept.
    #[must_use]
    pub fn set_image(&self, width: u32, height: u32) -> Self {
        Self {
            dimensions: Some((width, height)),
            background_removed: false,
            rotation: 0,
            flip_horizontal: false,
            flip_vertical: false,
            crop_position: None,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn rotate_left(&self) -> Self {
        self.rotated(-90)
    }

    #[must_use]
    pub fn rotate_right(&self) -> Self {
        self.rotated(90)
    }

    /// Rotation changes the crop coordinate frame, so the crop recenters.
    fn rotated(&self, delta: i32) -> Self {
        Self {
            rotation: (self.rotation + delta) % 360,
            crop_position: None,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn toggle_flip_horizontal(&self) -> Self {
        Self {
            flip_horizontal: !self.flip_horizontal,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn toggle_flip_vertical(&self) -> Self {
        Self {
            flip_vertical: !self.flip_vertical,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn set_adjustments(&self, adjustments: Adjustments) -> Self {
        Self {
            adjustments: adjustments.clamped(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn set_background_color(&self, color: Color) -> Self {
        Self {
            background_color: color,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn mark_background_removed(&self) -> Self {
        Self {
            background_removed: true,
            ..self.clone()
        }
    }

    /// Return to the original background; the color goes back to white.
    #[must_use]
    pub fn reset_background(&self) -> Self {
        Self {
            background_removed: false,
            background_color: Color::WHITE,
            ..self.clone()
        }
    }

    /// Choose a passport size. The crop box is resized, so it recenters.
    #[must_use]
    pub fn set_passport_size(&self, size: PassportSize) -> Self {
        Self {
            passport_size: size,
            crop_position: None,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn set_print_sheet(&self, sheet: Option<PrintSheet>) -> Self {
        Self {
            print_sheet: sheet,
            ..self.clone()
        }
    }

    /// Move the crop box. The position is clamped when the box is built.
    #[must_use]
    pub fn set_crop_position(&self, x: f64, y: f64) -> Self {
        Self {
            crop_position: Some((x, y)),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn set_output(&self, format: ImageFormat, quality: u8) -> Self {
        Self {
            format,
            quality: quality.clamp(1, 100),
            ..self.clone()
        }
    }

    /// Back to a fresh session with the given passport size.
    #[must_use]
    pub fn reset(&self, passport_size: PassportSize) -> Self {
        Self::new(passport_size)
    }

    /// Size of the photo after rotation, which is the frame the crop lives in.
    pub fn rotated_dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
            .map(|(w, h)| compute_rotated_bounds(w, h, self.rotation as f64))
    }

    /// The crop box at its current position, or centered if never moved.
    ///
    /// `None` before an upload or for the custom size.
    pub fn crop_box(&self) -> Option<CropBox> {
        let (width, height) = self.rotated_dimensions()?;
        let aspect = self.passport_size.aspect_ratio()?;
        let centered = compute_crop_box(width, height, aspect).ok()?;
        Some(match self.crop_position {
            Some((x, y)) => centered.move_to(x, y),
            None => centered,
        })
    }

    /// Passport cell size in pixels; the rotated photo size for `custom`.
    pub fn cell_size(&self) -> Option<(u32, u32)> {
        self.passport_size
            .pixel_size()
            .or_else(|| self.rotated_dimensions())
    }

    /// The pipeline parameters for this session.
    ///
    /// The background color only applies once the background has been
    /// removed, and the crop only once the user has moved the box.
    pub fn to_transform_spec(&self) -> TransformSpec {
        let crop = match self.crop_position {
            Some(_) => self.crop_box().map(|b| b.to_region()),
            None => None,
        };
        let (target_width_px, target_height_px) = match self.passport_size.pixel_size() {
            Some((w, h)) => (Some(w), Some(h)),
            None => (None, None),
        };
        TransformSpec {
            rotation_degrees: self.rotation as f64,
            flip_horizontal: self.flip_horizontal,
            flip_vertical: self.flip_vertical,
            brightness: self.adjustments.brightness,
            contrast: self.adjustments.contrast,
            saturation: self.adjustments.saturation,
            background_color: self.background_removed.then_some(self.background_color),
            target_width_px,
            target_height_px,
            crop,
        }
    }

    pub fn to_process_request(&self) -> ProcessRequest {
        ProcessRequest {
            transform: self.to_transform_spec(),
            format: self.format,
            quality: self.quality,
        }
    }

    /// Parameters for a tiled export.
    ///
    /// # Errors
    ///
    /// `ValidationError` when no sheet is selected, or when the size is
    /// `custom` and no photo has been loaded.
    pub fn to_print_sheet_request(&self) -> Result<PrintSheetRequest, ValidationError> {
        let sheet = self
            .print_sheet
            .as_ref()
            .ok_or_else(|| ValidationError::new("No print sheet selected"))?;
        let (cell_width, cell_height) = self
            .cell_size()
            .ok_or_else(|| ValidationError::new("Passport and sheet dimensions are required"))?;

        Ok(PrintSheetRequest {
            transform: self.to_transform_spec(),
            cell_width,
            cell_height,
            sheet_width: sheet.width_px,
            sheet_height: sheet.height_px,
            spacing: LayoutSpacing::default(),
            format: self.format,
            quality: self.quality,
        })
    }
}
