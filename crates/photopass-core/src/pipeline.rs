//! The fixed-order transform chain shared by preview and export.
//!
//! ## Stage Order
//! 1. Rotate (clockwise, canvas expands)
//! 2. Flip (vertical, then horizontal)
//! 3. Crop (only when a region is given)
//! 4. Resize (contain, padded with the background or transparency)
//! 5. Modulate (brightness and saturation)
//! 6. Contrast
//! 7. Flatten onto the background color
//!
//! Resize sees the rotated dimensions, and flatten sees both padding and
//! transparent source pixels.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::adjustments::{apply_contrast, apply_modulate, Adjustments};
use crate::buffer::{check_canvas, ImageBuffer};
use crate::color::Color;
use crate::composite::flatten;
use crate::error::{Result, ValidationError};
use crate::transform::{
    apply_crop, flip_horizontal, flip_vertical, resize_contain, rotate, CropRegion, FilterType,
};

/// Every parameter of one run of the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformSpec {
    /// Clockwise degrees. Multiples of 90 are lossless.
    pub rotation_degrees: f64,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    /// Padding and flatten color. `None` or a fully transparent color keeps
    /// transparency.
    pub background_color: Option<Color>,
    pub target_width_px: Option<u32>,
    pub target_height_px: Option<u32>,
    /// Region of the rotated and flipped image to keep before resizing.
    pub crop: Option<CropRegion>,
}

impl TransformSpec {
    pub fn adjustments(&self) -> Adjustments {
        Adjustments::new(self.brightness, self.contrast, self.saturation)
    }

    /// Copy with adjustments clamped to -100..=100 and a non-finite rotation zeroed.
    pub fn clamped(&self) -> Self {
        let adj = self.adjustments().clamped();
        Self {
            rotation_degrees: if self.rotation_degrees.is_finite() {
                self.rotation_degrees
            } else {
                0.0
            },
            brightness: adj.brightness,
            contrast: adj.contrast,
            saturation: adj.saturation,
            ..self.clone()
        }
    }

    /// The color to pad and flatten with, if any.
    pub fn background(&self) -> Option<Color> {
        self.background_color.filter(|color| !color.is_transparent())
    }

    /// Reject a target canvas above the pixel limit.
    pub fn check_target(&self) -> std::result::Result<(), ValidationError> {
        match self.target_size() {
            Some((width, height)) => check_canvas(width, height),
            None => Ok(()),
        }
    }

    /// Both target dimensions, when both are set and non-zero.
    pub fn target_size(&self) -> Option<(u32, u32)> {
        match (self.target_width_px, self.target_height_px) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }

    pub fn with_target_size(mut self, width: u32, height: u32) -> Self {
        self.target_width_px = Some(width);
        self.target_height_px = Some(height);
        self
    }

    /// True when running the pipeline would return its input unchanged.
    pub fn is_identity(&self) -> bool {
        let adj = self.adjustments();
        (self.rotation_degrees % 360.0) == 0.0
            && !self.flip_horizontal
            && !self.flip_vertical
            && adj.is_default()
            && self.background().is_none()
            && self.target_size().is_none()
            && self.crop.is_none()
    }
}

/// Run the full chain over `image`.
///
/// # Errors
///
/// `ValidationError` when the crop region misses the image entirely, or a
/// target or rotated canvas is larger than the pixel limit.
pub fn apply(image: ImageBuffer, spec: &TransformSpec) -> Result<ImageBuffer> {
    spec.check_target()?;
    let started = Instant::now();
    let (src_w, src_h) = image.dimensions();
    let background = spec.background();

    let mut img = rotate(image, spec.rotation_degrees)?;
    if spec.flip_vertical {
        img = flip_vertical(img)?;
    }
    if spec.flip_horizontal {
        img = flip_horizontal(img)?;
    }
    tracing::debug!(width = img.width, height = img.height, "geometry applied");

    if let Some(region) = &spec.crop {
        img = apply_crop(img, region)?;
        tracing::debug!(?region, "cropped");
    }

    if let Some((width, height)) = spec.target_size() {
        img = resize_contain(img, width, height, background, FilterType::Lanczos3)?;
        tracing::debug!(width, height, "resized");
    }

    let adj = spec.adjustments();
    if adj.needs_modulate() {
        img = apply_modulate(img, adj.brightness, adj.saturation);
    }
    if adj.contrast != 0.0 {
        img = apply_contrast(img, adj.contrast);
    }

    if let Some(color) = background {
        img = flatten(img, color);
    }

    tracing::debug!(
        src_w,
        src_h,
        out_w = img.width,
        out_h = img.height,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "pipeline finished"
    );
    Ok(img)
}
