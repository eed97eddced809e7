//! Pixel-rectangle cropping.

use serde::{Deserialize, Serialize};

use crate::buffer::ImageBuffer;
use crate::error::ValidationError;

/// An integer rectangle in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Intersect with a `width x height` image. `None` when nothing remains.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<CropRegion> {
        if self.x >= width || self.y >= height {
            return None;
        }
        let w = self.width.min(width - self.x);
        let h = self.height.min(height - self.y);
        if w == 0 || h == 0 {
            None
        } else {
            Some(CropRegion::new(self.x, self.y, w, h))
        }
    }

    /// The same rectangle on an image resampled by `factor`.
    pub fn scaled(&self, factor: f64) -> CropRegion {
        let scale = |v: u32| (v as f64 * factor).round() as u32;
        CropRegion::new(
            scale(self.x),
            scale(self.y),
            scale(self.width).max(1),
            scale(self.height).max(1),
        )
    }

    pub fn covers(&self, width: u32, height: u32) -> bool {
        self.x == 0 && self.y == 0 && self.width >= width && self.height >= height
    }
}

/// Copy the region out of the image. The region is clipped to the image first.
///
/// # Errors
///
/// `ValidationError` when the region does not overlap the image at all.
pub fn apply_crop(image: ImageBuffer, region: &CropRegion) -> Result<ImageBuffer, ValidationError> {
    let clipped = region.clamp_to(image.width, image.height).ok_or_else(|| {
        ValidationError::new(format!(
            "Crop region {}x{} at ({}, {}) lies outside the {}x{} image",
            region.width, region.height, region.x, region.y, image.width, image.height
        ))
    })?;

    if clipped.covers(image.width, image.height) {
        return Ok(image);
    }

    let ch = image.layout.channels();
    let src_stride = image.width as usize * ch;
    let row_len = clipped.width as usize * ch;
    let mut pixels = Vec::with_capacity(row_len * clipped.height as usize);

    for y in clipped.y..clipped.y + clipped.height {
        let start = y as usize * src_stride + clipped.x as usize * ch;
        pixels.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    Ok(ImageBuffer::new(
        clipped.width,
        clipped.height,
        image.layout,
        pixels,
    ))
}
