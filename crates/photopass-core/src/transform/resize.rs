//! Aspect-preserving resize policies.
//!
//! * **contain**: scale to fit inside the target, center, pad the rest.
//! * **cover**: scale to fill the target, center-crop the overflow.
//!
//! Both return exactly `width x height` pixels.

use image::{imageops, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use super::crop::{apply_crop, CropRegion};
use crate::buffer::{check_canvas, ImageBuffer};
use crate::color::Color;
use crate::error::ValidationError;

/// Filter type for resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    #[default]
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

fn check_target(width: u32, height: u32) -> Result<(), ValidationError> {
    if width == 0 || height == 0 {
        return Err(ValidationError::new(format!(
            "Target size must be non-zero, got {}x{}",
            width, height
        )));
    }
    check_canvas(width, height)
}

/// Resample to exactly `width x height`, ignoring aspect ratio.
pub fn resize_exact(
    image: ImageBuffer,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<ImageBuffer, ValidationError> {
    check_target(width, height)?;
    if image.dimensions() == (width, height) {
        return Ok(image);
    }
    image.map_dynamic(|img| img.resize_exact(width, height, filter.to_image_filter()))
}

/// Size of `(src_w, src_h)` scaled to fit inside `(width, height)`.
pub fn contain_dimensions(src_w: u32, src_h: u32, width: u32, height: u32) -> (u32, u32) {
    if src_w == 0 || src_h == 0 {
        return (0, 0);
    }
    let scale = (width as f64 / src_w as f64).min(height as f64 / src_h as f64);
    let w = ((src_w as f64 * scale).round() as u32).clamp(1, width);
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, height);
    (w, h)
}

/// Fit inside the target and pad with `background`, or transparency when `None`.
pub fn resize_contain(
    image: ImageBuffer,
    width: u32,
    height: u32,
    background: Option<Color>,
    filter: FilterType,
) -> Result<ImageBuffer, ValidationError> {
    check_target(width, height)?;
    let (fit_w, fit_h) = contain_dimensions(image.width, image.height, width, height);
    let fitted = resize_exact(image, fit_w, fit_h, filter)?;
    if (fit_w, fit_h) == (width, height) {
        return Ok(fitted);
    }

    let fill = background.map_or([0, 0, 0, 0], Color::to_rgba);
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba(fill));
    let offset_x = (width - fit_w) / 2;
    let offset_y = (height - fit_h) / 2;
    imageops::replace(
        &mut canvas,
        &fitted.into_rgba_image()?,
        offset_x as i64,
        offset_y as i64,
    );
    Ok(ImageBuffer::from_rgba_image(canvas))
}

/// The largest centered region of `(src_w, src_h)` with the target aspect ratio.
pub fn cover_region(src_w: u32, src_h: u32, width: u32, height: u32) -> CropRegion {
    let src_aspect = src_w as f64 / src_h as f64;
    let target_aspect = width as f64 / height as f64;
    if src_aspect > target_aspect {
        let crop_w = ((src_h as f64 * target_aspect).round() as u32).clamp(1, src_w);
        CropRegion::new((src_w - crop_w) / 2, 0, crop_w, src_h)
    } else {
        let crop_h = ((src_w as f64 / target_aspect).round() as u32).clamp(1, src_h);
        CropRegion::new(0, (src_h - crop_h) / 2, src_w, crop_h)
    }
}

/// Fill the target and center-crop whatever overflows.
pub fn resize_cover(
    image: ImageBuffer,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<ImageBuffer, ValidationError> {
    check_target(width, height)?;
    if image.is_empty() {
        return Err(ValidationError::new("Cannot resize an empty image"));
    }
    let region = cover_region(image.width, image.height, width, height);
    let cropped = apply_crop(image, &region)?;
    resize_exact(cropped, width, height, filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelLayout;

    fn solid_rgb(width: u32, height: u32, rgb: [u8; 3]) -> ImageBuffer {
        ImageBuffer::filled(width, height, [rgb[0], rgb[1], rgb[2], 255]).into_rgb()
    }

    #[test]
    fn test_filter_type_conversion() {
        assert!(matches!(
            FilterType::Nearest.to_image_filter(),
            image::imageops::FilterType::Nearest
        ));
        assert!(matches!(
            FilterType::Bilinear.to_image_filter(),
            image::imageops::FilterType::Triangle
        ));
        assert!(matches!(
            FilterType::Lanczos3.to_image_filter(),
            image::imageops::FilterType::Lanczos3
        ));
    }

    #[test]
    fn test_contain_dimensions() {
        assert_eq!(contain_dimensions(1000, 500, 600, 600), (600, 300));
        assert_eq!(contain_dimensions(500, 1000, 600, 600), (300, 600));
        assert_eq!(contain_dimensions(100, 100, 600, 600), (600, 600));
        assert_eq!(contain_dimensions(10000, 1, 100, 100), (100, 1));
    }

    #[test]
    fn test_contain_pads_with_background() {
        let out = resize_contain(
            solid_rgb(200, 100, [255, 0, 0]),
            100,
            100,
            Some(Color::rgb(0, 0, 255)),
            FilterType::Lanczos3,
        )
        .unwrap();
        assert_eq!(out.dimensions(), (100, 100));
        assert_eq!(out.rgba_at(50, 5), [0, 0, 255, 255]);
        assert_eq!(out.rgba_at(50, 50), [255, 0, 0, 255]);
        assert_eq!(out.rgba_at(50, 95), [0, 0, 255, 255]);
    }

    #[test]
    fn test_contain_pads_transparent_without_background() {
        let out = resize_contain(
            solid_rgb(100, 200, [0, 255, 0]),
            100,
            100,
            None,
            FilterType::Bilinear,
        )
        .unwrap();
        assert_eq!(out.rgba_at(2, 50)[3], 0);
        assert_eq!(out.rgba_at(50, 50), [0, 255, 0, 255]);
    }

    #[test]
    fn test_contain_same_aspect_needs_no_padding() {
        let out = resize_contain(solid_rgb(50, 50, [1, 2, 3]), 20, 20, None, FilterType::Nearest)
            .unwrap();
        assert_eq!(out.layout, PixelLayout::Rgb);
        assert_eq!(out.dimensions(), (20, 20));
    }

    #[test]
    fn test_cover_region_is_centered() {
        assert_eq!(cover_region(1000, 500, 600, 600), CropRegion::new(250, 0, 500, 500));
        assert_eq!(cover_region(500, 1000, 600, 600), CropRegion::new(0, 250, 500, 500));
        assert_eq!(cover_region(600, 600, 600, 600), CropRegion::new(0, 0, 600, 600));
    }

    #[test]
    fn test_cover_fills_target() {
        let out = resize_cover(solid_rgb(300, 100, [9, 9, 9]), 413, 531, FilterType::Lanczos3)
            .unwrap();
        assert_eq!(out.dimensions(), (413, 531));
        assert!(out.is_opaque());
    }

    #[test]
    fn test_oversized_target_is_rejected_before_allocating() {
        let src = solid_rgb(4, 4, [0, 0, 0]);
        let err = resize_contain(src.clone(), 4_000_000_000, 3, None, FilterType::Nearest)
            .unwrap_err();
        assert!(err.0.contains("exceeds the limit"));
        assert!(resize_exact(src.clone(), 100_000, 100_000, FilterType::Nearest).is_err());
        assert!(resize_cover(src, u32::MAX, u32::MAX, FilterType::Nearest).is_err());
    }

    #[test]
    fn test_zero_target_is_rejected() {
        assert!(resize_cover(solid_rgb(10, 10, [0, 0, 0]), 0, 10, FilterType::Nearest).is_err());
        assert!(
            resize_contain(solid_rgb(10, 10, [0, 0, 0]), 10, 0, None, FilterType::Nearest).is_err()
        );
    }
}
