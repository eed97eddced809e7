//! Clockwise rotation with canvas expansion.
//!
//! Multiples of 90 degrees are exact `image` quarter turns that keep the
//! channel layout. Any other angle uses bilinear inverse mapping onto an RGBA canvas
//! large enough to hold the rotated content; uncovered area is transparent.
//!
//! For a clockwise rotation by θ in image coordinates (y down), the inverse
//! transform from a destination point to the source is:
//! ```text
//! src_x =  dx * cos(θ) + dy * sin(θ) + src_cx
//! src_y = -dx * sin(θ) + dy * cos(θ) + src_cy
//! ```
//! where `dx`, `dy` are relative to the destination center.

use crate::buffer::{check_canvas, ImageBuffer, PixelLayout};
use crate::error::ValidationError;

const EPSILON: f64 = 0.001;

/// A rotation reduced to one of the lossless quarter turns, or an arbitrary angle.
#[derive(Debug, Clone, Copy, PartialEq)]
enum QuarterTurn {
    None,
    Cw90,
    Cw180,
    Cw270,
    Arbitrary(f64),
}

fn classify(angle_degrees: f64) -> QuarterTurn {
    let normalized = angle_degrees.rem_euclid(360.0);
    let near = |target: f64| (normalized - target).abs() < EPSILON;
    if near(0.0) || near(360.0) {
        QuarterTurn::None
    } else if near(90.0) {
        QuarterTurn::Cw90
    } else if near(180.0) {
        QuarterTurn::Cw180
    } else if near(270.0) {
        QuarterTurn::Cw270
    } else {
        QuarterTurn::Arbitrary(normalized)
    }
}

/// Dimensions of the smallest canvas holding the image rotated by `angle_degrees`.
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    match classify(angle_degrees) {
        QuarterTurn::None | QuarterTurn::Cw180 => (width, height),
        QuarterTurn::Cw90 | QuarterTurn::Cw270 => (height, width),
        QuarterTurn::Arbitrary(angle) => {
            let rad = angle.to_radians();
            let (cos, sin) = (rad.cos().abs(), rad.sin().abs());
            let (w, h) = (width as f64, height as f64);
            let new_w = (w * cos + h * sin).round() as u32;
            let new_h = (w * sin + h * cos).round() as u32;
            (new_w.max(1), new_h.max(1))
        }
    }
}

/// Rotate an image clockwise by `angle_degrees` around its center.
///
/// # Errors
///
/// `ValidationError` when the expanded canvas would exceed the pixel limit.
pub fn rotate(image: ImageBuffer, angle_degrees: f64) -> Result<ImageBuffer, ValidationError> {
    if image.is_empty() {
        return Ok(image);
    }
    match classify(angle_degrees) {
        QuarterTurn::None => Ok(image),
        QuarterTurn::Cw90 => image.map_dynamic(|img| img.rotate90()),
        QuarterTurn::Cw180 => image.map_dynamic(|img| img.rotate180()),
        QuarterTurn::Cw270 => image.map_dynamic(|img| img.rotate270()),
        QuarterTurn::Arbitrary(angle) => rotate_bilinear(&image, angle),
    }
}

fn rotate_bilinear(
    image: &ImageBuffer,
    angle_degrees: f64,
) -> Result<ImageBuffer, ValidationError> {
    let (dst_w, dst_h) = compute_rotated_bounds(image.width, image.height, angle_degrees);
    check_canvas(dst_w, dst_h)?;
    let rad = angle_degrees.to_radians();
    let (cos, sin) = (rad.cos(), rad.sin());

    let src_cx = image.width as f64 / 2.0;
    let src_cy = image.height as f64 / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut pixels = vec![0u8; dst_w as usize * dst_h as usize * 4];

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            // Sample at pixel centers.
            let dx = dst_x as f64 + 0.5 - dst_cx;
            let dy = dst_y as f64 + 0.5 - dst_cy;

            let src_x = dx * cos + dy * sin + src_cx - 0.5;
            let src_y = -dx * sin + dy * cos + src_cy - 0.5;

            let idx = (dst_y as usize * dst_w as usize + dst_x as usize) * 4;
            pixels[idx..idx + 4].copy_from_slice(&sample_bilinear(image, src_x, src_y));
        }
    }

    Ok(ImageBuffer::new(dst_w, dst_h, PixelLayout::Rgba, pixels))
}

/// Bilinear sample at pixel-index coordinates. Points more than half a
/// pixel outside the source are fully transparent.
fn sample_bilinear(image: &ImageBuffer, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (image.width as f64, image.height as f64);
    if x < -0.5 || y < -0.5 || x > w - 0.5 || y > h - 0.5 {
        return [0, 0, 0, 0];
    }

    let max_x = image.width as i64 - 1;
    let max_y = image.height as i64 - 1;
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let at = |px: i64, py: i64| {
        let px = px.clamp(0, max_x) as u32;
        let py = py.clamp(0, max_y) as u32;
        image.rgba_at(px, py)
    };

    let p00 = at(x0, y0);
    let p10 = at(x0 + 1, y0);
    let p01 = at(x0, y0 + 1);
    let p11 = at(x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = p00[c] as f64 * (1.0 - fx) + p10[c] as f64 * fx;
        let bottom = p01[c] as f64 * (1.0 - fx) + p11[c] as f64 * fx;
        out[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}
