//! JPEG encoding for export.

use std::borrow::Cow;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{validate, EncodeError};
use crate::buffer::{ImageBuffer, PixelLayout};
use crate::color::Color;
use crate::composite::flatten;
use crate::format::ImageFormat;

/// Encode a buffer to JPEG bytes.
///
/// `quality` is clamped to 1-100. RGBA input is composited onto white first,
/// since JPEG cannot carry transparency.
///
/// # Quality Guidelines
///
/// * 90-100: print output, the default for passport sheets
/// * 60-80: acceptable for on-screen previews
/// * Below 60: visible artifacts
pub fn encode_jpeg(image: &ImageBuffer, quality: u8) -> Result<Vec<u8>, EncodeError> {
    validate(image)?;

    let rgb: Cow<'_, ImageBuffer> = match image.layout {
        PixelLayout::Rgb => Cow::Borrowed(image),
        PixelLayout::Rgba => Cow::Owned(flatten(image.clone(), Color::WHITE)),
    };

    let quality = quality.clamp(1, 100);
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .write_image(&rgb.pixels, rgb.width, rgb.height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: ImageFormat::Jpeg,
            message: e.to_string(),
        })?;
    Ok(out)
}
