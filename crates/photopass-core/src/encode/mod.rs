//! Image encoding for export.
//!
//! JPEG output is always opaque: any residual alpha is composited onto white
//! before encoding. PNG output keeps whatever channel layout the buffer has.

mod jpeg;
mod png;

use thiserror::Error;

use crate::buffer::ImageBuffer;
use crate::format::ImageFormat;

pub use jpeg::encode_jpeg;
pub use png::encode_png;

/// Default quality used when a request does not specify one.
pub const DEFAULT_QUALITY: u8 = 90;

/// Errors that can occur while encoding a buffer.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match the buffer dimensions.
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying codec failed.
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: ImageFormat,
        message: String,
    },
}

/// Clamp a user-supplied quality to 1-100.
#[inline]
pub fn clamp_quality(quality: i64) -> u8 {
    quality.clamp(1, 100) as u8
}

/// Encode a buffer in the given format.
///
/// `quality` only affects JPEG; PNG is lossless and ignores it.
pub fn encode(image: &ImageBuffer, format: ImageFormat, quality: u8) -> Result<Vec<u8>, EncodeError> {
    match format {
        ImageFormat::Jpeg => encode_jpeg(image, quality),
        ImageFormat::Png => encode_png(image),
    }
}

pub(crate) fn validate(image: &ImageBuffer) -> Result<(), EncodeError> {
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }
    let expected = image.width as usize * image.height as usize * image.layout.channels();
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_quality() {
        assert_eq!(clamp_quality(0), 1);
        assert_eq!(clamp_quality(-20), 1);
        assert_eq!(clamp_quality(55), 55);
        assert_eq!(clamp_quality(250), 100);
    }

    #[test]
    fn test_encode_dispatches_by_format() {
        let img = ImageBuffer::filled(4, 4, [50, 60, 70, 255]);
        let jpeg = encode(&img, ImageFormat::Jpeg, 80).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        let png = encode(&img, ImageFormat::Png, 80).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn test_validate_rejects_short_buffer() {
        let mut img = ImageBuffer::filled(2, 2, [0, 0, 0, 255]);
        img.pixels.truncate(10);
        assert!(matches!(
            validate(&img),
            Err(EncodeError::InvalidPixelData {
                expected: 16,
                actual: 10
            })
        ));
    }

    #[test]
    fn test_encoding_failed_display() {
        let err = EncodeError::EncodingFailed {
            format: ImageFormat::Png,
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "png encoding failed: boom");
    }
}
