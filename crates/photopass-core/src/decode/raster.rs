//! JPEG and PNG decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, ImageMetadata, Orientation};
use crate::buffer::ImageBuffer;
use crate::format::ImageFormat;

/// Decode a JPEG or PNG from bytes, applying EXIF orientation correction.
///
/// The result is RGB when the source has no alpha channel and RGBA otherwise.
///
/// # Errors
///
/// Returns `DecodeError::Empty` for zero bytes, `DecodeError::InvalidFormat`
/// when the magic bytes are neither JPEG nor PNG, and
/// `DecodeError::CorruptedFile` when the data cannot be decoded.
pub fn decode_image(bytes: &[u8]) -> Result<ImageBuffer, DecodeError> {
    let format = sniff(bytes)?;
    let orientation = extract_orientation(bytes);

    let img = ImageReader::with_format(Cursor::new(bytes), to_image_format(format))
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let oriented = apply_orientation(img, orientation);
    Ok(ImageBuffer::from_dynamic(oriented))
}

/// Read dimensions, orientation and format without decoding the pixels.
pub fn probe(bytes: &[u8]) -> Result<ImageMetadata, DecodeError> {
    let format = sniff(bytes)?;
    let (width, height) = ImageReader::with_format(Cursor::new(bytes), to_image_format(format))
        .into_dimensions()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    Ok(ImageMetadata {
        width,
        height,
        orientation: extract_orientation(bytes),
        format,
    })
}

/// EXIF orientation of the image, `Normal` when absent or unreadable.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    extract_orientation(bytes)
}

fn sniff(bytes: &[u8]) -> Result<ImageFormat, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    ImageFormat::detect(bytes).ok_or(DecodeError::InvalidFormat)
}

fn to_image_format(format: ImageFormat) -> image::ImageFormat {
    match format {
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        ImageFormat::Png => image::ImageFormat::Png,
    }
}

fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::jpeg::JpegEncoder;
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb([200, 100, 50]));
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, 90)
            .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
            .unwrap();
        out
    }

    fn png_rgba_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 128]));
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
            .unwrap();
        out
    }

    /// Splice an APP1 segment carrying only an Orientation tag after SOI.
    fn with_exif_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
        let mut tiff = vec![b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08];
        tiff.extend_from_slice(&[0x00, 0x01]);
        tiff.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
        tiff.extend_from_slice(&orientation.to_be_bytes());
        tiff.extend_from_slice(&[0x00, 0x00]);
        tiff.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        let mut payload = b"Exif\0\0".to_vec();
        payload.extend_from_slice(&tiff);
        let len = (payload.len() + 2) as u16;

        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&[0xFF, 0xE1]);
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(&payload);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn test_decode_jpeg() {
        let img = decode_image(&jpeg_bytes(8, 4)).unwrap();
        assert_eq!(img.dimensions(), (8, 4));
        assert!(!img.has_alpha());
        assert_eq!(img.pixels.len(), 8 * 4 * 3);
    }

    #[test]
    fn test_decode_png_keeps_alpha() {
        let img = decode_image(&png_rgba_bytes(3, 5)).unwrap();
        assert_eq!(img.dimensions(), (3, 5));
        assert!(img.has_alpha());
        assert_eq!(img.rgba_at(0, 0), [10, 20, 30, 128]);
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(matches!(decode_image(&[]), Err(DecodeError::Empty)));
    }

    #[test]
    fn test_decode_unknown_format() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_truncated_jpeg() {
        let bytes = jpeg_bytes(16, 16);
        let result = decode_image(&bytes[..20]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_orientation_without_exif() {
        assert_eq!(get_orientation(&jpeg_bytes(2, 2)), Orientation::Normal);
        assert_eq!(get_orientation(&[0x00, 0x01, 0x02]), Orientation::Normal);
    }

    #[test]
    fn test_exif_orientation_is_applied() {
        let bytes = with_exif_orientation(&jpeg_bytes(8, 4), 6);
        assert_eq!(get_orientation(&bytes), Orientation::Rotate90CW);

        let img = decode_image(&bytes).unwrap();
        assert_eq!(img.dimensions(), (4, 8));
    }

    #[test]
    fn test_probe_reports_stored_and_oriented_size() {
        let meta = probe(&with_exif_orientation(&jpeg_bytes(8, 4), 6)).unwrap();
        assert_eq!((meta.width, meta.height), (8, 4));
        assert_eq!(meta.oriented_dimensions(), (4, 8));
        assert_eq!(meta.format, ImageFormat::Jpeg);

        let meta = probe(&png_rgba_bytes(3, 5)).unwrap();
        assert_eq!(meta.format, ImageFormat::Png);
        assert_eq!(meta.oriented_dimensions(), (3, 5));
    }

    #[test]
    fn test_apply_orientation_rotate180() {
        let img = RgbImage::from_raw(2, 1, vec![255, 0, 0, 0, 255, 0]).unwrap();
        let result = apply_orientation(DynamicImage::ImageRgb8(img), Orientation::Rotate180);
        let rgb = result.into_rgb8();
        assert_eq!(rgb.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(rgb.get_pixel(1, 0).0, [255, 0, 0]);
    }
}
