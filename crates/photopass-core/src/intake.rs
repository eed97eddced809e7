//! Upload validation before any decoding work happens.

use serde::Serialize;

use crate::decode::probe;
use crate::error::{Result, UploadError};
use crate::format::ImageFormat;

/// Default upload size limit.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// MIME types accepted from clients. `image/jpg` is a common misspelling
/// some browsers still send.
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

/// What the client learns about an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadInfo {
    pub mime: String,
    pub size: usize,
    /// Displayed width, after EXIF orientation.
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

pub fn is_accepted_mime(mime: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or(mime).trim();
    ACCEPTED_MIME_TYPES
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(essence))
}

/// Check an upload's declared type and size, then read its header.
///
/// # Errors
///
/// * `UploadError::Empty` for zero bytes.
/// * `UploadError::UnsupportedType` when the MIME type is not JPEG or PNG.
/// * `UploadError::TooLarge` when `bytes` exceeds `limit`.
/// * `DecodeError` when the header cannot be read.
pub fn validate_upload(bytes: &[u8], mime: &str, limit: usize) -> Result<UploadInfo> {
    if bytes.is_empty() {
        return Err(UploadError::Empty.into());
    }
    if !is_accepted_mime(mime) {
        return Err(UploadError::UnsupportedType(mime.to_string()).into());
    }
    if bytes.len() > limit {
        return Err(UploadError::TooLarge {
            size: bytes.len(),
            limit,
        }
        .into());
    }

    let meta = probe(bytes)?;
    let (width, height) = meta.oriented_dimensions();
    Ok(UploadInfo {
        mime: mime.to_string(),
        size: bytes.len(),
        width,
        height,
        format: meta.format,
    })
}
