//! Types shared by the decoding functions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::format::ImageFormat;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// No bytes were supplied.
    #[error("Empty image data")]
    Empty,

    /// The bytes are not a JPEG or PNG.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The header was recognized but the image data is unreadable.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    /// Flip horizontal after rotating 90 CW.
    Transpose = 5,
    Rotate90CW = 6,
    /// Flip horizontal after rotating 270 CW.
    Transverse = 7,
    Rotate270CW = 8,
}

impl Orientation {
    /// True for the four orientations that exchange width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// Header information read without decoding pixel data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Stored width, before orientation correction.
    pub width: u32,
    /// Stored height, before orientation correction.
    pub height: u32,
    pub orientation: Orientation,
    pub format: ImageFormat,
}

impl ImageMetadata {
    /// Dimensions as displayed, after orientation correction.
    pub fn oriented_dimensions(&self) -> (u32, u32) {
        if self.orientation.swaps_dimensions() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }
}
