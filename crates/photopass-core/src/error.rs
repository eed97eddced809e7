//! Error taxonomy shared by every photopass operation.
//!
//! Each failure kind is its own type so callers (the HTTP layer, the WASM
//! bindings) can map them to distinct user-facing messages. [`Error`] wraps
//! them all and is what the public operations return.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Result alias for photopass operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error returned by the pipeline, layout and export operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Input bytes are not a supported raster image.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Requested output format is neither JPEG nor PNG.
    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormatError),

    /// The passport cell does not fit on the sheet even once.
    #[error(transparent)]
    InfeasibleLayout(#[from] InfeasibleLayoutError),

    /// The background-removal collaborator failed or was aborted.
    #[error(transparent)]
    BackgroundRemoval(#[from] BackgroundRemovalError),

    /// A required parameter is missing or out of range.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The upload was rejected before decoding.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Encoding the final raster failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Output format string was not `jpeg` or `png`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported output format '{0}': expected 'jpeg' or 'png'")]
pub struct UnsupportedFormatError(pub String);

/// The cell cannot be placed on the sheet with the given margin and spacing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Passport photo ({cell_width}x{cell_height}px) is too large for the selected sheet size \
     ({sheet_width}x{sheet_height}px). Please choose a larger sheet or smaller passport size."
)]
pub struct InfeasibleLayoutError {
    pub cell_width: u32,
    pub cell_height: u32,
    pub sheet_width: u32,
    pub sheet_height: u32,
}

/// Background removal failed; the message comes from the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Background removal failed: {0}")]
pub struct BackgroundRemovalError(pub String);

/// Missing or invalid parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Reasons an upload is refused at intake.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("No image file provided")]
    Empty,

    #[error("Invalid file type '{0}'. Only JPEG and PNG are allowed.")]
    UnsupportedType(String),

    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },
}
