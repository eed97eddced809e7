//! Image decoding for photopass.
//!
//! Uploads arrive as JPEG or PNG bytes. Decoding applies the EXIF
//! orientation so every later transform is relative to what the user sees.

mod raster;
mod types;

pub use raster::{decode_image, get_orientation, probe};
pub use types::{DecodeError, ImageMetadata, Orientation};
