//! Geometry operations used by the pipeline: rotation, flips, crop and resize.
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise
//! - Crop regions are integer pixel rectangles in the rotated/flipped image
//! - Origin is the top-left corner
//!
//! Each function consumes its input buffer and returns a new one.

mod crop;
mod flip;
mod resize;
mod rotation;

pub use crop::{apply_crop, CropRegion};
pub use flip::{flip_horizontal, flip_vertical};
pub use resize::{
    contain_dimensions, cover_region, resize_contain, resize_cover, resize_exact, FilterType,
};
pub use rotation::{compute_rotated_bounds, rotate};
