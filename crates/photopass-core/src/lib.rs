//! Photopass Core - passport photo processing
//!
//! This crate holds everything that touches pixels or geometry for photopass:
//! decoding uploads, the transform pipeline, the passport crop box, print
//! sheet layout and composition, and encoding for download. It has no I/O of
//! its own and is shared by the WASM bindings and the HTTP server.

pub mod adjustments;
pub mod buffer;
pub mod catalog;
pub mod color;
pub mod composite;
pub mod crop_box;
pub mod decode;
pub mod drag;
pub mod encode;
pub mod error;
pub mod export;
pub mod format;
pub mod intake;
pub mod layout;
pub mod pipeline;
pub mod session;
mod transform;

pub use adjustments::Adjustments;
pub use buffer::{check_canvas, ImageBuffer, PixelLayout, MAX_CANVAS_PIXELS};
pub use catalog::{BackgroundPreset, CatalogEntry, PassportSize, PrintSheet};
pub use color::Color;
pub use composite::{composite_sheet, flatten};
pub use crop_box::{compute_crop_box, CropBox};
pub use decode::{decode_image, DecodeError};
pub use drag::{CropDrag, Point, PointerEvent};
pub use encode::{encode, EncodeError};
pub use error::{
    BackgroundRemovalError, Error, InfeasibleLayoutError, Result, UnsupportedFormatError,
    UploadError, ValidationError,
};
pub use export::{
    print_sheet, process, render_preview, resize_passport, EncodedImage, PrintSheetRequest,
    ProcessRequest, ResizePassportRequest,
};
pub use format::ImageFormat;
pub use intake::{validate_upload, UploadInfo};
pub use layout::{plan_sheet, sheet_capacity, LayoutSpacing, Placement, SheetPlan};
pub use pipeline::{apply, TransformSpec};
pub use session::EditSession;
pub use transform::{compute_rotated_bounds, CropRegion, FilterType};
