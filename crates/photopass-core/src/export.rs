//! Export operations: bytes in, encoded image out.
//!
//! Each call decodes, transforms and encodes in one synchronous pass with no
//! shared state, so independent exports can run on separate threads.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::buffer::{check_canvas, ImageBuffer};
use crate::color::Color;
use crate::composite::{composite_sheet, flatten};
use crate::decode::decode_image;
use crate::encode::{encode, DEFAULT_QUALITY};
use crate::error::{Result, ValidationError};
use crate::format::ImageFormat;
use crate::layout::{plan_sheet, LayoutSpacing, SheetPlan};
use crate::pipeline::{self, TransformSpec};
use crate::transform::{
    apply_crop, contain_dimensions, resize_cover, resize_exact, CropRegion, FilterType,
};

/// An encoded image ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    fn encode(image: &ImageBuffer, format: ImageFormat, quality: u8) -> Result<Self> {
        let bytes = encode(image, format, quality)?;
        Ok(Self {
            bytes,
            format,
            width: image.width,
            height: image.height,
        })
    }

    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    /// `<stem>.<ext>` for a download header.
    pub fn filename(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.format.extension())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

/// Single-photo export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    #[serde(default)]
    pub transform: TransformSpec,
    #[serde(default)]
    pub format: ImageFormat,
    #[serde(default = "default_quality")]
    pub quality: u8,
}

impl Default for ProcessRequest {
    fn default() -> Self {
        Self {
            transform: TransformSpec::default(),
            format: ImageFormat::Jpeg,
            quality: DEFAULT_QUALITY,
        }
    }
}

/// Tiled print-sheet export. The transform's own target size is replaced by
/// the cell size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintSheetRequest {
    #[serde(default)]
    pub transform: TransformSpec,
    pub cell_width: u32,
    pub cell_height: u32,
    pub sheet_width: u32,
    pub sheet_height: u32,
    #[serde(default)]
    pub spacing: LayoutSpacing,
    #[serde(default)]
    pub format: ImageFormat,
    #[serde(default = "default_quality")]
    pub quality: u8,
}

impl PrintSheetRequest {
    /// Plan the sheet without touching any pixels.
    pub fn plan(&self) -> Result<SheetPlan> {
        plan_sheet(
            self.cell_width,
            self.cell_height,
            self.sheet_width,
            self.sheet_height,
            self.spacing,
        )
    }
}

fn default_background() -> Color {
    Color::WHITE
}

/// Cover-fit resize to an exact passport size, always JPEG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizePassportRequest {
    pub width_px: u32,
    pub height_px: u32,
    /// JPEG has no alpha, so a fully transparent color falls back to white.
    #[serde(default = "default_background")]
    pub background_color: Color,
    /// Source region to keep before the centered cover fit.
    #[serde(default)]
    pub crop: Option<CropRegion>,
    #[serde(default = "default_quality")]
    pub quality: u8,
}

impl ResizePassportRequest {
    pub fn new(width_px: u32, height_px: u32) -> Self {
        Self {
            width_px,
            height_px,
            background_color: Color::WHITE,
            crop: None,
            quality: DEFAULT_QUALITY,
        }
    }
}

/// Decode, run the pipeline and encode one photo.
pub fn process(bytes: &[u8], request: &ProcessRequest) -> Result<EncodedImage> {
    let started = Instant::now();
    let spec = request.transform.clamped();
    spec.check_target()?;
    let source = decode_image(bytes)?;
    let output = pipeline::apply(source, &spec)?;
    let encoded = EncodedImage::encode(&output, request.format, request.quality)?;

    tracing::debug!(
        width = encoded.width,
        height = encoded.height,
        format = %encoded.format,
        bytes = encoded.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "processed image"
    );
    Ok(encoded)
}

/// Render the full chain on a copy of the source reduced to `max_edge`.
///
/// The crop region is rescaled with the source, and a target larger than
/// `max_edge` is scaled down to fit it.
pub fn render_preview(bytes: &[u8], request: &ProcessRequest, max_edge: u32) -> Result<EncodedImage> {
    if max_edge == 0 {
        return Err(ValidationError::new("Preview edge must be non-zero").into());
    }
    check_canvas(max_edge, max_edge)?;
    let started = Instant::now();
    let source = decode_image(bytes)?;
    let (src_w, src_h) = source.dimensions();

    let mut spec = request.transform.clamped();
    let source = if src_w.max(src_h) > max_edge {
        let (w, h) = contain_dimensions(src_w, src_h, max_edge, max_edge);
        let factor = w as f64 / src_w as f64;
        spec.crop = spec.crop.map(|region| region.scaled(factor));
        resize_exact(source, w, h, FilterType::Bilinear)?
    } else {
        source
    };
    if let Some((w, h)) = spec.target_size() {
        if w.max(h) > max_edge {
            let (w, h) = contain_dimensions(w, h, max_edge, max_edge);
            spec = spec.with_target_size(w, h);
        }
    }

    let output = pipeline::apply(source, &spec)?;
    let encoded = EncodedImage::encode(&output, request.format, request.quality)?;

    tracing::debug!(
        width = encoded.width,
        height = encoded.height,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "rendered preview"
    );
    Ok(encoded)
}

/// Produce a sheet of identical passport photos.
///
/// The layout is planned before decoding so an infeasible request fails
/// without doing any image work.
pub fn print_sheet(bytes: &[u8], request: &PrintSheetRequest) -> Result<EncodedImage> {
    let started = Instant::now();
    let plan = request.plan()?;

    let source = decode_image(bytes)?;
    let cell_spec = request
        .transform
        .clamped()
        .with_target_size(request.cell_width, request.cell_height);
    let cell = pipeline::apply(source, &cell_spec)?;
    let sheet = composite_sheet(&cell, &plan, cell_spec.background())?;
    let encoded = EncodedImage::encode(&sheet, request.format, request.quality)?;

    tracing::debug!(
        cols = plan.cols,
        rows = plan.rows,
        count = plan.count(),
        format = %encoded.format,
        bytes = encoded.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "rendered print sheet"
    );
    Ok(encoded)
}

/// Cover-fit the photo to exactly the passport size on an opaque background.
pub fn resize_passport(bytes: &[u8], request: &ResizePassportRequest) -> Result<EncodedImage> {
    if request.width_px == 0 || request.height_px == 0 {
        return Err(ValidationError::new("Width and height are required").into());
    }
    check_canvas(request.width_px, request.height_px)?;

    let mut image = decode_image(bytes)?;
    if let Some(region) = &request.crop {
        image = apply_crop(image, region)?;
    }
    let resized = resize_cover(image, request.width_px, request.height_px, FilterType::Lanczos3)?;
    let background = if request.background_color.is_transparent() {
        Color::WHITE
    } else {
        request.background_color
    };
    let flattened = flatten(resized, background);
    let encoded = EncodedImage::encode(&flattened, ImageFormat::Jpeg, request.quality)?;

    tracing::debug!(
        width = encoded.width,
        height = encoded.height,
        bytes = encoded.len(),
        "resized passport photo"
    );
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelLayout;
    use crate::encode::{encode_jpeg, encode_png};
    use crate::Error;

    fn jpeg_source(width: u32, height: u32) -> Vec<u8> {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 128]);
            }
        }
        encode_jpeg(&ImageBuffer::new(width, height, PixelLayout::Rgb, pixels), 90).unwrap()
    }

    fn transparent_png(width: u32, height: u32) -> Vec<u8> {
        encode_png(&ImageBuffer::filled(width, height, [0, 0, 0, 0])).unwrap()
    }

    #[test]
    fn test_end_to_end_single_photo_png() {
        let request = ProcessRequest {
            transform: TransformSpec {
                rotation_degrees: 90.0,
                flip_horizontal: true,
                background_color: Some(Color::WHITE),
                ..Default::default()
            }
            .with_target_size(600, 600),
            format: ImageFormat::Png,
            quality: 90,
        };
        let out = process(&jpeg_source(1000, 1000), &request).unwrap();
        assert_eq!(out.format, ImageFormat::Png);
        assert_eq!(out.content_type(), "image/png");
        assert_eq!((out.width, out.height), (600, 600));

        let decoded = decode_image(&out.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (600, 600));
        assert!(decoded.is_opaque());
    }

    #[test]
    fn test_png_without_background_keeps_alpha() {
        let request = ProcessRequest {
            format: ImageFormat::Png,
            ..Default::default()
        };
        let out = process(&transparent_png(8, 8), &request).unwrap();
        let decoded = decode_image(&out.bytes).unwrap();
        assert!(decoded.has_alpha());
        assert_eq!(decoded.rgba_at(4, 4)[3], 0);
    }

    #[test]
    fn test_jpeg_output_is_opaque() {
        let out = process(&transparent_png(8, 8), &ProcessRequest::default()).unwrap();
        assert_eq!(out.content_type(), "image/jpeg");
        assert!(!decode_image(&out.bytes).unwrap().has_alpha());
    }

    #[test]
    fn test_process_rejects_garbage() {
        let err = process(b"not an image", &ProcessRequest::default()).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_print_sheet_two_inch_on_4x6() {
        let request = PrintSheetRequest {
            transform: TransformSpec {
                background_color: Some(Color::WHITE),
                ..Default::default()
            },
            cell_width: 600,
            cell_height: 600,
            sheet_width: 1200,
            sheet_height: 1800,
            spacing: LayoutSpacing::default(),
            format: ImageFormat::Png,
            quality: 90,
        };
        assert_eq!(request.plan().unwrap().count(), 2);

        let out = print_sheet(&jpeg_source(300, 400), &request).unwrap();
        assert_eq!((out.width, out.height), (1200, 1800));
        let decoded = decode_image(&out.bytes).unwrap();
        assert!(decoded.is_opaque());
        assert_eq!(decoded.rgba_at(5, 5), [255, 255, 255, 255]);
    }

    #[test]
    fn test_print_sheet_infeasible_fails_before_decoding() {
        let request = PrintSheetRequest {
            transform: TransformSpec::default(),
            cell_width: 2000,
            cell_height: 2000,
            sheet_width: 1200,
            sheet_height: 1800,
            spacing: LayoutSpacing::default(),
            format: ImageFormat::Jpeg,
            quality: 90,
        };
        // Garbage bytes: the layout error must win.
        let err = print_sheet(b"garbage", &request).unwrap_err();
        assert!(matches!(err, Error::InfeasibleLayout(_)));
        assert!(err.to_string().contains("larger sheet"));
    }

    #[test]
    fn test_resize_passport_cover() {
        let out = resize_passport(&jpeg_source(800, 400), &ResizePassportRequest::new(413, 531))
            .unwrap();
        assert_eq!(out.format, ImageFormat::Jpeg);
        assert_eq!((out.width, out.height), (413, 531));
        let decoded = decode_image(&out.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (413, 531));
    }

    #[test]
    fn test_resize_passport_flattens_transparency() {
        let mut request = ResizePassportRequest::new(20, 20);
        request.background_color = Color::rgb(0, 0, 0);
        let out = resize_passport(&transparent_png(40, 40), &request).unwrap();
        let [r, g, b, a] = decode_image(&out.bytes).unwrap().rgba_at(10, 10);
        assert_eq!(a, 255);
        assert!(r < 10 && g < 10 && b < 10);
    }

    #[test]
    fn test_resize_passport_with_crop() {
        let mut request = ResizePassportRequest::new(100, 100);
        request.crop = Some(CropRegion::new(0, 0, 200, 200));
        let out = resize_passport(&jpeg_source(400, 300), &request).unwrap();
        assert_eq!((out.width, out.height), (100, 100));
    }

    #[test]
    fn test_resize_passport_requires_size() {
        let err = resize_passport(&jpeg_source(10, 10), &ResizePassportRequest::new(0, 100))
            .unwrap_err();
        assert_eq!(err.to_string(), "Width and height are required");
    }

    #[test]
    fn test_resize_passport_transparent_background_is_white() {
        let mut request = ResizePassportRequest::new(20, 20);
        request.background_color = Color::TRANSPARENT;
        let out = resize_passport(&transparent_png(40, 40), &request).unwrap();
        let [r, g, b, _] = decode_image(&out.bytes).unwrap().rgba_at(10, 10);
        assert!(r > 245 && g > 245 && b > 245);
    }

    #[test]
    fn test_oversized_sizes_fail_before_decoding() {
        let huge = ResizePassportRequest::new(u32::MAX, u32::MAX);
        assert!(matches!(resize_passport(b"not an image", &huge), Err(Error::Validation(_))));

        let request = ProcessRequest {
            transform: TransformSpec::default().with_target_size(4_000_000_000, 4),
            ..Default::default()
        };
        assert!(matches!(process(b"not an image", &request), Err(Error::Validation(_))));
        assert!(matches!(
            render_preview(b"not an image", &ProcessRequest::default(), u32::MAX),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_request_json_defaults() {
        let request: ResizePassportRequest =
            serde_json::from_str(r#"{"widthPx":600,"heightPx":600}"#).unwrap();
        assert_eq!(request.background_color, Color::WHITE);
        assert_eq!(request.quality, 90);
        assert_eq!(request.crop, None);

        let sheet: PrintSheetRequest = serde_json::from_str(
            r#"{"cellWidth":600,"cellHeight":600,"sheetWidth":1200,"sheetHeight":1800,"format":"png"}"#,
        )
        .unwrap();
        assert_eq!(sheet.spacing, LayoutSpacing::default());
        assert_eq!(sheet.format, ImageFormat::Png);
    }

    #[test]
    fn test_preview_is_reduced() {
        let out = render_preview(&jpeg_source(800, 400), &ProcessRequest::default(), 200).unwrap();
        assert_eq!((out.width, out.height), (200, 100));
    }

    #[test]
    fn test_preview_scales_crop_and_target() {
        let request = ProcessRequest {
            transform: TransformSpec {
                crop: Some(CropRegion::new(0, 0, 400, 400)),
                ..Default::default()
            }
            .with_target_size(600, 600),
            format: ImageFormat::Png,
            quality: 90,
        };
        let out = render_preview(&jpeg_source(800, 800), &request, 300).unwrap();
        assert_eq!((out.width, out.height), (300, 300));
    }

    #[test]
    fn test_preview_small_source_is_untouched() {
        let out = render_preview(&jpeg_source(40, 30), &ProcessRequest::default(), 1024).unwrap();
        assert_eq!((out.width, out.height), (40, 30));
    }

    #[test]
    fn test_filename() {
        let out = process(&jpeg_source(4, 4), &ProcessRequest::default()).unwrap();
        assert_eq!(out.filename("processed-image"), "processed-image.jpeg");
    }
}
