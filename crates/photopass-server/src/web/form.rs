//! Multipart form parsing.
//!
//! Every endpoint takes the photo in an `image` file field plus plain text
//! parameters. Numbers parse leniently: a missing or unparsable value falls
//! back to its default, and a numeric prefix such as `"90%"` is accepted.

use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::Bytes;
use photopass_core::encode::clamp_quality;
use photopass_core::{Color, CropRegion, ImageFormat, TransformSpec, UploadError};

use super::error::ApiError;

/// The uploaded photo
#[derive(Debug, Clone)]
pub struct ImageField {
    pub bytes: Bytes,
    pub filename: String,
    pub content_type: String,
}

/// All fields of one request
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub image: Option<ImageField>,
    fields: HashMap<String, String>,
}

/// Longest numeric prefix of `value`, or `default`.
pub fn parse_number(value: Option<&str>, default: f64) -> f64 {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return default;
    };
    let end = value
        .char_indices()
        .find(|&(_, c)| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
        .map_or(value.len(), |(i, _)| i);
    (1..=end)
        .rev()
        .find_map(|len| value[..len].parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Leading integer of `value`, truncating any fraction.
pub fn parse_int(value: Option<&str>) -> Option<i64> {
    let value = value?.trim();
    let digits_start = usize::from(value.starts_with(['-', '+']));
    let end = value[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(value.len(), |i| i + digits_start);
    if end == digits_start {
        return None;
    }
    value[..end].parse().ok()
}

pub fn parse_bool(value: Option<&str>) -> bool {
    value == Some("true")
}

impl UploadForm {
    /// Read every field. Text fields that fail to decode are skipped.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            if name == "image" {
                let filename = field.file_name().unwrap_or("image").to_string();
                let declared = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                let content_type = declared
                    .or_else(|| ImageFormat::detect(&bytes).map(|f| f.content_type().to_string()))
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                form.image = Some(ImageField {
                    bytes,
                    filename,
                    content_type,
                });
            } else if let Ok(text) = field.text().await {
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    #[cfg(test)]
    pub(crate) fn with_fields(fields: &[(&str, &str)]) -> Self {
        UploadForm {
            image: None,
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn require_image(&self) -> Result<&ImageField, ApiError> {
        self.image.as_ref().ok_or_else(|| UploadError::Empty.into())
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn number(&self, name: &str, default: f64) -> f64 {
        parse_number(self.text(name), default)
    }

    pub fn boolean(&self, name: &str) -> bool {
        parse_bool(self.text(name))
    }

    /// A positive integer, or `None` when missing or not positive.
    pub fn dimension(&self, name: &str) -> Option<u32> {
        parse_int(self.text(name))
            .filter(|&v| v > 0)
            .and_then(|v| u32::try_from(v).ok())
    }

    /// A color, `None` when the field is missing or empty.
    pub fn color(&self, name: &str) -> Result<Option<Color>, ApiError> {
        match self.text(name).map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => Ok(Some(Color::parse(value)?)),
            None => Ok(None),
        }
    }

    /// Output format, `jpeg` when missing.
    pub fn format(&self) -> Result<ImageFormat, ApiError> {
        match self.text("format").map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => value
                .parse()
                .map_err(|e: photopass_core::UnsupportedFormatError| ApiError::Core(e.into())),
            None => Ok(ImageFormat::Jpeg),
        }
    }

    /// Quality clamped to 1-100.
    pub fn quality(&self, default: u8) -> u8 {
        clamp_quality(self.number("quality", default as f64).round() as i64)
    }

    /// Crop region from `cropX`, `cropY`, `cropWidth` and `cropHeight`, when all
    /// four are present.
    pub fn crop(&self) -> Option<CropRegion> {
        let coord = |name| {
            parse_int(self.text(name))
                .filter(|&v| v >= 0)
                .and_then(|v| u32::try_from(v).ok())
        };
        Some(CropRegion::new(
            coord("cropX")?,
            coord("cropY")?,
            self.dimension("cropWidth")?,
            self.dimension("cropHeight")?,
        ))
    }

    /// Transform from a JSON `transform` field when present, otherwise from
    /// the individual parameters.
    pub fn transform_spec(&self) -> Result<TransformSpec, ApiError> {
        if let Some(json) = self.text("transform") {
            return serde_json::from_str(json)
                .map_err(|e| ApiError::BadRequest(format!("Invalid transform: {}", e)));
        }

        Ok(TransformSpec {
            rotation_degrees: self.number("rotation", 0.0),
            flip_horizontal: self.boolean("flipHorizontal"),
            flip_vertical: self.boolean("flipVertical"),
            brightness: self.number("brightness", 0.0),
            contrast: self.number("contrast", 0.0),
            saturation: self.number("saturation", 0.0),
            background_color: self.color("backgroundColor")?,
            target_width_px: self.dimension("width"),
            target_height_px: self.dimension("height"),
            crop: self.crop(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(None, 90.0), 90.0);
        assert_eq!(parse_number(Some(""), 90.0), 90.0);
        assert_eq!(parse_number(Some("abc"), 90.0), 90.0);
        assert_eq!(parse_number(Some("12.5"), 0.0), 12.5);
        assert_eq!(parse_number(Some(" -30 "), 0.0), -30.0);
        assert_eq!(parse_number(Some("90%"), 0.0), 90.0);
        assert_eq!(parse_number(Some("1e2"), 0.0), 100.0);
        assert_eq!(parse_number(Some("5e"), 0.0), 5.0);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int(Some("600")), Some(600));
        assert_eq!(parse_int(Some("600.9")), Some(600));
        assert_eq!(parse_int(Some("-4px")), Some(-4));
        assert_eq!(parse_int(Some("px")), None);
        assert_eq!(parse_int(Some("-")), None);
        assert_eq!(parse_int(None), None);
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool(Some("true")));
        assert!(!parse_bool(Some("TRUE")));
        assert!(!parse_bool(Some("1")));
        assert!(!parse_bool(None));
    }

    #[test]
    fn test_transform_from_fields() {
        let form = UploadForm::with_fields(&[
            ("rotation", "90"),
            ("flipHorizontal", "true"),
            ("brightness", "20"),
            ("backgroundColor", "#FFFFFF"),
            ("width", "600"),
            ("height", "600"),
        ]);
        let spec = form.transform_spec().unwrap();
        assert_eq!(spec.rotation_degrees, 90.0);
        assert!(spec.flip_horizontal);
        assert!(!spec.flip_vertical);
        assert_eq!(spec.brightness, 20.0);
        assert_eq!(spec.background_color, Some(Color::WHITE));
        assert_eq!(spec.target_size(), Some((600, 600)));
        assert_eq!(spec.crop, None);
    }

    #[test]
    fn test_transform_from_json_field() {
        let form = UploadForm::with_fields(&[
            ("transform", r#"{"rotationDegrees":-90,"flipVertical":true}"#),
            ("rotation", "45"),
        ]);
        let spec = form.transform_spec().unwrap();
        assert_eq!(spec.rotation_degrees, -90.0);
        assert!(spec.flip_vertical);
    }

    #[test]
    fn test_crop_needs_all_fields() {
        let form = UploadForm::with_fields(&[("cropX", "10"), ("cropY", "20"), ("cropWidth", "30")]);
        assert_eq!(form.crop(), None);

        let form = UploadForm::with_fields(&[
            ("cropX", "10"),
            ("cropY", "20"),
            ("cropWidth", "30"),
            ("cropHeight", "40"),
        ]);
        assert_eq!(form.crop(), Some(CropRegion::new(10, 20, 30, 40)));
    }

    #[test]
    fn test_quality_and_format() {
        let form = UploadForm::with_fields(&[("quality", "250"), ("format", "png")]);
        assert_eq!(form.quality(90), 100);
        assert_eq!(form.format().unwrap(), ImageFormat::Png);

        let form = UploadForm::with_fields(&[("format", "gif")]);
        assert!(form.format().is_err());
        assert_eq!(form.quality(90), 90);
    }

    #[test]
    fn test_bad_color_is_rejected() {
        let form = UploadForm::with_fields(&[("backgroundColor", "#12")]);
        assert!(form.color("backgroundColor").is_err());
        let form = UploadForm::with_fields(&[("backgroundColor", "")]);
        assert_eq!(form.color("backgroundColor").unwrap(), None);
    }

    #[test]
    fn test_missing_image() {
        let err = UploadForm::default().require_image().unwrap_err();
        assert_eq!(err.to_string(), "No image file provided");
    }
}
