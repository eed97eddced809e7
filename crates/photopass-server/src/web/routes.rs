//! HTTP route handlers for the photo API.
//!
//! Every image endpoint takes a multipart form with the upload in an `image`
//! field. Decoding and encoding are CPU bound and run on the blocking pool.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use photopass_core::catalog::{self, BackgroundPreset};
use photopass_core::export::{self, EncodedImage};
use photopass_core::{
    validate_upload, BackgroundRemovalError, Color, ImageFormat, PassportSize, PrintSheet,
    PrintSheetRequest, ProcessRequest, ResizePassportRequest, ValidationError,
};
use serde::Serialize;

use super::error::ApiError;
use super::form::{ImageField, UploadForm};
use crate::background::BackgroundRemover;
use crate::config::Config;
use crate::preview::{PreviewOutcome, PreviewSessions};

/// Session used when a preview request does not name one.
const DEFAULT_SESSION: &str = "default";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub remover: Arc<BackgroundRemover>,
    pub previews: Arc<PreviewSessions>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, BackgroundRemovalError> {
        let remover = BackgroundRemover::from_config(&config.background_removal)?;
        let previews = PreviewSessions::new(Duration::from_millis(config.preview.debounce_ms));
        Ok(Self {
            config: Arc::new(config),
            remover: Arc::new(remover),
            previews: Arc::new(previews),
        })
    }

    /// Check the upload's type and size against the configured limit.
    fn accept<'a>(&self, form: &'a UploadForm) -> Result<&'a ImageField, ApiError> {
        let image = form.require_image()?;
        validate_upload(&image.bytes, &image.content_type, self.config.max_upload_bytes)?;
        Ok(image)
    }

    fn process_request(&self, form: &UploadForm) -> Result<ProcessRequest, ApiError> {
        Ok(ProcessRequest {
            transform: form.transform_spec()?,
            format: form.format()?,
            quality: form.quality(self.config.default_quality),
        })
    }
}

#[derive(Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Serialize)]
pub struct UploadData {
    pub filename: String,
    pub mimetype: String,
    pub size: usize,
    pub dimensions: Dimensions,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub data: UploadData,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub passport_sizes: &'static [PassportSize],
    pub print_sheets: &'static [PrintSheet],
    pub background_colors: &'static [BackgroundPreset],
}

fn image_response(encoded: EncodedImage, download_stem: Option<&str>) -> Response {
    let filename = download_stem.map(|stem| encoded.filename(stem));
    let mut response =
        ([(header::CONTENT_TYPE, encoded.content_type())], encoded.bytes).into_response();

    if let Some(filename) = filename {
        let disposition = format!("attachment; filename=\"{}\"", filename);
        if let Ok(value) = HeaderValue::from_str(&disposition) {
            response
                .headers_mut()
                .insert(header::CONTENT_DISPOSITION, value);
        }
    }
    response
}

/// POST /api/upload - Validate an upload and report its dimensions
pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let image = form.require_image()?;
    let info = validate_upload(&image.bytes, &image.content_type, state.config.max_upload_bytes)?;

    tracing::info!(
        filename = %image.filename,
        size = info.size,
        width = info.width,
        height = info.height,
        "Accepted upload"
    );

    Ok(Json(UploadResponse {
        success: true,
        data: UploadData {
            filename: image.filename.clone(),
            mimetype: info.mime,
            size: info.size,
            dimensions: Dimensions {
                width: info.width,
                height: info.height,
            },
        },
    }))
}

/// POST /api/process - Run the full pipeline and return the encoded photo
pub async fn process(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let bytes = state.accept(&form)?.bytes.clone();
    let request = state.process_request(&form)?;

    let encoded = tokio::task::spawn_blocking(move || export::process(&bytes, &request)).await??;
    Ok(image_response(encoded, Some("processed-image")))
}

/// POST /api/resize-passport - Cover-fit to an exact size, always JPEG
pub async fn resize_passport(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let bytes = state.accept(&form)?.bytes.clone();

    let (Some(width_px), Some(height_px)) = (form.dimension("widthPx"), form.dimension("heightPx"))
    else {
        return Err(ValidationError::new("Width and height are required").into());
    };
    let request = ResizePassportRequest {
        width_px,
        height_px,
        background_color: form.color("backgroundColor")?.unwrap_or(Color::WHITE),
        crop: form.crop(),
        quality: form.quality(state.config.default_quality),
    };

    let encoded =
        tokio::task::spawn_blocking(move || export::resize_passport(&bytes, &request)).await??;
    Ok(image_response(encoded, None))
}

/// POST /api/print-sheet - Tile the passport photo onto a print sheet
pub async fn print_sheet(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let bytes = state.accept(&form)?.bytes.clone();

    let dims = (
        form.dimension("passportWidthPx"),
        form.dimension("passportHeightPx"),
        form.dimension("sheetWidthPx"),
        form.dimension("sheetHeightPx"),
    );
    let (Some(cell_width), Some(cell_height), Some(sheet_width), Some(sheet_height)) = dims else {
        return Err(ValidationError::new("Passport and sheet dimensions are required").into());
    };

    let request = PrintSheetRequest {
        transform: form.transform_spec()?,
        cell_width,
        cell_height,
        sheet_width,
        sheet_height,
        spacing: state.config.layout,
        format: form.format()?,
        quality: form.quality(state.config.default_quality),
    };
    // Reject an infeasible layout before spending time on the upload.
    request.plan()?;

    let encoded =
        tokio::task::spawn_blocking(move || export::print_sheet(&bytes, &request)).await??;
    Ok(image_response(encoded, Some("passport-sheet")))
}

/// POST /api/preview - Debounced, latest-wins preview render
///
/// Answers 204 when a newer preview for the same session arrives first.
pub async fn preview(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let bytes = state.accept(&form)?.bytes.clone();
    let request = state.process_request(&form)?;
    let session = form.text("session").unwrap_or(DEFAULT_SESSION);
    let max_edge = state.config.preview.max_edge;

    let scheduler = state.previews.get(session);
    let outcome = scheduler
        .schedule(move |token| async move {
            tokio::task::spawn_blocking(move || {
                if token.is_cancelled() {
                    return Ok(None);
                }
                export::render_preview(&bytes, &request, max_edge).map(Some)
            })
            .await
        })
        .await;

    match outcome {
        PreviewOutcome::Ready(result) => match result?? {
            Some(encoded) => Ok(image_response(encoded, None)),
            None => Ok(StatusCode::NO_CONTENT.into_response()),
        },
        PreviewOutcome::Superseded => {
            tracing::debug!(session, "Preview superseded");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

/// POST /api/remove-background - Forward the upload to the removal service
///
/// A newer removal request for the same session aborts this one, which then
/// answers 204.
pub async fn remove_background(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let image = state.accept(&form)?;
    let bytes: Bytes = image.bytes.clone();
    let content_type = image.content_type.clone();
    let session = form.text("session").unwrap_or(DEFAULT_SESSION);

    let scheduler = state.previews.get(&format!("{}:background", session));
    let remover = Arc::clone(&state.remover);
    let outcome = scheduler
        .run_latest(move |token| async move { remover.remove(bytes, &content_type, &token).await })
        .await;

    match outcome {
        PreviewOutcome::Ready(result) => {
            let removed = result?;
            let format = ImageFormat::detect(&removed).unwrap_or(ImageFormat::Png);
            Ok(([(header::CONTENT_TYPE, format.content_type())], removed).into_response())
        }
        PreviewOutcome::Superseded => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// GET /api/sizes - Passport sizes, print sheets and background presets
pub async fn sizes() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        passport_sizes: catalog::passport_sizes(),
        print_sheets: catalog::print_sheets(),
        background_colors: catalog::background_colors(),
    })
}

/// GET /health - Health check endpoint
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
