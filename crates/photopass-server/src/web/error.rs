//! API error responses.
//!
//! Every failure is answered with `{ "error": "<message>" }` and a status
//! that tells the client whether retrying with other input can help.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use photopass_core::{BackgroundRemovalError, Error as CoreError, UploadError, ValidationError};
use serde::Serialize;
use thiserror::Error;

/// Errors returned by route handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid multipart request: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Core(err.into())
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        ApiError::Core(err.into())
    }
}

impl From<BackgroundRemovalError> for ApiError {
    fn from(err: BackgroundRemovalError) -> Self {
        ApiError::Core(err.into())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Image worker failed: {}", err))
    }
}

/// Error body sent to clients
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Core(err) => match err {
                CoreError::Validation(_)
                | CoreError::InfeasibleLayout(_)
                | CoreError::UnsupportedFormat(_)
                | CoreError::Decode(_)
                | CoreError::Upload(UploadError::Empty) => StatusCode::BAD_REQUEST,
                CoreError::Upload(UploadError::UnsupportedType(_)) => {
                    StatusCode::UNSUPPORTED_MEDIA_TYPE
                }
                CoreError::Upload(UploadError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
                CoreError::BackgroundRemoval(_) => StatusCode::BAD_GATEWAY,
                CoreError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Multipart(err) => err.status(),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", self);
        } else {
            tracing::warn!(status = status.as_u16(), "{}", self);
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
