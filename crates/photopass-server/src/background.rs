//! Background removal through an external service.
//!
//! The service receives the raw upload as the request body and must answer
//! with a PNG (or JPEG) whose background pixels are transparent. The call can
//! be slow and is aborted as soon as its cancellation token fires.

use std::time::Duration;

use bytes::Bytes;
use photopass_core::{BackgroundRemovalError, ImageFormat};
use tokio_util::sync::CancellationToken;

use crate::config::BackgroundRemovalConfig;

/// HTTP client for a removal endpoint
#[derive(Debug, Clone)]
pub struct HttpBackgroundRemover {
    client: reqwest::Client,
    url: String,
}

impl HttpBackgroundRemover {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, BackgroundRemovalError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(2)
            .build()
            .map_err(|e| BackgroundRemovalError(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn send(
        &self,
        image: Bytes,
        content_type: &str,
    ) -> Result<Bytes, BackgroundRemovalError> {
        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(image)
            .send()
            .await
            .map_err(|e| BackgroundRemovalError(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackgroundRemovalError(format!(
                "Service returned HTTP {}",
                status.as_u16()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| BackgroundRemovalError(format!("Failed to read response: {}", e)))?;
        if ImageFormat::detect(&body).is_none() {
            return Err(BackgroundRemovalError(
                "Service did not return a JPEG or PNG image".to_string(),
            ));
        }
        Ok(body)
    }
}

/// The configured removal collaborator
#[derive(Debug, Clone)]
pub enum BackgroundRemover {
    Http(HttpBackgroundRemover),
    Disabled,
}

impl BackgroundRemover {
    pub fn from_config(config: &BackgroundRemovalConfig) -> Result<Self, BackgroundRemovalError> {
        match &config.url {
            Some(url) => Ok(Self::Http(HttpBackgroundRemover::new(
                url.clone(),
                Duration::from_secs(config.timeout_secs),
            )?)),
            None => Ok(Self::Disabled),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Http(_))
    }

    /// Remove the background from `image`.
    ///
    /// Returns an error when the service is not configured, fails, or the
    /// token is cancelled before it answers.
    pub async fn remove(
        &self,
        image: Bytes,
        content_type: &str,
        cancel: &CancellationToken,
    ) -> Result<Bytes, BackgroundRemovalError> {
        let remover = match self {
            Self::Http(remover) => remover,
            Self::Disabled => {
                return Err(BackgroundRemovalError(
                    "Background removal is not configured".to_string(),
                ))
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Background removal aborted");
                Err(BackgroundRemovalError("Request was superseded".to_string()))
            }
            result = remover.send(image, content_type) => {
                if let Err(e) = &result {
                    tracing::warn!("Background removal failed: {}", e);
                }
                result
            }
        }
    }
}
