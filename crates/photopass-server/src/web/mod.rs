//! HTTP server for the photo API.
//!
//! Provides an Axum router over the export pipeline plus graceful shutdown.

pub mod error;
pub mod form;
pub mod routes;

use std::net::SocketAddr;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::Config;
use photopass_core::BackgroundRemovalError;
pub use routes::AppState;

/// Room for the multipart framing and text fields around the image.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Web server errors
#[derive(Error, Debug)]
pub enum WebError {
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),

    #[error("Invalid bind address: {0}")]
    AddressError(#[from] std::net::AddrParseError),

    #[error(transparent)]
    Setup(#[from] BackgroundRemovalError),

    #[error("Server error: {0}")]
    ServerError(String),
}

/// Build the router with all routes
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/api/upload", post(routes::upload))
        .route("/api/process", post(routes::process))
        .route("/api/resize-passport", post(routes::resize_passport))
        .route("/api/print-sheet", post(routes::print_sheet))
        .route("/api/preview", post(routes::preview))
        .route("/api/remove-background", post(routes::remove_background))
        .route("/api/sizes", get(routes::sizes))
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

pub struct WebServer {
    state: AppState,
}

impl WebServer {
    pub fn new(config: Config) -> Result<Self, WebError> {
        Ok(Self {
            state: AppState::new(config)?,
        })
    }

    fn address(&self) -> Result<SocketAddr, WebError> {
        let config = &self.state.config;
        Ok(format!("{}:{}", config.bind_address, config.port).parse()?)
    }

    /// Run the web server until `shutdown` resolves, then drain open requests.
    pub async fn run_with_shutdown<F>(&self, shutdown: F) -> Result<(), WebError>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = self.address()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Web server listening on http://{}", addr);
        if !self.state.remover.is_enabled() {
            tracing::info!("Background removal is disabled");
        }

        axum::serve(listener, router(self.state.clone()))
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("Web server shutting down gracefully");
            })
            .await
            .map_err(|e| WebError::ServerError(e.to_string()))
    }
}
