//! HTTP service for passport photo export.
//!
//! Wraps the `photopass-core` pipeline in multipart endpoints for
//! processing, passport resizing, print sheets and debounced previews, with
//! optional background removal through an external service.

pub mod background;
pub mod config;
pub mod preview;
pub mod web;

pub use config::{Config, ConfigError, DEFAULT_CONFIG_PATH};
pub use web::{router, AppState, WebServer, WebError};
