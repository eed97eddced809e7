//! Configuration management for the photopass server.
//!
//! Handles loading, saving, and validating configuration from JSON files.

use std::path::Path;

use photopass_core::intake::MAX_UPLOAD_BYTES;
use photopass_core::{check_canvas, LayoutSpacing};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Debounced preview rendering
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreviewConfig {
    /// Quiet period after the last change before a preview renders
    pub debounce_ms: u64,
    /// Long edge of the downscaled preview source
    pub max_edge: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            max_edge: 1024,
        }
    }
}

/// External background removal service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackgroundRemovalConfig {
    /// Endpoint that takes an image and returns a PNG with a transparent
    /// background. Removal is disabled when unset.
    pub url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for BackgroundRemovalConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: 60,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,
    /// Upload size limit in bytes
    pub max_upload_bytes: usize,
    /// JPEG quality when a request omits it
    pub default_quality: u8,
    /// Print sheet margin and spacing
    pub layout: LayoutSpacing,
    pub preview: PreviewConfig,
    pub background_removal: BackgroundRemovalConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            default_quality: photopass_core::encode::DEFAULT_QUALITY,
            layout: LayoutSpacing::default(),
            preview: PreviewConfig::default(),
            background_removal: BackgroundRemovalConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file. A missing file yields defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::ValidationError("Port must be non-zero".to_string()));
        }
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Bind address must not be empty".to_string(),
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "Upload limit must be non-zero".to_string(),
            ));
        }
        if !(1..=100).contains(&self.default_quality) {
            return Err(ConfigError::ValidationError(format!(
                "Default quality {} must be between 1 and 100",
                self.default_quality
            )));
        }
        if self.preview.max_edge < 16 {
            return Err(ConfigError::ValidationError(format!(
                "Preview edge {} must be at least 16 pixels",
                self.preview.max_edge
            )));
        }
        check_canvas(self.preview.max_edge, self.preview.max_edge)
            .map_err(|e| ConfigError::ValidationError(format!("Preview edge: {}", e)))?;
        if self.background_removal.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "Background removal timeout must be non-zero".to_string(),
            ));
        }
        if let Some(url) = &self.background_removal.url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::ValidationError(format!(
                    "Background removal URL '{}' must be http or https",
                    url
                )));
            }
        }
        Ok(())
    }
}
