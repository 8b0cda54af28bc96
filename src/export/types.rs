//! Data types for image export.

use crate::pipeline::{RenderError, RenderOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Quality used for JPEG output unless configured otherwise.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Encoded output format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Lossless, keeps transparency.
    #[default]
    Png,
    /// Lossy, flattened onto white.
    #[serde(alias = "jpg")]
    #[value(alias = "jpg")]
    Jpeg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }

    /// Guesses the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ExportFormat::Png),
            "jpg" | "jpeg" => Some(ExportFormat::Jpeg),
            _ => None,
        }
    }
}

/// Everything an export needs besides the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    pub format: ExportFormat,
    /// Output resolution multiplier.
    pub scale: f64,
    /// JPEG quality, 1-100. Ignored for PNG.
    pub jpeg_quality: u8,
    pub render: RenderOptions,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            scale: 1.0,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            render: RenderOptions::default(),
        }
    }
}

/// Result of a finished export.
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// Encoded image bytes.
    pub data: Vec<u8>,
    pub format: ExportFormat,
    /// Path the image was written to, if it was saved.
    pub saved_path: Option<PathBuf>,
}

/// Outcome of an export request handled by the export manager.
#[derive(Debug, Clone)]
pub enum ExportOutcome {
    Success(ExportResult),
    Failed(String),
}

/// Errors that can occur while exporting.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Render failed: {0}")]
    Render(#[from] RenderError),

    #[error("Image encoding failed: {0}")]
    Encode(String),

    #[error("Failed to save image: {0}")]
    Save(#[from] std::io::Error),

    #[error("Export task failed: {0}")]
    Task(String),
}

/// Status of the export manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    /// No export has been requested yet.
    Idle,
    InProgress,
    Success,
    Failed(String),
}
