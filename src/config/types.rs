//! Configuration section types.

use super::enums::ColorSpec;
use crate::draw::ShapeKind;
use crate::export::ExportFormat;
use crate::export::file::{DEFAULT_FILENAME_TEMPLATE, default_save_directory};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Export defaults used by the CLI and the editor's export action.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExportConfig {
    /// Output format: "png" or "jpeg"
    #[serde(default)]
    pub format: ExportFormat,

    /// Output resolution multiplier (0.1 - 8.0)
    #[serde(default = "default_export_scale")]
    pub scale: f64,

    /// JPEG quality (1 - 100), ignored for PNG
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Draw the window chrome into exported images when the frame is enabled
    #[serde(default = "default_bake_frame")]
    pub bake_frame: bool,

    /// Directory exports are written to (`~` is expanded)
    #[serde(default = "default_save_directory")]
    pub save_directory: PathBuf,

    /// File name template using chrono format specifiers, without extension
    #[serde(default = "default_filename_template")]
    pub filename_template: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            scale: default_export_scale(),
            jpeg_quality: default_jpeg_quality(),
            bake_frame: default_bake_frame(),
            save_directory: default_save_directory(),
            filename_template: default_filename_template(),
        }
    }
}

/// Defaults for new annotations.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Stroke and mark color: a name, "#rrggbb" or [r, g, b]
    #[serde(default)]
    pub default_color: ColorSpec,

    /// Stroke width in unscaled units (1 - 50)
    #[serde(default = "default_stroke_width")]
    pub default_stroke_width: f64,

    /// Stroke opacity percentage (0 - 100)
    #[serde(default = "default_opacity")]
    pub default_opacity: f64,

    /// Shape tool kind: rectangle, ellipse, line or arrow
    #[serde(default)]
    pub default_shape: ShapeKind,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_color: ColorSpec::default(),
            default_stroke_width: default_stroke_width(),
            default_opacity: default_opacity(),
            default_shape: ShapeKind::default(),
        }
    }
}

/// Font used for mark labels, the frame title and the upload prompt.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TextConfig {
    /// Font family name (e.g., "Sans", "Inter", "Noto Sans")
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Font weight: a name such as "normal" or "bold", or 100 - 900
    #[serde(default = "default_font_weight")]
    pub font_weight: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_weight: default_font_weight(),
        }
    }
}

/// Undo/redo settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HistoryConfig {
    /// Number of undo steps kept (1 - 500)
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: default_history_limit(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_export_scale() -> f64 {
    2.0
}

fn default_jpeg_quality() -> u8 {
    crate::export::DEFAULT_JPEG_QUALITY
}

fn default_bake_frame() -> bool {
    true
}

fn default_filename_template() -> String {
    DEFAULT_FILENAME_TEMPLATE.to_string()
}

fn default_stroke_width() -> f64 {
    4.0
}

fn default_opacity() -> f64 {
    100.0
}

fn default_font_family() -> String {
    "Sans".to_string()
}

fn default_font_weight() -> String {
    "normal".to_string()
}

fn default_history_limit() -> usize {
    100
}
