//! Configuration file support for beautyshot.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/beautyshot/config.toml`. Settings include export defaults,
//! annotation defaults, the label font and the undo history depth.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

pub use enums::ColorSpec;
pub use types::{DrawingConfig, ExportConfig, HistoryConfig, TextConfig};

use crate::draw::{FontDescriptor, StrokeStyle};
use crate::export::ExportSettings;
use crate::export::file::{FileSaveConfig, expand_tilde};
use crate::pipeline::RenderOptions;
use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [export]
/// format = "png"
/// scale = 2.0
/// bake_frame = true
///
/// [drawing]
/// default_color = "#ef4444"
/// default_stroke_width = 4.0
/// default_shape = "arrow"
///
/// [text]
/// font_family = "Sans"
///
/// [history]
/// limit = 100
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Export format, scale and file naming
    #[serde(default)]
    pub export: ExportConfig,

    /// Annotation defaults (color, width, opacity, shape)
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Font for mark labels and the frame title
    #[serde(default)]
    pub text: TextConfig,

    /// Undo/redo depth
    #[serde(default)]
    pub history: HistoryConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value (or reset to their
    /// default when not a number) and a warning is logged.
    ///
    /// Validated ranges:
    /// - `export.scale`: 0.1 - 8.0
    /// - `export.jpeg_quality`: 1 - 100
    /// - `drawing.default_stroke_width`: 1.0 - 50.0
    /// - `drawing.default_opacity`: 0.0 - 100.0
    /// - `history.limit`: 1 - 500
    pub fn validate_and_clamp(&mut self) {
        let defaults = Config::default();

        if !self.export.scale.is_finite() {
            log::warn!(
                "Invalid export scale {}, using {:.1}",
                self.export.scale,
                defaults.export.scale
            );
            self.export.scale = defaults.export.scale;
        } else if !(0.1..=8.0).contains(&self.export.scale) {
            log::warn!(
                "Invalid export scale {:.2}, clamping to 0.1-8.0 range",
                self.export.scale
            );
            self.export.scale = self.export.scale.clamp(0.1, 8.0);
        }

        if !(1..=100).contains(&self.export.jpeg_quality) {
            log::warn!(
                "Invalid jpeg_quality {}, clamping to 1-100 range",
                self.export.jpeg_quality
            );
            self.export.jpeg_quality = self.export.jpeg_quality.clamp(1, 100);
        }

        if self.export.filename_template.trim().is_empty() {
            log::warn!(
                "Empty filename_template, using '{}'",
                defaults.export.filename_template
            );
            self.export.filename_template = defaults.export.filename_template;
        }

        if !self.drawing.default_stroke_width.is_finite() {
            log::warn!("Invalid default_stroke_width, using default");
            self.drawing.default_stroke_width = defaults.drawing.default_stroke_width;
        } else if !(1.0..=50.0).contains(&self.drawing.default_stroke_width) {
            log::warn!(
                "Invalid default_stroke_width {:.1}, clamping to 1.0-50.0 range",
                self.drawing.default_stroke_width
            );
            self.drawing.default_stroke_width = self.drawing.default_stroke_width.clamp(1.0, 50.0);
        }

        if !self.drawing.default_opacity.is_finite() {
            log::warn!("Invalid default_opacity, using default");
            self.drawing.default_opacity = defaults.drawing.default_opacity;
        } else if !(0.0..=100.0).contains(&self.drawing.default_opacity) {
            log::warn!(
                "Invalid default_opacity {:.1}, clamping to 0-100 range",
                self.drawing.default_opacity
            );
            self.drawing.default_opacity = self.drawing.default_opacity.clamp(0.0, 100.0);
        }

        if !self.drawing.default_color.is_valid() {
            log::warn!(
                "Invalid default_color {:?}, falling back to red",
                self.drawing.default_color
            );
            self.drawing.default_color = ColorSpec::default();
        }

        // Validate font weight is reasonable
        let valid_weight = matches!(
            self.text.font_weight.to_lowercase().as_str(),
            "normal" | "bold" | "light" | "ultralight" | "medium" | "semibold" | "heavy"
                | "ultrabold"
        ) || self
            .text
            .font_weight
            .parse::<u32>()
            .is_ok_and(|w| (100..=900).contains(&w));

        if !valid_weight {
            log::warn!(
                "Invalid font_weight '{}', falling back to 'normal'",
                self.text.font_weight
            );
            self.text.font_weight = defaults.text.font_weight;
        }

        if self.text.font_family.trim().is_empty() {
            log::warn!("Empty font_family, falling back to 'Sans'");
            self.text.font_family = defaults.text.font_family;
        }

        if !(1..=500).contains(&self.history.limit) {
            log::warn!(
                "Invalid history limit {}, clamping to 1-500 range",
                self.history.limit
            );
            self.history.limit = self.history.limit.clamp(1, 500);
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/beautyshot/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("beautyshot");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from file, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Loads configuration from an explicit path; a missing file yields defaults.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Saves the current configuration to `~/.config/beautyshot/config.toml`.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    /// Saves the configuration as TOML to `config_path`.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Creates a default configuration file with documentation comments.
    ///
    /// Writes the example config from `config.example.toml` to the user's config directory.
    ///
    /// # Errors
    /// Returns an error if:
    /// - A config file already exists at the target path
    /// - The config directory cannot be created
    /// - The file cannot be written
    pub fn create_default_file() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&config_path, Self::example_toml())?;

        info!("Created default config at {}", config_path.display());
        Ok(config_path)
    }

    /// The documented example configuration shipped with the crate.
    pub fn example_toml() -> &'static str {
        include_str!("../../config.example.toml")
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Stroke style new strokes and shapes start with.
    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle::new(
            self.drawing.default_color.to_color(),
            self.drawing.default_stroke_width,
            self.drawing.default_opacity,
        )
    }

    pub fn font(&self) -> FontDescriptor {
        FontDescriptor::new(
            self.text.font_family.clone(),
            self.text.font_weight.clone(),
            "normal".to_string(),
        )
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            bake_frame: self.export.bake_frame,
            font: self.font(),
        }
    }

    pub fn export_settings(&self) -> ExportSettings {
        ExportSettings {
            format: self.export.format,
            scale: self.export.scale,
            jpeg_quality: self.export.jpeg_quality,
            render: self.render_options(),
        }
    }

    /// Save location with `~` expanded.
    pub fn file_save_config(&self) -> FileSaveConfig {
        let save_directory = match self.export.save_directory.to_str() {
            Some(raw) => expand_tilde(raw),
            None => self.export.save_directory.clone(),
        };
        FileSaveConfig {
            save_directory,
            filename_template: self.export.filename_template.clone(),
            format: self.export.format,
        }
    }
}
