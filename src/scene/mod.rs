//! Render input: one immutable snapshot of everything a render pass draws.
//!
//! The editing layer owns a [`RenderSnapshot`] and replaces slices of it
//! wholesale; renderers only ever receive it by shared reference. The
//! serialisable part (everything but the subject pixels) can be stored as a
//! scene file in TOML or JSON.

pub mod background;
pub mod frame;
pub mod layout;
pub mod manipulation;
pub mod subject;

pub use background::{BackgroundConfig, DesktopStyle, GradientDirection};
pub use frame::{FrameConfig, FrameTheme, TITLE_BAR_HEIGHT};
pub use layout::{LayoutConfig, Padding, ShadowConfig};
pub use manipulation::{CropRect, ImageManipulation, PositionPreset};
pub use subject::SubjectImage;

use crate::draw::Annotation;
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSnapshot {
    /// Decoded subject; never part of a scene file.
    #[serde(skip)]
    pub subject: Option<SubjectImage>,
    pub background: BackgroundConfig,
    pub layout: LayoutConfig,
    pub manipulation: ImageManipulation,
    pub frame: FrameConfig,
    /// Drawn in list order, later entries on top.
    pub annotations: Vec<Annotation>,
}

/// On-disk encoding of a scene file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneFormat {
    Toml,
    Json,
}

impl SceneFormat {
    /// Picks the encoding from the file extension; anything but `.json` is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SceneFormat::Json,
            _ => SceneFormat::Toml,
        }
    }
}

impl RenderSnapshot {
    pub fn with_subject(mut self, subject: SubjectImage) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Parses a scene in the given format. The subject is always `None`.
    pub fn from_scene_str(text: &str, format: SceneFormat) -> Result<Self> {
        let snapshot = match format {
            SceneFormat::Toml => toml::from_str(text).context("Failed to parse scene TOML")?,
            SceneFormat::Json => {
                serde_json::from_str(text).context("Failed to parse scene JSON")?
            }
        };
        Ok(snapshot)
    }

    pub fn to_scene_string(&self, format: SceneFormat) -> Result<String> {
        let text = match format {
            SceneFormat::Toml => {
                toml::to_string_pretty(self).context("Failed to serialize scene to TOML")?
            }
            SceneFormat::Json => {
                serde_json::to_string_pretty(self).context("Failed to serialize scene to JSON")?
            }
        };
        Ok(text)
    }

    /// Loads a scene file, choosing the format from its extension.
    pub fn load_scene(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file {}", path.display()))?;
        let snapshot = Self::from_scene_str(&text, SceneFormat::from_path(path))
            .with_context(|| format!("Invalid scene file {}", path.display()))?;
        debug!(
            "Loaded scene from {} ({} annotations)",
            path.display(),
            snapshot.annotations.len()
        );
        Ok(snapshot)
    }

    pub fn save_scene(&self, path: &Path) -> Result<()> {
        let text = self.to_scene_string(SceneFormat::from_path(path))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, text)
            .with_context(|| format!("Failed to write scene file {}", path.display()))?;
        debug!("Saved scene to {}", path.display());
        Ok(())
    }
}
