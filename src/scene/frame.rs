//! Window-chrome frame configuration.

use serde::{Deserialize, Serialize};

/// Height of the title bar reserved above the subject, in unscaled units.
pub const TITLE_BAR_HEIGHT: f64 = 28.0;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub enabled: bool,
    pub theme: FrameTheme,
    pub title: Option<String>,
}

impl FrameConfig {
    /// Vertical space the frame reserves above the subject.
    pub fn reserved_height(&self) -> f64 {
        if self.enabled { TITLE_BAR_HEIGHT } else { 0.0 }
    }

    /// Title text, if there is any to draw.
    pub fn visible_title(&self) -> Option<&str> {
        self.title.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameTheme {
    #[default]
    Dark,
    Light,
}
