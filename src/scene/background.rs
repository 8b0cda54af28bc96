//! Background configuration and presets.

use crate::draw::Color;
use serde::{Deserialize, Serialize};

/// Fill used behind the subject.
///
/// Color lists are stored as vectors so that configurations read from scene
/// files keep their original arity; the background renderer refuses gradients
/// with the wrong number of stops instead of indexing out of bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackgroundConfig {
    /// Uniform color fill.
    Solid { color: Color },
    /// Two-stop linear or radial gradient.
    Gradient {
        colors: Vec<Color>,
        #[serde(default)]
        direction: GradientDirection,
        /// Degrees, 0 = left to right, growing clockwise.
        #[serde(default)]
        angle: f64,
    },
    /// Three-stop linear gradient with stops at 0, 0.5 and 1.
    Cosmic {
        colors: Vec<Color>,
        #[serde(default)]
        angle: f64,
    },
    /// Wallpaper-style background; rendered as a flat placeholder.
    Desktop {
        #[serde(default)]
        style: DesktopStyle,
        #[serde(default)]
        blur: bool,
    },
    /// Single color with a percentage opacity (0-100).
    Custom { color: Color, opacity: f64 },
    /// Any tag this version does not know; rendered as solid white.
    #[serde(other)]
    Unknown,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        GRADIENT_PRESETS[0].to_config()
    }
}

/// Gradient geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientDirection {
    #[default]
    Linear,
    Radial,
}

/// Wallpaper family for the desktop background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesktopStyle {
    #[default]
    Macos,
    Windows,
    Linux,
}

/// Named two-color gradient.
pub struct GradientPreset {
    pub name: &'static str,
    pub colors: [&'static str; 2],
}

impl GradientPreset {
    pub fn to_config(&self) -> BackgroundConfig {
        BackgroundConfig::Gradient {
            colors: parse_preset_colors(&self.colors),
            direction: GradientDirection::Linear,
            angle: PRESET_ANGLE,
        }
    }
}

/// Named three-color cosmic gradient.
pub struct CosmicPreset {
    pub name: &'static str,
    pub colors: [&'static str; 3],
}

impl CosmicPreset {
    pub fn to_config(&self) -> BackgroundConfig {
        BackgroundConfig::Cosmic {
            colors: parse_preset_colors(&self.colors),
            angle: PRESET_ANGLE,
        }
    }
}

const PRESET_ANGLE: f64 = 135.0;

/// Swatches offered for solid backgrounds.
pub const SOLID_PRESETS: [&str; 10] = [
    "#ffffff", "#000000", "#f3f4f6", "#1f2937", "#ef4444", "#f59e0b", "#10b981", "#3b82f6",
    "#8b5cf6", "#ec4899",
];

pub const GRADIENT_PRESETS: [GradientPreset; 4] = [
    GradientPreset {
        name: "purple",
        colors: ["#667eea", "#764ba2"],
    },
    GradientPreset {
        name: "blue",
        colors: ["#2193b0", "#6dd5ed"],
    },
    GradientPreset {
        name: "pink",
        colors: ["#ee0979", "#ff6a00"],
    },
    GradientPreset {
        name: "green",
        colors: ["#11998e", "#38ef7d"],
    },
];

pub const COSMIC_PRESETS: [CosmicPreset; 3] = [
    CosmicPreset {
        name: "nebula",
        colors: ["#0f0c29", "#302b63", "#24243e"],
    },
    CosmicPreset {
        name: "space",
        colors: ["#000000", "#1a1a2e", "#16213e"],
    },
    CosmicPreset {
        name: "galaxy",
        colors: ["#1e3c72", "#2a5298", "#7e8ba3"],
    },
];

fn parse_preset_colors(hex: &[&str]) -> Vec<Color> {
    hex.iter().filter_map(|h| Color::from_hex(h)).collect()
}

impl BackgroundConfig {
    /// Looks up a preset by name: a gradient or cosmic preset name, or a
    /// solid swatch given as its hex value.
    pub fn preset(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        if let Some(preset) = GRADIENT_PRESETS.iter().find(|p| p.name == name) {
            return Some(preset.to_config());
        }
        if let Some(preset) = COSMIC_PRESETS.iter().find(|p| p.name == name) {
            return Some(preset.to_config());
        }
        SOLID_PRESETS
            .iter()
            .find(|hex| hex.trim_start_matches('#') == name.trim_start_matches('#'))
            .and_then(|hex| Color::from_hex(hex))
            .map(|color| BackgroundConfig::Solid { color })
    }

    /// Names accepted by [`BackgroundConfig::preset`] besides solid swatches.
    pub fn preset_names() -> impl Iterator<Item = &'static str> {
        GRADIENT_PRESETS
            .iter()
            .map(|p| p.name)
            .chain(COSMIC_PRESETS.iter().map(|p| p.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_have_expected_arity() {
        for preset in &GRADIENT_PRESETS {
            match preset.to_config() {
                BackgroundConfig::Gradient { colors, .. } => assert_eq!(colors.len(), 2),
                other => panic!("unexpected {other:?}"),
            }
        }
        for preset in &COSMIC_PRESETS {
            match preset.to_config() {
                BackgroundConfig::Cosmic { colors, .. } => assert_eq!(colors.len(), 3),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn preset_lookup_by_name_and_hex() {
        assert!(matches!(
            BackgroundConfig::preset("Nebula"),
            Some(BackgroundConfig::Cosmic { .. })
        ));
        assert!(matches!(
            BackgroundConfig::preset("#3b82f6"),
            Some(BackgroundConfig::Solid { .. })
        ));
        assert!(BackgroundConfig::preset("plaid").is_none());
    }

    #[test]
    fn unknown_tag_deserializes_to_unknown() {
        let config: BackgroundConfig = toml::from_str("type = \"plasma\"").unwrap();
        assert_eq!(config, BackgroundConfig::Unknown);
    }

    #[test]
    fn gradient_reads_from_toml() {
        let config: BackgroundConfig = toml::from_str(
            "type = \"gradient\"\ncolors = [\"#667eea\", \"#764ba2\"]\ndirection = \"radial\"\nangle = 45",
        )
        .unwrap();
        match config {
            BackgroundConfig::Gradient {
                colors,
                direction,
                angle,
            } => {
                assert_eq!(colors.len(), 2);
                assert_eq!(direction, GradientDirection::Radial);
                assert_eq!(angle, 45.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
