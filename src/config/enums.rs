//! Configuration enum types.

use crate::draw::{Color, color::*};
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Color specification - a named color, a hex string, or RGB values.
///
/// # Examples
/// ```toml
/// # Named color
/// default_color = "red"
///
/// # Hex color
/// default_color = "#3b82f6"
///
/// # Custom RGB color (0-255 per component)
/// default_color = [255, 128, 0]  # Orange
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color (red, green, blue, yellow, orange, pink, white, black) or `#rrggbb`
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl Default for ColorSpec {
    fn default() -> Self {
        ColorSpec::Name("red".to_string())
    }
}

impl ColorSpec {
    /// Converts the color specification to a [`Color`] struct.
    ///
    /// Strings starting with `#` are parsed as hex, anything else goes through
    /// `util::name_to_color()`. Unknown values default to red with a warning.
    pub fn to_color(&self) -> Color {
        match self {
            ColorSpec::Name(name) if name.trim_start().starts_with('#') => {
                Color::from_hex(name.trim()).unwrap_or_else(|| {
                    warn!("Invalid hex color '{}', using red", name);
                    RED
                })
            }
            ColorSpec::Name(name) => crate::util::name_to_color(name).unwrap_or_else(|| {
                warn!("Unknown color '{}', using red", name);
                RED
            }),
            ColorSpec::Rgb([r, g, b]) => Color::from_rgb8(*r, *g, *b),
        }
    }

    /// Whether [`to_color`](Self::to_color) would have to fall back.
    pub fn is_valid(&self) -> bool {
        match self {
            ColorSpec::Name(name) if name.trim_start().starts_with('#') => {
                Color::from_hex(name.trim()).is_some()
            }
            ColorSpec::Name(name) => crate::util::name_to_color(name).is_some(),
            ColorSpec::Rgb(_) => true,
        }
    }
}
