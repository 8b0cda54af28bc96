//! Layout configuration: magnification, padding, corner rounding, shadow.

use crate::draw::{Color, color::BLACK};
use log::warn;
use serde::{Deserialize, Serialize};

/// Smallest subject magnification the compositor will draw.
pub const MIN_SUBJECT_SCALE: f64 = 0.01;
/// Largest subject magnification the layout panel offers.
pub const MAX_SUBJECT_SCALE: f64 = 5.0;
/// Largest corner radius the layout panel offers.
pub const MAX_ROUNDED: f64 = 50.0;
/// Shadow offsets are limited to this distance on either axis.
pub const MAX_SHADOW_OFFSET: f64 = 50.0;
pub const MAX_SHADOW_BLUR: f64 = 100.0;

/// Placement of the subject within the composition.
///
/// All lengths are unscaled (1×) units; render passes multiply them by the
/// output scale without ever writing the result back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Subject magnification, independent of the export scale.
    pub scale: f64,
    pub padding: Padding,
    /// Corner radius of the subject clip.
    pub rounded: f64,
    pub shadow: ShadowConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            padding: Padding::uniform(64.0),
            rounded: 12.0,
            shadow: ShadowConfig::default(),
        }
    }
}

impl LayoutConfig {
    /// Returns a copy with every value clamped into its drawable range.
    ///
    /// Non-positive magnification becomes [`MIN_SUBJECT_SCALE`]; negative
    /// lengths become zero.
    pub fn sanitized(&self) -> Self {
        let scale = if self.scale.is_finite() && self.scale > 0.0 {
            self.scale.min(MAX_SUBJECT_SCALE).max(MIN_SUBJECT_SCALE)
        } else {
            warn!(
                "Invalid layout scale {}, clamping to {}",
                self.scale, MIN_SUBJECT_SCALE
            );
            MIN_SUBJECT_SCALE
        };

        Self {
            scale,
            padding: self.padding.sanitized(),
            rounded: non_negative(self.rounded).min(MAX_ROUNDED),
            shadow: self.shadow.sanitized(),
        }
    }
}

/// Space around the subject.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn sanitized(&self) -> Self {
        Self {
            top: non_negative(self.top),
            right: non_negative(self.right),
            bottom: non_negative(self.bottom),
            left: non_negative(self.left),
        }
    }
}

/// Drop shadow cast by the rounded subject silhouette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    pub enabled: bool,
    /// Horizontal offset.
    pub x: f64,
    /// Vertical offset.
    pub y: f64,
    /// Blur radius; the gaussian sigma is half of it.
    pub blur: f64,
    /// Grows the caster outline on every side.
    pub spread: f64,
    pub color: Color,
    /// Percentage, 0-100.
    pub opacity: f64,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            x: 0.0,
            y: 20.0,
            blur: 40.0,
            spread: 0.0,
            color: BLACK,
            opacity: 35.0,
        }
    }
}

impl ShadowConfig {
    pub fn sanitized(&self) -> Self {
        Self {
            enabled: self.enabled,
            x: finite_or_zero(self.x).clamp(-MAX_SHADOW_OFFSET, MAX_SHADOW_OFFSET),
            y: finite_or_zero(self.y).clamp(-MAX_SHADOW_OFFSET, MAX_SHADOW_OFFSET),
            blur: non_negative(self.blur).min(MAX_SHADOW_BLUR),
            spread: non_negative(self.spread),
            color: self.color,
            opacity: if self.opacity.is_finite() {
                self.opacity.clamp(0.0, 100.0)
            } else {
                0.0
            },
        }
    }

    /// Whether the shadow would leave any visible pixels.
    pub fn is_visible(&self) -> bool {
        self.enabled && self.opacity > 0.0 && self.color.a > 0.0
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
