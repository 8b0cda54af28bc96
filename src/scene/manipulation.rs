//! Flip, position and crop state of the subject.

use crate::draw::geometry::Point;
use log::warn;
use serde::{Deserialize, Serialize};

/// Distance in unscaled units between neighbouring position presets.
pub const POSITION_PRESET_STEP: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageManipulation {
    pub flip_h: bool,
    pub flip_v: bool,
    /// Offset added after centering, in unscaled units.
    pub position: Point,
    /// Region of the source image, in source pixels, to use as the subject.
    pub crop: Option<CropRect>,
}

impl ImageManipulation {
    pub fn with_position_preset(self, preset: PositionPreset) -> Self {
        Self {
            position: preset.offset(),
            ..self
        }
    }

    /// Position offset with non-finite components replaced by zero.
    pub fn sanitized_position(&self) -> Point {
        let Point { x, y } = self.position;
        if x.is_finite() && y.is_finite() {
            return self.position;
        }
        warn!("Invalid subject position ({x}, {y}), using zero for non-finite parts");
        let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
        Point::new(finite(x), finite(y))
    }
}

/// Rectangle in source image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Nine-grid shortcuts for [`ImageManipulation::position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PositionPreset {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    Center,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl PositionPreset {
    pub const ALL: [PositionPreset; 9] = [
        PositionPreset::TopLeft,
        PositionPreset::TopCenter,
        PositionPreset::TopRight,
        PositionPreset::MiddleLeft,
        PositionPreset::Center,
        PositionPreset::MiddleRight,
        PositionPreset::BottomLeft,
        PositionPreset::BottomCenter,
        PositionPreset::BottomRight,
    ];

    /// Grid cell as (column, row), each in -1..=1.
    fn cell(self) -> (i8, i8) {
        match self {
            PositionPreset::TopLeft => (-1, -1),
            PositionPreset::TopCenter => (0, -1),
            PositionPreset::TopRight => (1, -1),
            PositionPreset::MiddleLeft => (-1, 0),
            PositionPreset::Center => (0, 0),
            PositionPreset::MiddleRight => (1, 0),
            PositionPreset::BottomLeft => (-1, 1),
            PositionPreset::BottomCenter => (0, 1),
            PositionPreset::BottomRight => (1, 1),
        }
    }

    pub fn offset(self) -> Point {
        let (col, row) = self.cell();
        Point::new(
            col as f64 * POSITION_PRESET_STEP,
            row as f64 * POSITION_PRESET_STEP,
        )
    }

    /// The preset whose offset equals `position`, if any.
    pub fn matching(position: Point) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.offset() == position)
    }
}
