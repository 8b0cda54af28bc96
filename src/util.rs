//! Utility functions for colors, geometry, and arrowhead calculations.
//!
//! This module provides:
//! - Color name lookup used by configuration and scene files
//! - Arrowhead geometry calculations
//! - Integer rectangle helper used for annotation hit-testing

use crate::draw::{Color, color::*};

// ============================================================================
// Arrowhead Geometry
// ============================================================================

/// Calculates arrowhead points with custom length and angle.
///
/// Creates a V-shaped arrowhead at the tip `(x1, y1)` pointing in the direction
/// from the tail `(x2, y2)` to the tip. The arrowhead length is capped at
/// 30% of the line length to prevent weird-looking arrows on short lines.
///
/// # Arguments
/// * `x1` - Arrowhead tip X coordinate
/// * `y1` - Arrowhead tip Y coordinate
/// * `x2` - Arrow tail X coordinate
/// * `y2` - Arrow tail Y coordinate
/// * `length` - Desired arrowhead length (will be capped at 30% of line length)
/// * `angle_degrees` - Angle between arrowhead lines and main line
///
/// # Returns
/// Array of two points `[(left_x, left_y), (right_x, right_y)]` for the arrowhead lines.
/// If the line is too short (< 1 unit), both points equal the tip.
pub fn calculate_arrowhead(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    length: f64,
    angle_degrees: f64,
) -> [(f64, f64); 2] {
    let dx = x1 - x2;
    let dy = y1 - y2;
    let line_length = (dx * dx + dy * dy).sqrt();

    if line_length < 1.0 {
        return [(x1, y1), (x1, y1)];
    }

    // Unit vector pointing from tail to tip
    let ux = dx / line_length;
    let uy = dy / line_length;

    let arrow_length = length.min(line_length * 0.3);

    let angle = angle_degrees.to_radians();
    let cos_a = angle.cos();
    let sin_a = angle.sin();

    let left_x = x1 - arrow_length * (ux * cos_a - uy * sin_a);
    let left_y = y1 - arrow_length * (uy * cos_a + ux * sin_a);

    let right_x = x1 - arrow_length * (ux * cos_a + uy * sin_a);
    let right_y = y1 - arrow_length * (uy * cos_a - ux * sin_a);

    [(left_x, left_y), (right_x, right_y)]
}

// ============================================================================
// Color Mapping
// ============================================================================

/// Maps color name strings to Color values.
///
/// Used when parsing colors from the config file and scene files.
///
/// # Supported Names (case-insensitive)
/// - "red", "green", "blue", "yellow", "orange", "pink", "white", "black", "transparent"
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.trim().to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "pink" => Some(PINK),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        "transparent" => Some(TRANSPARENT),
        _ => None,
    }
}

// ============================================================================
// Geometry Utilities
// ============================================================================

/// Axis-aligned integer rectangle used for annotation bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle. Width/height must be positive.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            None
        } else {
            Some(Self {
                x,
                y,
                width,
                height,
            })
        }
    }

    /// Builds a rectangle from min/max bounds (inclusive min, exclusive max).
    pub fn from_min_max(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Option<Self> {
        Self::new(min_x, min_y, max_x.checked_sub(min_x)?, max_y.checked_sub(min_y)?)
    }

    /// Returns true if the point lies inside the rectangle.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x as f64
            && y >= self.y as f64
            && x < self.x as f64 + self.width as f64
            && y < self.y as f64 + self.height as f64
    }
}
