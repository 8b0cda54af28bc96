//! Annotation definitions: strokes, shapes and numbered marks.

use super::color::{Color, RED};
use super::geometry::Point;
use crate::util::{self, Rect};
use serde::{Deserialize, Serialize};

/// Radius of a mark circle in unscaled units.
pub const MARK_RADIUS: f64 = 12.0;
/// Size of a mark label in unscaled units.
pub const MARK_FONT_SIZE: f64 = 12.0;
/// Arrowhead length in unscaled units.
pub const ARROW_HEAD_LENGTH: f64 = 20.0;
/// Angle between the arrowhead wings and the shaft.
pub const ARROW_HEAD_ANGLE: f64 = 30.0;

/// Something drawn on top of the composited subject.
///
/// Coordinates are unscaled units relative to the subject anchor origin, so
/// annotations stay attached to the subject at every output scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Annotation {
    /// Freehand polyline through the pointer drag points.
    Stroke {
        points: Vec<Point>,
        style: StrokeStyle,
    },
    /// Outline shape spanning a drag from `(x, y)` to `(x + width, y + height)`.
    ///
    /// Rectangles and ellipses are stored normalised; lines and arrows keep the
    /// signed extent so the arrowhead lands on the drag end point.
    Shape {
        shape: ShapeKind,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        style: StrokeStyle,
    },
    /// Numbered callout circle.
    Mark {
        x: f64,
        y: f64,
        /// Assigned once at creation, never reused.
        label: u32,
        #[serde(default = "default_mark_color")]
        color: Color,
    },
}

fn default_mark_color() -> Color {
    RED
}

/// Outline shapes available to the shape tool.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    #[serde(alias = "circle")]
    Ellipse,
    Line,
    Arrow,
}

impl ShapeKind {
    /// Whether the stored extent is normalised to be non-negative.
    pub fn is_boxed(self) -> bool {
        matches!(self, ShapeKind::Rectangle | ShapeKind::Ellipse)
    }
}

/// Stroke appearance shared by strokes and shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Color,
    /// Line width in unscaled units.
    pub width: f64,
    /// Percentage, 0-100.
    pub opacity: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: RED,
            width: 4.0,
            opacity: 100.0,
        }
    }
}

impl StrokeStyle {
    pub const fn new(color: Color, width: f64, opacity: f64) -> Self {
        Self {
            color,
            width,
            opacity,
        }
    }

    /// Color with the opacity percentage folded into its alpha.
    pub fn effective_color(&self) -> Color {
        self.color.with_opacity_percent(self.opacity)
    }
}

impl Annotation {
    pub fn stroke(points: Vec<Point>, style: StrokeStyle) -> Self {
        Annotation::Stroke { points, style }
    }

    /// Builds a shape from a drag between `start` and `end`.
    pub fn shape(kind: ShapeKind, start: Point, end: Point, style: StrokeStyle) -> Self {
        let (x, y, width, height) = if kind.is_boxed() {
            (
                start.x.min(end.x),
                start.y.min(end.y),
                (end.x - start.x).abs(),
                (end.y - start.y).abs(),
            )
        } else {
            (start.x, start.y, end.x - start.x, end.y - start.y)
        };
        Annotation::Shape {
            shape: kind,
            x,
            y,
            width,
            height,
            style,
        }
    }

    pub fn mark(at: Point, label: u32, color: Color) -> Self {
        Annotation::Mark {
            x: at.x,
            y: at.y,
            label,
            color,
        }
    }

    /// Label of a mark, `None` for other annotations.
    pub fn mark_label(&self) -> Option<u32> {
        match self {
            Annotation::Mark { label, .. } => Some(*label),
            _ => None,
        }
    }

    /// Axis-aligned bounds in annotation units, expanded to cover the stroke.
    ///
    /// Returns `None` for annotations with nothing to draw, such as a stroke
    /// without points.
    pub fn bounding_box(&self) -> Option<Rect> {
        match self {
            Annotation::Stroke { points, style } => bounding_box_for_points(points, style.width),
            Annotation::Shape {
                shape: ShapeKind::Arrow,
                x,
                y,
                width,
                height,
                style,
            } => bounding_box_for_arrow(
                Point::new(*x, *y),
                Point::new(x + width, y + height),
                style.width,
            ),
            Annotation::Shape {
                x,
                y,
                width,
                height,
                style,
                ..
            } => bounding_box_for_points(
                &[Point::new(*x, *y), Point::new(x + width, y + height)],
                style.width,
            ),
            Annotation::Mark { x, y, .. } => ensure_positive_rect(
                x - MARK_RADIUS,
                y - MARK_RADIUS,
                x + MARK_RADIUS,
                y + MARK_RADIUS,
            ),
        }
    }

    /// Whether `point` lies within [`Annotation::bounding_box`].
    pub fn hit_test(&self, point: Point) -> bool {
        self.bounding_box()
            .is_some_and(|rect| rect.contains(point.x, point.y))
    }
}

/// Arrowhead wing end points for a shaft from `start` to the tip at `end`.
pub fn arrowhead(start: Point, end: Point) -> [Point; 2] {
    let [left, right] = util::calculate_arrowhead(
        end.x,
        end.y,
        start.x,
        start.y,
        ARROW_HEAD_LENGTH,
        ARROW_HEAD_ANGLE,
    );
    [Point::new(left.0, left.1), Point::new(right.0, right.1)]
}

fn stroke_padding(width: f64) -> f64 {
    (width / 2.0).max(0.5)
}

fn bounding_box_for_points(points: &[Point], width: f64) -> Option<Rect> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    let padding = stroke_padding(width);
    ensure_positive_rect(
        min_x - padding,
        min_y - padding,
        max_x + padding,
        max_y + padding,
    )
}

fn bounding_box_for_arrow(start: Point, end: Point, width: f64) -> Option<Rect> {
    let wings = arrowhead(start, end);
    bounding_box_for_points(&[start, end, wings[0], wings[1]], width)
}

fn ensure_positive_rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Option<Rect> {
    if ![min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite()) {
        return None;
    }
    let min_x = min_x.floor() as i32;
    let min_y = min_y.floor() as i32;
    // Casts saturate for far-off coordinates, so the arithmetic must too.
    let max_x = (max_x.ceil() as i32).max(min_x.saturating_add(1));
    let max_y = (max_y.ceil() as i32).max(min_y.saturating_add(1));
    Rect::from_min_max(min_x, min_y, max_x, max_y)
}
