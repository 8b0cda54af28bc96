//! Geometry kernel: paths, gradient axes and coordinate transforms.
//!
//! Every function here that accepts unscaled layout units also accepts the
//! output `scale` and returns coordinates already multiplied by it, so callers
//! never scale twice. Functions that operate on surface dimensions (such as
//! [`gradient_axis`]) receive pixel sizes that already include the scale.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Multiplies both coordinates by `scale`.
    pub fn scaled(self, scale: f64) -> Self {
        Self::new(self.x * scale, self.y * scale)
    }

    /// Translates the point by `(dx, dy)`.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// One segment of a [`Path`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    MoveTo(Point),
    LineTo(Point),
    /// Clockwise arc (in y-down space) from `start` to `end` radians.
    Arc {
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
    },
    Close,
}

/// A closed outline in surface-pixel coordinates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    ops: Vec<PathOp>,
}

impl Path {
    pub fn ops(&self) -> &[PathOp] {
        &self.ops
    }

    /// Replaces the current Cairo path with this outline.
    pub fn trace(&self, ctx: &cairo::Context) {
        ctx.new_path();
        for op in &self.ops {
            match *op {
                PathOp::MoveTo(p) => ctx.move_to(p.x, p.y),
                PathOp::LineTo(p) => ctx.line_to(p.x, p.y),
                PathOp::Arc {
                    center,
                    radius,
                    start,
                    end,
                } => ctx.arc(center.x, center.y, radius, start, end),
                PathOp::Close => ctx.close_path(),
            }
        }
    }
}

/// Builds a plain rectangle outline centered at `center`.
pub fn rect_path(center: Point, width: f64, height: f64, scale: f64) -> Path {
    let (left, top, right, bottom) = scaled_edges(center, width, height, scale);
    Path {
        ops: vec![
            PathOp::MoveTo(Point::new(left, top)),
            PathOp::LineTo(Point::new(right, top)),
            PathOp::LineTo(Point::new(right, bottom)),
            PathOp::LineTo(Point::new(left, bottom)),
            PathOp::Close,
        ],
    }
}

/// Builds a rounded rectangle outline (4 edges, 4 quarter arcs) centered at `center`.
///
/// The radius is clamped to half the smaller side so the outline never
/// self-intersects; a radius of zero or less yields [`rect_path`] exactly.
pub fn rounded_rect_path(center: Point, width: f64, height: f64, radius: f64, scale: f64) -> Path {
    let (left, top, right, bottom) = scaled_edges(center, width, height, scale);
    let w = right - left;
    let h = bottom - top;
    let r = (radius * scale).min(w.min(h) / 2.0);
    if r.is_nan() || r <= 0.0 {
        return rect_path(center, width, height, scale);
    }

    Path {
        ops: vec![
            PathOp::MoveTo(Point::new(left + r, top)),
            PathOp::LineTo(Point::new(right - r, top)),
            PathOp::Arc {
                center: Point::new(right - r, top + r),
                radius: r,
                start: -FRAC_PI_2,
                end: 0.0,
            },
            PathOp::LineTo(Point::new(right, bottom - r)),
            PathOp::Arc {
                center: Point::new(right - r, bottom - r),
                radius: r,
                start: 0.0,
                end: FRAC_PI_2,
            },
            PathOp::LineTo(Point::new(left + r, bottom)),
            PathOp::Arc {
                center: Point::new(left + r, bottom - r),
                radius: r,
                start: FRAC_PI_2,
                end: PI,
            },
            PathOp::LineTo(Point::new(left, top + r)),
            PathOp::Arc {
                center: Point::new(left + r, top + r),
                radius: r,
                start: PI,
                end: PI + FRAC_PI_2,
            },
            PathOp::Close,
        ],
    }
}

fn scaled_edges(center: Point, width: f64, height: f64, scale: f64) -> (f64, f64, f64, f64) {
    let c = center.scaled(scale);
    let half_w = width.max(0.0) * scale / 2.0;
    let half_h = height.max(0.0) * scale / 2.0;
    (c.x - half_w, c.y - half_h, c.x + half_w, c.y + half_h)
}

/// Converts a gradient angle into an axis spanning a `width`×`height` box.
///
/// The axis is centered on the box; 0° runs left to right and the angle grows
/// clockwise. Stop 0 sits at the first point, the last stop at the second.
pub fn gradient_axis(angle_degrees: f64, width: f64, height: f64) -> (Point, Point) {
    let angle = angle_degrees.rem_euclid(360.0).to_radians();
    let cx = width / 2.0;
    let cy = height / 2.0;
    let dx = cx * angle.cos();
    let dy = cy * angle.sin();
    (Point::new(cx - dx, cy - dy), Point::new(cx + dx, cy + dy))
}

/// Maps between annotation space (unscaled, relative to an origin) and
/// surface pixels at a given scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// Origin of annotation space in unscaled composition units.
    pub origin: Point,
    /// Output scale factor.
    pub scale: f64,
}

impl ViewTransform {
    pub fn new(origin: Point, scale: f64) -> Self {
        Self { origin, scale }
    }

    /// Annotation-space point to surface pixels.
    pub fn to_surface(&self, local: Point) -> Point {
        local
            .offset(self.origin.x, self.origin.y)
            .scaled(self.scale)
    }

    /// Surface pixels back to annotation space.
    pub fn to_local(&self, surface: Point) -> Point {
        Point::new(
            surface.x / self.scale - self.origin.x,
            surface.y / self.scale - self.origin.y,
        )
    }
}
