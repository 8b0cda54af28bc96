//! Cairo-based rendering of annotations and text.

use super::annotation::{self, Annotation, MARK_FONT_SIZE, MARK_RADIUS, ShapeKind, StrokeStyle};
use super::color::{Color, WHITE};
use super::font::FontDescriptor;
use super::geometry::{Point, ViewTransform};
use super::scope::scoped;
use std::f64::consts::PI;

/// Renders annotations in list order (first = bottom layer).
///
/// `view` maps annotation units to surface pixels; every length is multiplied
/// by `view.scale`. Nothing here is clipped to the subject.
pub fn render_annotations(
    ctx: &cairo::Context,
    annotations: &[Annotation],
    view: &ViewTransform,
    font: &FontDescriptor,
) -> Result<(), cairo::Error> {
    for annotation in annotations {
        scoped(ctx, |ctx| render_annotation(ctx, annotation, view, font))?;
    }
    Ok(())
}

/// Renders a single annotation.
pub fn render_annotation(
    ctx: &cairo::Context,
    annotation: &Annotation,
    view: &ViewTransform,
    font: &FontDescriptor,
) -> Result<(), cairo::Error> {
    match annotation {
        Annotation::Stroke { points, style } => render_stroke(ctx, points, style, view),
        Annotation::Shape {
            shape,
            x,
            y,
            width,
            height,
            style,
        } => {
            let start = Point::new(*x, *y);
            let end = Point::new(x + width, y + height);
            render_shape(ctx, *shape, start, end, style, view)
        }
        Annotation::Mark { x, y, label, color } => {
            render_mark(ctx, Point::new(*x, *y), *label, *color, view, font)
        }
    }
}

/// Polyline through the stroke points; fewer than two points draws nothing.
fn render_stroke(
    ctx: &cairo::Context,
    points: &[Point],
    style: &StrokeStyle,
    view: &ViewTransform,
) -> Result<(), cairo::Error> {
    if points.len() < 2 {
        return Ok(());
    }

    apply_stroke_style(ctx, style, view.scale);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);

    let first = view.to_surface(points[0]);
    ctx.move_to(first.x, first.y);
    for point in &points[1..] {
        let p = view.to_surface(*point);
        ctx.line_to(p.x, p.y);
    }
    ctx.stroke()
}

fn render_shape(
    ctx: &cairo::Context,
    kind: ShapeKind,
    start: Point,
    end: Point,
    style: &StrokeStyle,
    view: &ViewTransform,
) -> Result<(), cairo::Error> {
    apply_stroke_style(ctx, style, view.scale);
    let a = view.to_surface(start);
    let b = view.to_surface(end);

    match kind {
        ShapeKind::Rectangle => {
            ctx.set_line_join(cairo::LineJoin::Miter);
            ctx.rectangle(a.x.min(b.x), a.y.min(b.y), (b.x - a.x).abs(), (b.y - a.y).abs());
            ctx.stroke()
        }
        ShapeKind::Ellipse => {
            let rx = (b.x - a.x).abs() / 2.0;
            let ry = (b.y - a.y).abs() / 2.0;
            if rx <= 0.0 || ry <= 0.0 {
                return Ok(());
            }
            ctx.save()?;
            ctx.translate((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
            ctx.scale(rx, ry);
            ctx.arc(0.0, 0.0, 1.0, 0.0, 2.0 * PI);
            ctx.restore()?;
            ctx.stroke()
        }
        ShapeKind::Line => {
            ctx.set_line_cap(cairo::LineCap::Round);
            ctx.move_to(a.x, a.y);
            ctx.line_to(b.x, b.y);
            ctx.stroke()
        }
        ShapeKind::Arrow => {
            ctx.set_line_cap(cairo::LineCap::Round);
            ctx.set_line_join(cairo::LineJoin::Round);
            ctx.move_to(a.x, a.y);
            ctx.line_to(b.x, b.y);
            for wing in annotation::arrowhead(start, end) {
                let w = view.to_surface(wing);
                ctx.move_to(b.x, b.y);
                ctx.line_to(w.x, w.y);
            }
            ctx.stroke()
        }
    }
}

/// Opaque filled circle with the label centered in white.
fn render_mark(
    ctx: &cairo::Context,
    at: Point,
    label: u32,
    color: Color,
    view: &ViewTransform,
    font: &FontDescriptor,
) -> Result<(), cairo::Error> {
    let center = view.to_surface(at);
    color.with_alpha(1.0).apply(ctx);
    ctx.new_path();
    ctx.arc(center.x, center.y, MARK_RADIUS * view.scale, 0.0, 2.0 * PI);
    ctx.fill()?;

    render_centered_text(
        ctx,
        &label.to_string(),
        font,
        MARK_FONT_SIZE * view.scale,
        center,
        WHITE,
    )
}

fn apply_stroke_style(ctx: &cairo::Context, style: &StrokeStyle, scale: f64) {
    style.effective_color().apply(ctx);
    ctx.set_line_width(style.width.max(0.0) * scale);
}

/// Draws a single line of text whose logical box is centered on `center`.
///
/// Hint metrics are disabled so glyph advances scale linearly with
/// `pixel_size`, keeping text placement identical across output scales.
pub fn render_centered_text(
    ctx: &cairo::Context,
    text: &str,
    font: &FontDescriptor,
    pixel_size: f64,
    center: Point,
    color: Color,
) -> Result<(), cairo::Error> {
    if text.is_empty() || pixel_size <= 0.0 {
        return Ok(());
    }

    scoped(ctx, |ctx| {
        let mut options = cairo::FontOptions::new()?;
        options.set_hint_metrics(cairo::HintMetrics::Off);
        options.set_hint_style(cairo::HintStyle::None);
        options.set_antialias(cairo::Antialias::Gray);
        ctx.set_font_options(&options);

        let layout = pangocairo::functions::create_layout(ctx);
        layout.set_font_description(Some(&font.font_description(pixel_size)));
        layout.set_text(text);

        let (_ink, logical) = layout.extents();
        let unit = pango::SCALE as f64;
        let x = center.x - (logical.x() as f64 + logical.width() as f64 / 2.0) / unit;
        let y = center.y - (logical.y() as f64 + logical.height() as f64 / 2.0) / unit;

        color.apply(ctx);
        ctx.move_to(x, y);
        pangocairo::functions::show_layout(ctx, &layout);
        Ok(())
    })
}
