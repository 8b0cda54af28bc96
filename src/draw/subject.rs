//! Subject compositor: drop shadow, rounded clip, flips and the image itself.

use super::blur::{blur_extent, blur_surface};
use super::geometry::{Point, rounded_rect_path};
use super::scope::scoped;
use crate::scene::{
    CropRect, FrameConfig, ImageManipulation, LayoutConfig, ShadowConfig, SubjectImage,
};
use log::warn;

/// Where the subject sits in the composition, in unscaled units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubjectPlacement {
    /// Source region drawn as the subject.
    pub source: CropRect,
    /// Top-left of the unflipped subject, position offset included.
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    /// Composition size: padding around the subject plus the title bar
    /// reserve. The position offset does not grow the canvas.
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl SubjectPlacement {
    /// Lays out `subject` using an already sanitized `layout`.
    pub fn compute(
        subject: &SubjectImage,
        layout: &LayoutConfig,
        manipulation: &ImageManipulation,
        frame: &FrameConfig,
    ) -> Self {
        let source = subject.source_rect(manipulation.crop);
        let width = source.width * layout.scale;
        let height = source.height * layout.scale;
        let reserve = frame.reserved_height();
        let padding = &layout.padding;
        let position = manipulation.sanitized_position();

        Self {
            source,
            origin: Point::new(
                padding.left + position.x,
                padding.top + reserve + position.y,
            ),
            width,
            height,
            canvas_width: padding.left + width + padding.right,
            canvas_height: padding.top + reserve + height + padding.bottom,
        }
    }

    /// Anchor the subject is centered, rounded and mirrored about.
    pub fn center(&self) -> Point {
        self.origin.offset(self.width / 2.0, self.height / 2.0)
    }

    /// Drawn region at `scale`. Flips never change it.
    pub fn bounds(&self, scale: f64) -> SubjectBounds {
        SubjectBounds {
            x: self.origin.x * scale,
            y: self.origin.y * scale,
            width: self.width * scale,
            height: self.height * scale,
        }
    }
}

/// Subject rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubjectBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Draws the shadow, then the clipped and mirrored subject.
///
/// The shadow is rendered on its own surface and composited before the clip
/// is established, so the rounded silhouette casts it without clipping it.
pub fn composite_subject(
    ctx: &cairo::Context,
    subject: &SubjectImage,
    placement: &SubjectPlacement,
    layout: &LayoutConfig,
    manipulation: &ImageManipulation,
    scale: f64,
) -> Result<SubjectBounds, cairo::Error> {
    if layout.shadow.is_visible() {
        render_shadow(ctx, placement, layout.rounded, &layout.shadow, scale)?;
    }

    let image = subject.to_surface()?;
    let center = placement.center();
    let source = placement.source;

    scoped(ctx, |ctx| {
        rounded_rect_path(center, placement.width, placement.height, layout.rounded, scale)
            .trace(ctx);
        ctx.clip();

        let width = placement.width * scale;
        let height = placement.height * scale;
        ctx.translate(center.x * scale, center.y * scale);
        if manipulation.flip_h {
            ctx.scale(-1.0, 1.0);
        }
        if manipulation.flip_v {
            ctx.scale(1.0, -1.0);
        }
        ctx.translate(-width / 2.0, -height / 2.0);
        ctx.scale(width / source.width, height / source.height);

        ctx.set_source_surface(&image, -source.x, -source.y)?;
        let pattern = ctx.source();
        pattern.set_filter(cairo::Filter::Good);
        pattern.set_extend(cairo::Extend::Pad);
        ctx.rectangle(0.0, 0.0, source.width, source.height);
        ctx.fill()
    })?;

    Ok(placement.bounds(scale))
}

fn render_shadow(
    ctx: &cairo::Context,
    placement: &SubjectPlacement,
    rounded: f64,
    shadow: &ShadowConfig,
    scale: f64,
) -> Result<(), cairo::Error> {
    let center = placement.center().offset(shadow.x, shadow.y);
    let caster_width = placement.width + 2.0 * shadow.spread;
    let caster_height = placement.height + 2.0 * shadow.spread;
    let caster_radius = if rounded > 0.0 { rounded + shadow.spread } else { 0.0 };

    let sigma = shadow.blur * scale / 2.0;
    let margin = blur_extent(sigma) as f64 + 2.0;
    let left = ((center.x - caster_width / 2.0) * scale).floor() - margin;
    let top = ((center.y - caster_height / 2.0) * scale).floor() - margin;
    let right = ((center.x + caster_width / 2.0) * scale).ceil() + margin;
    let bottom = ((center.y + caster_height / 2.0) * scale).ceil() + margin;

    let mut caster = cairo::ImageSurface::create(
        cairo::Format::ARgb32,
        (right - left).max(1.0) as i32,
        (bottom - top).max(1.0) as i32,
    )?;
    {
        let shadow_ctx = cairo::Context::new(&caster)?;
        shadow_ctx.translate(-left, -top);
        shadow.color.with_opacity_percent(shadow.opacity).apply(&shadow_ctx);
        rounded_rect_path(center, caster_width, caster_height, caster_radius, scale)
            .trace(&shadow_ctx);
        shadow_ctx.fill()?;
    }

    match blur_surface(&mut caster, sigma) {
        Ok(()) => {}
        Err(cairo::BorrowError::Cairo(err)) => return Err(err),
        Err(cairo::BorrowError::NonExclusive) => {
            warn!("Shadow surface is still in use; drawing it without blur");
        }
    }

    scoped(ctx, |ctx| {
        ctx.set_source_surface(&caster, left, top)?;
        ctx.paint()
    })
}
