//! Render orchestrator.
//!
//! Sequences background, subject, frame chrome and annotations onto a fresh
//! surface. Preview and export share [`draw_snapshot`]; the only thing that
//! differs between them is the numeric `scale` passed down to every layer.

use crate::draw::{
    self, Color, FontDescriptor, Point, SubjectBounds, SubjectPlacement, ViewTransform,
};
use crate::scene::{LayoutConfig, RenderSnapshot};
use log::{debug, warn};
use thiserror::Error;

/// Prompt shown by a preview without a subject.
pub const PLACEHOLDER_TEXT: &str = "Drop image here or click to upload";
const PLACEHOLDER_FONT_SIZE: f64 = 24.0;
const PLACEHOLDER_COLOR: Color = Color::new(156.0 / 255.0, 163.0 / 255.0, 175.0 / 255.0, 1.0);

/// Errors that stop a render from producing a surface.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("No subject image loaded")]
    MissingSubject,

    #[error("Invalid output scale {0}; expected a positive finite number")]
    InvalidScale(f64),

    #[error("Cairo error: {0}")]
    Surface(#[from] cairo::Error),
}

/// Options that affect a render but are not part of the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Rasterize the window chrome when the frame is enabled. The title bar
    /// space is reserved either way.
    pub bake_frame: bool,
    /// Font used for mark labels, the frame title and the placeholder.
    pub font: FontDescriptor,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            bake_frame: true,
            font: FontDescriptor::default(),
        }
    }
}

/// Resolved geometry of a snapshot with a subject.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    /// Layout with every value clamped into range.
    pub layout: LayoutConfig,
    pub placement: SubjectPlacement,
}

impl Composition {
    /// Returns `None` when the snapshot has no subject.
    pub fn resolve(snapshot: &RenderSnapshot) -> Option<Self> {
        let subject = snapshot.subject.as_ref()?;
        let layout = snapshot.layout.sanitized();
        let placement =
            SubjectPlacement::compute(subject, &layout, &snapshot.manipulation, &snapshot.frame);
        Some(Self { layout, placement })
    }

    /// Unscaled composition size.
    pub fn size(&self) -> (f64, f64) {
        (self.placement.canvas_width, self.placement.canvas_height)
    }

    /// Maps annotation units to surface pixels at `scale`.
    pub fn view(&self, scale: f64) -> ViewTransform {
        ViewTransform::new(self.placement.origin, scale)
    }
}

/// Pixel size of a composition of unscaled `size` rendered at `scale`.
pub fn output_size(size: (f64, f64), scale: f64) -> (i32, i32) {
    let px = |v: f64| {
        let scaled = (v * scale).round();
        if scaled.is_finite() {
            scaled.clamp(1.0, i32::MAX as f64) as i32
        } else {
            1
        }
    };
    (px(size.0), px(size.1))
}

/// Largest scale at which the composition fits inside `viewport`.
pub fn fit_scale(size: (f64, f64), viewport: (f64, f64)) -> f64 {
    let sx = viewport.0 / size.0.max(1.0);
    let sy = viewport.1 / size.1.max(1.0);
    let scale = sx.min(sy);
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

fn check_scale(scale: f64) -> Result<(), RenderError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(RenderError::InvalidScale(scale))
    }
}

/// Draws every layer of `snapshot` onto `ctx`.
///
/// `width`×`height` is the surface size in pixels. Without a subject only the
/// background and the upload prompt are drawn and `None` is returned.
pub fn draw_snapshot(
    ctx: &cairo::Context,
    snapshot: &RenderSnapshot,
    width: f64,
    height: f64,
    scale: f64,
    options: &RenderOptions,
) -> Result<Option<SubjectBounds>, cairo::Error> {
    draw::render_background(ctx, &snapshot.background, width, height)?;

    let (Some(subject), Some(composition)) =
        (snapshot.subject.as_ref(), Composition::resolve(snapshot))
    else {
        draw::render_centered_text(
            ctx,
            PLACEHOLDER_TEXT,
            &options.font,
            PLACEHOLDER_FONT_SIZE * scale,
            Point::new(width / 2.0, height / 2.0),
            PLACEHOLDER_COLOR,
        )?;
        return Ok(None);
    };

    let bounds = draw::composite_subject(
        ctx,
        subject,
        &composition.placement,
        &composition.layout,
        &snapshot.manipulation,
        scale,
    )?;

    if options.bake_frame {
        draw::render_window_chrome(
            ctx,
            &snapshot.frame,
            &composition.placement,
            &options.font,
            scale,
        )?;
    }

    draw::render_annotations(
        ctx,
        &snapshot.annotations,
        &composition.view(scale),
        &options.font,
    )?;

    Ok(Some(bounds))
}

/// Renders `snapshot` onto a new transparent surface of `surface_size` pixels.
pub fn render(
    snapshot: &RenderSnapshot,
    surface_size: (i32, i32),
    scale: f64,
    options: &RenderOptions,
) -> Result<cairo::ImageSurface, RenderError> {
    check_scale(scale)?;
    let (width, height) = (surface_size.0.max(1), surface_size.1.max(1));

    let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)?;
    {
        let ctx = cairo::Context::new(&surface)?;
        ctx.set_antialias(cairo::Antialias::Gray);
        draw_snapshot(&ctx, snapshot, width as f64, height as f64, scale, options)?;
    }
    surface.flush();
    Ok(surface)
}

/// Renders the preview for a viewport of `viewport` pixels.
///
/// The composition is fitted into the viewport; the returned scale is what
/// pointer positions on the preview must be divided by. Without a subject the
/// surface is the viewport itself at scale 1.
pub fn render_preview(
    snapshot: &RenderSnapshot,
    viewport: (i32, i32),
    options: &RenderOptions,
) -> Result<(cairo::ImageSurface, f64), RenderError> {
    match Composition::resolve(snapshot) {
        Some(composition) => {
            let size = composition.size();
            let scale = fit_scale(size, (viewport.0 as f64, viewport.1 as f64));
            let surface = render(snapshot, output_size(size, scale), scale, options)?;
            Ok((surface, scale))
        }
        None => Ok((render(snapshot, viewport, 1.0, options)?, 1.0)),
    }
}

/// Renders the export raster at `scale` (1×, 2×, 3× or any positive factor).
///
/// Uses its own surface, so it never observes or disturbs a preview render.
pub fn render_export(
    snapshot: &RenderSnapshot,
    scale: f64,
    options: &RenderOptions,
) -> Result<cairo::ImageSurface, RenderError> {
    let Some(composition) = Composition::resolve(snapshot) else {
        warn!("Export requested without a subject");
        return Err(RenderError::MissingSubject);
    };
    check_scale(scale)?;

    let size = output_size(composition.size(), scale);
    debug!(
        "Rendering export at {}x ({}x{} px, {} annotations)",
        scale,
        size.0,
        size.1,
        snapshot.annotations.len()
    );
    render(snapshot, size, scale, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SubjectImage;

    fn snapshot() -> RenderSnapshot {
        let subject = SubjectImage::from_rgba(100, 100, &vec![200u8; 100 * 100 * 4]).unwrap();
        let mut snapshot = RenderSnapshot::default().with_subject(subject);
        snapshot.layout.padding = crate::scene::Padding::uniform(40.0);
        snapshot
    }

    #[test]
    fn export_requires_subject() {
        let err = render_export(&RenderSnapshot::default(), 1.0, &RenderOptions::default())
            .unwrap_err();
        assert!(matches!(err, RenderError::MissingSubject));
    }

    #[test]
    fn export_rejects_bad_scale() {
        for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = render_export(&snapshot(), scale, &RenderOptions::default()).unwrap_err();
            assert!(matches!(err, RenderError::InvalidScale(_)));
        }
    }

    #[test]
    fn export_size_follows_scale() {
        let surface = render_export(&snapshot(), 2.0, &RenderOptions::default()).unwrap();
        assert_eq!((surface.width(), surface.height()), (360, 360));
        let surface = render_export(&snapshot(), 0.5, &RenderOptions::default()).unwrap();
        assert_eq!((surface.width(), surface.height()), (90, 90));
    }

    #[test]
    fn output_size_rounds_and_never_collapses() {
        assert_eq!(output_size((180.0, 100.0), 1.5), (270, 150));
        assert_eq!(output_size((3.0, 3.0), 0.01), (1, 1));
    }

    #[test]
    fn preview_fits_viewport() {
        let (surface, scale) =
            render_preview(&snapshot(), (90, 400), &RenderOptions::default()).unwrap();
        assert_eq!(scale, 0.5);
        assert_eq!((surface.width(), surface.height()), (90, 90));
    }

    #[test]
    fn preview_without_subject_uses_viewport() {
        let (surface, scale) =
            render_preview(&RenderSnapshot::default(), (320, 200), &RenderOptions::default())
                .unwrap();
        assert_eq!(scale, 1.0);
        assert_eq!((surface.width(), surface.height()), (320, 200));
    }
}
