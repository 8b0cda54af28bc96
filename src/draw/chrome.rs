//! Window-chrome title bar drawn above the subject.

use super::color::{BLACK, Color, WHITE};
use super::font::FontDescriptor;
use super::geometry::Point;
use super::render::render_centered_text;
use super::scope::scoped;
use super::subject::SubjectPlacement;
use crate::scene::{FrameConfig, FrameTheme, TITLE_BAR_HEIGHT};
use std::f64::consts::{FRAC_PI_2, PI};

pub const TRAFFIC_LIGHT_RADIUS: f64 = 3.0;
const TRAFFIC_LIGHT_INSET: f64 = 12.0;
const TRAFFIC_LIGHT_GAP: f64 = 8.0;
const TITLE_BAR_RADIUS: f64 = 8.0;
const TITLE_FONT_SIZE: f64 = 12.0;

const TRAFFIC_LIGHTS: [Color; 3] = [
    Color::new(239.0 / 255.0, 68.0 / 255.0, 68.0 / 255.0, 1.0),
    Color::new(234.0 / 255.0, 179.0 / 255.0, 8.0 / 255.0, 1.0),
    Color::new(34.0 / 255.0, 197.0 / 255.0, 94.0 / 255.0, 1.0),
];

impl FrameTheme {
    pub fn panel_color(self) -> Color {
        match self {
            FrameTheme::Dark => Color::new(30.0 / 255.0, 30.0 / 255.0, 30.0 / 255.0, 1.0),
            FrameTheme::Light => Color::new(245.0 / 255.0, 245.0 / 255.0, 245.0 / 255.0, 1.0),
        }
    }

    pub fn text_color(self) -> Color {
        match self {
            FrameTheme::Dark => WHITE,
            FrameTheme::Light => BLACK,
        }
    }
}

/// Draws the title bar into the strip reserved above the subject.
///
/// Does nothing when the frame is disabled.
pub fn render_window_chrome(
    ctx: &cairo::Context,
    frame: &FrameConfig,
    placement: &SubjectPlacement,
    font: &FontDescriptor,
    scale: f64,
) -> Result<(), cairo::Error> {
    if !frame.enabled {
        return Ok(());
    }

    let left = placement.origin.x * scale;
    let top = (placement.origin.y - TITLE_BAR_HEIGHT) * scale;
    let width = placement.width * scale;
    let height = TITLE_BAR_HEIGHT * scale;
    let radius = (TITLE_BAR_RADIUS * scale).min(width / 2.0).min(height);

    scoped(ctx, |ctx| {
        ctx.new_path();
        ctx.move_to(left, top + height);
        ctx.line_to(left, top + radius);
        ctx.arc(left + radius, top + radius, radius, PI, PI + FRAC_PI_2);
        ctx.line_to(left + width - radius, top);
        ctx.arc(left + width - radius, top + radius, radius, -FRAC_PI_2, 0.0);
        ctx.line_to(left + width, top + height);
        ctx.close_path();
        frame.theme.panel_color().apply(ctx);
        ctx.fill()?;

        let center_y = top + height / 2.0;
        let step = (2.0 * TRAFFIC_LIGHT_RADIUS + TRAFFIC_LIGHT_GAP) * scale;
        let first_x = left + (TRAFFIC_LIGHT_INSET + TRAFFIC_LIGHT_RADIUS) * scale;
        for (i, color) in TRAFFIC_LIGHTS.iter().enumerate() {
            color.apply(ctx);
            ctx.new_path();
            ctx.arc(
                first_x + i as f64 * step,
                center_y,
                TRAFFIC_LIGHT_RADIUS * scale,
                0.0,
                2.0 * PI,
            );
            ctx.fill()?;
        }

        if let Some(title) = frame.visible_title() {
            render_centered_text(
                ctx,
                title,
                &font.with_weight("medium"),
                TITLE_FONT_SIZE * scale,
                Point::new(left + width / 2.0, center_y),
                frame.theme.text_color(),
            )?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{ImageManipulation, LayoutConfig, Padding, SubjectImage};

    fn pixel(surface: &mut cairo::ImageSurface, x: usize, y: usize) -> u32 {
        surface.flush();
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        let o = y * stride + x * 4;
        u32::from_ne_bytes([data[o], data[o + 1], data[o + 2], data[o + 3]])
    }

    fn render(frame: &FrameConfig) -> cairo::ImageSurface {
        let rgba = vec![255u8; 100 * 100 * 4];
        let subject = SubjectImage::from_rgba(100, 100, &rgba).unwrap();
        let layout = LayoutConfig {
            padding: Padding::uniform(10.0),
            ..LayoutConfig::default()
        };
        let placement =
            SubjectPlacement::compute(&subject, &layout, &ImageManipulation::default(), frame);
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 120, 148).unwrap();
        {
            let ctx = cairo::Context::new(&surface).unwrap();
            render_window_chrome(&ctx, frame, &placement, &FontDescriptor::default(), 1.0)
                .unwrap();
        }
        surface
    }

    #[test]
    fn disabled_frame_draws_nothing() {
        let mut surface = render(&FrameConfig::default());
        assert_eq!(pixel(&mut surface, 60, 24), 0);
    }

    #[test]
    fn dark_bar_with_traffic_lights() {
        let mut surface = render(&FrameConfig {
            enabled: true,
            theme: FrameTheme::Dark,
            title: None,
        });
        // Bar spans y 10..38 over the subject's x range 10..110.
        assert_eq!(pixel(&mut surface, 60, 30), 0xff1e1e1e);
        assert_eq!(pixel(&mut surface, 5, 30), 0);
        // First light centered at (25, 24).
        assert_eq!(pixel(&mut surface, 25, 24), 0xffef4444);
    }

    #[test]
    fn light_theme_panel() {
        let mut surface = render(&FrameConfig {
            enabled: true,
            theme: FrameTheme::Light,
            title: Some("notes.txt".into()),
        });
        assert_eq!(pixel(&mut surface, 100, 36), 0xfff5f5f5);
    }
}
