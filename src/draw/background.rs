//! Background fill, the first layer of every render.

use super::color::{Color, WHITE};
use super::geometry::gradient_axis;
use crate::scene::background::{BackgroundConfig, GradientDirection};
use log::warn;

/// Placeholder for desktop wallpapers.
pub const DESKTOP_PLACEHOLDER: Color = Color::new(30.0 / 255.0, 30.0 / 255.0, 30.0 / 255.0, 1.0);

/// Fills the whole `width`×`height` surface according to `config`.
///
/// Malformed configurations (unknown tag, wrong gradient arity) fall back to
/// solid white and are logged rather than reported as errors.
pub fn render_background(
    ctx: &cairo::Context,
    config: &BackgroundConfig,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    ctx.save()?;
    ctx.rectangle(0.0, 0.0, width, height);
    let result = fill_background(ctx, config, width, height);
    ctx.restore()?;
    result
}

fn fill_background(
    ctx: &cairo::Context,
    config: &BackgroundConfig,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    match config {
        BackgroundConfig::Solid { color } => fill_solid(ctx, *color),
        BackgroundConfig::Gradient {
            colors,
            direction,
            angle,
        } => match colors.as_slice() {
            [start, end] => {
                let stops = [(0.0, *start), (1.0, *end)];
                match direction {
                    GradientDirection::Linear => fill_linear(ctx, &stops, *angle, width, height),
                    GradientDirection::Radial => fill_radial(ctx, &stops, *angle, width, height),
                }
            }
            _ => {
                warn!(
                    "Gradient background needs 2 colors, got {}; using white",
                    colors.len()
                );
                fill_solid(ctx, WHITE)
            }
        },
        BackgroundConfig::Cosmic { colors, angle } => match colors.as_slice() {
            [a, b, c] => fill_linear(ctx, &[(0.0, *a), (0.5, *b), (1.0, *c)], *angle, width, height),
            _ => {
                warn!(
                    "Cosmic background needs 3 colors, got {}; using white",
                    colors.len()
                );
                fill_solid(ctx, WHITE)
            }
        },
        BackgroundConfig::Desktop { .. } => fill_solid(ctx, DESKTOP_PLACEHOLDER),
        BackgroundConfig::Custom { color, opacity } => {
            let opacity = if opacity.is_finite() { *opacity } else { 100.0 };
            fill_solid(ctx, color.with_alpha(opacity.clamp(0.0, 100.0) / 100.0))
        }
        BackgroundConfig::Unknown => {
            warn!("Unknown background type; using white");
            fill_solid(ctx, WHITE)
        }
    }
}

fn fill_solid(ctx: &cairo::Context, color: Color) -> Result<(), cairo::Error> {
    color.apply(ctx);
    ctx.fill()
}

fn fill_linear(
    ctx: &cairo::Context,
    stops: &[(f64, Color)],
    angle: f64,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    let (p1, p2) = gradient_axis(angle, width, height);
    let gradient = cairo::LinearGradient::new(p1.x, p1.y, p2.x, p2.y);
    for (offset, color) in stops {
        gradient.add_color_stop_rgba(*offset, color.r, color.g, color.b, color.a);
    }
    ctx.set_source(&gradient)?;
    ctx.fill()
}

/// Radial fill centered on the gradient axis midpoint, reaching stop 1 at
/// half the axis length.
fn fill_radial(
    ctx: &cairo::Context,
    stops: &[(f64, Color)],
    angle: f64,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    let (p1, p2) = gradient_axis(angle, width, height);
    let cx = (p1.x + p2.x) / 2.0;
    let cy = (p1.y + p2.y) / 2.0;
    let radius = ((p2.x - p1.x).hypot(p2.y - p1.y) / 2.0).max(1.0);

    let gradient = cairo::RadialGradient::new(cx, cy, 0.0, cx, cy, radius);
    for (offset, color) in stops {
        gradient.add_color_stop_rgba(*offset, color.r, color.g, color.b, color.a);
    }
    ctx.set_source(&gradient)?;
    ctx.fill()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLACK, BLUE, RED};

    fn render(config: &BackgroundConfig) -> cairo::ImageSurface {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 40, 20).unwrap();
        {
            let ctx = cairo::Context::new(&surface).unwrap();
            render_background(&ctx, config, 40.0, 20.0).unwrap();
        }
        surface
    }

    fn pixel(surface: &mut cairo::ImageSurface, x: usize, y: usize) -> u32 {
        surface.flush();
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        let o = y * stride + x * 4;
        u32::from_ne_bytes([data[o], data[o + 1], data[o + 2], data[o + 3]])
    }

    #[test]
    fn solid_fills_everything() {
        let mut surface = render(&BackgroundConfig::Solid { color: BLUE });
        assert_eq!(pixel(&mut surface, 0, 0), 0xff0000ff);
        assert_eq!(pixel(&mut surface, 39, 19), 0xff0000ff);
    }

    #[test]
    fn linear_gradient_runs_left_to_right_at_zero_degrees() {
        let mut surface = render(&BackgroundConfig::Gradient {
            colors: vec![BLACK, RED],
            direction: GradientDirection::Linear,
            angle: 0.0,
        });
        let left = (pixel(&mut surface, 0, 10) >> 16) & 0xff;
        let right = (pixel(&mut surface, 39, 10) >> 16) & 0xff;
        assert!(left < 10 && right > 245, "left {left} right {right}");
    }

    #[test]
    fn wrong_gradient_arity_is_white() {
        let mut surface = render(&BackgroundConfig::Gradient {
            colors: vec![BLACK, RED, BLUE],
            direction: GradientDirection::Linear,
            angle: 90.0,
        });
        assert_eq!(pixel(&mut surface, 5, 5), 0xffffffff);

        let mut surface = render(&BackgroundConfig::Cosmic {
            colors: vec![BLACK],
            angle: 0.0,
        });
        assert_eq!(pixel(&mut surface, 5, 5), 0xffffffff);
    }

    #[test]
    fn unknown_is_white_and_desktop_is_placeholder() {
        let mut surface = render(&BackgroundConfig::Unknown);
        assert_eq!(pixel(&mut surface, 1, 1), 0xffffffff);
        let mut surface = render(&BackgroundConfig::Desktop {
            style: Default::default(),
            blur: true,
        });
        assert_eq!(pixel(&mut surface, 1, 1), 0xff1e1e1e);
    }

    #[test]
    fn custom_keeps_its_alpha() {
        let mut surface = render(&BackgroundConfig::Custom {
            color: RED,
            opacity: 50.0,
        });
        let px = pixel(&mut surface, 3, 3);
        let alpha = px >> 24;
        assert!((127..=128).contains(&alpha), "alpha {alpha}");
        assert_eq!((px >> 16) & 0xff, alpha);
    }
}
