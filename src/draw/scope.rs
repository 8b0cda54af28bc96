//! Scoped Cairo state blocks.

/// Runs `draw` between `save()` and `restore()` so transforms, clips and
/// sources set inside never leak into later drawing.
///
/// The state is restored even when `draw` fails; the drawing error wins over
/// a restore error.
pub fn scoped<T>(
    ctx: &cairo::Context,
    draw: impl FnOnce(&cairo::Context) -> Result<T, cairo::Error>,
) -> Result<T, cairo::Error> {
    ctx.save()?;
    let result = draw(ctx);
    let restored = ctx.restore();
    let value = result?;
    restored?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transforms_do_not_leak_out_of_scope() {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 4, 4).unwrap();
        let ctx = cairo::Context::new(&surface).unwrap();

        scoped(&ctx, |ctx| {
            ctx.translate(10.0, 10.0);
            ctx.set_line_width(9.0);
            Ok(())
        })
        .unwrap();

        assert_eq!(ctx.user_to_device(0.0, 0.0), (0.0, 0.0));
        assert_eq!(ctx.line_width(), 2.0);
    }

    #[test]
    fn state_is_restored_when_drawing_fails() {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 4, 4).unwrap();
        let ctx = cairo::Context::new(&surface).unwrap();

        let result: Result<(), cairo::Error> = scoped(&ctx, |ctx| {
            ctx.translate(3.0, 3.0);
            Err(cairo::Error::InvalidMatrix)
        });

        assert!(result.is_err());
        assert_eq!(ctx.user_to_device(0.0, 0.0), (0.0, 0.0));
    }
}
