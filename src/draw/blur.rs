//! Separable blur over premultiplied ARGB32 Cairo surfaces.
//!
//! Used to soften drop shadows. Three box passes per axis approximate a
//! gaussian of the requested sigma; pixels outside the surface count as fully
//! transparent, so callers leave a margin around whatever they blur.

const PASSES: usize = 3;

/// Box radius whose three-pass repetition approximates a gaussian of `sigma`.
pub fn box_radius(sigma: f64) -> usize {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    let ideal_width = (4.0 * sigma * sigma + 1.0).sqrt();
    ((ideal_width - 1.0) / 2.0).round().max(0.0) as usize
}

/// Number of pixels a blur of `sigma` can spread color outward.
pub fn blur_extent(sigma: f64) -> usize {
    box_radius(sigma) * PASSES
}

/// Blurs an ARGB32 surface in place.
///
/// The surface must not be the target of a live [`cairo::Context`]; Cairo only
/// hands out pixel access to exclusively-owned surfaces.
pub fn blur_surface(surface: &mut cairo::ImageSurface, sigma: f64) -> Result<(), cairo::BorrowError> {
    let radius = box_radius(sigma);
    if radius == 0 {
        return Ok(());
    }

    surface.flush();
    let width = surface.width().max(0) as usize;
    let height = surface.height().max(0) as usize;
    let stride = surface.stride().max(0) as usize;
    if width == 0 || height == 0 {
        return Ok(());
    }

    let mut data = surface.data()?;
    let mut line = vec![0u8; width.max(height) * 4];
    let mut scratch = vec![0u8; width.max(height) * 4];

    for _ in 0..PASSES {
        for y in 0..height {
            let row = &mut data[y * stride..y * stride + width * 4];
            box_pass(row, width, radius, &mut scratch);
        }

        for x in 0..width {
            for y in 0..height {
                let src = y * stride + x * 4;
                line[y * 4..y * 4 + 4].copy_from_slice(&data[src..src + 4]);
            }
            box_pass(&mut line, height, radius, &mut scratch);
            for y in 0..height {
                let dst = y * stride + x * 4;
                data[dst..dst + 4].copy_from_slice(&line[y * 4..y * 4 + 4]);
            }
        }
    }

    Ok(())
}

/// One running-sum box filter over `len` 4-byte pixels.
fn box_pass(pixels: &mut [u8], len: usize, radius: usize, scratch: &mut [u8]) {
    let window = (2 * radius + 1) as u32;
    for channel in 0..4 {
        let mut sum: u32 = 0;
        for i in 0..=radius.min(len - 1) {
            sum += pixels[i * 4 + channel] as u32;
        }
        for i in 0..len {
            scratch[i * 4 + channel] = ((sum + window / 2) / window) as u8;
            let entering = i + radius + 1;
            if entering < len {
                sum += pixels[entering * 4 + channel] as u32;
            }
            if i >= radius {
                sum -= pixels[(i - radius) * 4 + channel] as u32;
            }
        }
    }
    pixels[..len * 4].copy_from_slice(&scratch[..len * 4]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel_alpha(surface: &mut cairo::ImageSurface, x: usize, y: usize) -> u8 {
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        // ARGB32 is native-endian; alpha is the high byte of the u32.
        let offset = y * stride + x * 4;
        let px = u32::from_ne_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]);
        (px >> 24) as u8
    }

    #[test]
    fn zero_sigma_is_identity() {
        assert_eq!(box_radius(0.0), 0);
        assert_eq!(box_radius(f64::NAN), 0);
        assert_eq!(blur_extent(-3.0), 0);
    }

    #[test]
    fn radius_grows_with_sigma() {
        assert!(box_radius(2.0) >= 1);
        assert!(box_radius(15.0) > box_radius(5.0));
    }

    #[test]
    fn blur_spreads_alpha_into_margin() {
        let mut surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 40, 40).unwrap();
        {
            let ctx = cairo::Context::new(&surface).unwrap();
            ctx.set_source_rgba(0.0, 0.0, 0.0, 1.0);
            ctx.rectangle(15.0, 15.0, 10.0, 10.0);
            ctx.fill().unwrap();
        }
        assert_eq!(pixel_alpha(&mut surface, 12, 20), 0);

        blur_surface(&mut surface, 3.0).unwrap();

        assert!(pixel_alpha(&mut surface, 12, 20) > 0);
        assert!(pixel_alpha(&mut surface, 20, 20) < 255);
        assert_eq!(pixel_alpha(&mut surface, 0, 0), 0);
    }

    #[test]
    fn constant_rows_stay_constant_away_from_edges() {
        let mut pixels = vec![80u8; 20 * 4];
        let mut scratch = vec![0u8; 20 * 4];
        box_pass(&mut pixels, 20, 2, &mut scratch);
        assert_eq!(pixels[10 * 4], 80);
        assert!(pixels[0] < 80);
    }
}
