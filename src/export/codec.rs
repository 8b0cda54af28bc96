//! Surface codec: turns a finished ARGB32 surface into PNG or JPEG bytes.
//!
//! Both encoders read the same premultiplied surface; only the final
//! conversion step differs.

use super::types::{ExportError, ExportFormat};
use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;

/// Encodes `surface` in `format`.
///
/// The surface must not be the target of a live context.
pub fn encode_surface(
    surface: &mut cairo::ImageSurface,
    format: ExportFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>, ExportError> {
    surface.flush();
    match format {
        ExportFormat::Png => encode_png(surface),
        ExportFormat::Jpeg => encode_jpeg(surface, jpeg_quality),
    }
}

fn encode_png(surface: &cairo::ImageSurface) -> Result<Vec<u8>, ExportError> {
    let mut out = Vec::new();
    surface
        .write_to_png(&mut out)
        .map_err(|e| ExportError::Encode(format!("PNG: {e}")))?;
    log::debug!("Encoded PNG ({} bytes)", out.len());
    Ok(out)
}

fn encode_jpeg(surface: &mut cairo::ImageSurface, quality: u8) -> Result<Vec<u8>, ExportError> {
    let width = surface.width().max(0) as u32;
    let height = surface.height().max(0) as u32;
    let rgb = surface_to_rgb_over_white(surface)?;

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
        .encode(&rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| ExportError::Encode(format!("JPEG: {e}")))?;
    log::debug!("Encoded JPEG q{} ({} bytes)", quality, out.len());
    Ok(out)
}

/// Reads one premultiplied ARGB32 pixel as `(a, r, g, b)`.
fn read_argb(data: &[u8], offset: usize) -> (u8, u8, u8, u8) {
    let px = u32::from_ne_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ]);
    (
        (px >> 24) as u8,
        (px >> 16) as u8,
        (px >> 8) as u8,
        px as u8,
    )
}

fn for_each_pixel(
    surface: &mut cairo::ImageSurface,
    channels: usize,
    mut convert: impl FnMut((u8, u8, u8, u8), &mut [u8]),
) -> Result<Vec<u8>, ExportError> {
    let width = surface.width().max(0) as usize;
    let height = surface.height().max(0) as usize;
    let stride = surface.stride().max(0) as usize;
    let data = surface
        .data()
        .map_err(|e| ExportError::Encode(format!("surface not readable: {e}")))?;

    let mut out = vec![0u8; width * height * channels];
    for y in 0..height {
        for x in 0..width {
            let dst = (y * width + x) * channels;
            convert(read_argb(&data, y * stride + x * 4), &mut out[dst..dst + channels]);
        }
    }
    Ok(out)
}

/// Composites the surface over opaque white, yielding packed RGB8.
///
/// With premultiplied input, `c + (255 - a)` is exactly `c/a * a + 255 * (1 - a)`.
pub fn surface_to_rgb_over_white(
    surface: &mut cairo::ImageSurface,
) -> Result<Vec<u8>, ExportError> {
    for_each_pixel(surface, 3, |(a, r, g, b), out| {
        let backdrop = 255 - a;
        out[0] = r.saturating_add(backdrop);
        out[1] = g.saturating_add(backdrop);
        out[2] = b.saturating_add(backdrop);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half_red() -> cairo::ImageSurface {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 8, 4).unwrap();
        {
            let ctx = cairo::Context::new(&surface).unwrap();
            ctx.set_source_rgba(1.0, 0.0, 0.0, 0.5);
            ctx.paint().unwrap();
        }
        surface
    }

    #[test]
    fn png_has_signature_and_keeps_alpha() {
        let mut surface = half_red();
        let bytes = encode_surface(&mut surface, ExportFormat::Png, 92).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        let px = decoded.get_pixel(3, 2).0;
        assert_eq!(px[0], 255);
        assert!((127..=128).contains(&px[3]));
    }

    #[test]
    fn jpeg_is_flattened_onto_white() {
        let mut surface = half_red();
        let bytes = encode_surface(&mut surface, ExportFormat::Jpeg, 92).unwrap();
        assert_eq!(&bytes[..2], &[0xff, 0xd8]);

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (8, 4));
        let px = decoded.get_pixel(4, 2).0;
        assert!(px[0] > 245, "red {}", px[0]);
        assert!((110..=145).contains(&px[1]), "green {}", px[1]);
    }

    #[test]
    fn white_backdrop_math() {
        let mut surface = half_red();
        let rgb = surface_to_rgb_over_white(&mut surface).unwrap();
        assert_eq!(rgb[0], 255);
        assert!((127..=128).contains(&rgb[1]));
    }
}
