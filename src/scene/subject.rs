//! Decoded subject image.

use super::manipulation::CropRect;
use log::warn;
use std::fmt;
use std::sync::Arc;

/// Immutable pixel source for the subject.
///
/// Pixels are stored premultiplied in Cairo's native-endian ARGB32 layout so a
/// render pass only has to wrap a copy of them in a surface. The buffer is
/// shared, which keeps snapshots cheap to clone and safe to hand to an export
/// worker while editing continues.
#[derive(Clone)]
pub struct SubjectImage {
    data: Arc<[u8]>,
    width: u32,
    height: u32,
}

impl SubjectImage {
    /// Builds a subject from straight (non-premultiplied) RGBA8 pixels.
    ///
    /// Returns `None` when a dimension is zero, exceeds what Cairo can address,
    /// or the buffer length does not match.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Option<Self> {
        if width == 0 || height == 0 || width > i32::MAX as u32 / 4 || height > i32::MAX as u32 {
            return None;
        }
        let expected = (width as usize).checked_mul(height as usize)?.checked_mul(4)?;
        if rgba.len() != expected {
            return None;
        }

        let data: Vec<u8> = rgba
            .chunks_exact(4)
            .flat_map(|px| premultiply_argb(px[0], px[1], px[2], px[3]).to_ne_bytes())
            .collect();

        Some(Self {
            data: data.into(),
            width,
            height,
        })
    }

    /// Natural width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Natural height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    fn stride(&self) -> i32 {
        self.width as i32 * 4
    }

    /// Wraps a copy of the pixels in a fresh Cairo surface.
    pub fn to_surface(&self) -> Result<cairo::ImageSurface, cairo::Error> {
        cairo::ImageSurface::create_for_data(
            self.data.to_vec(),
            cairo::Format::ARgb32,
            self.width as i32,
            self.height as i32,
            self.stride(),
        )
    }

    /// Region of the image used as the subject, in source pixels.
    ///
    /// The crop is intersected with the image bounds; a crop that ends up
    /// smaller than one pixel is ignored and the full image is used.
    pub fn source_rect(&self, crop: Option<CropRect>) -> CropRect {
        let full = CropRect::new(0.0, 0.0, self.width as f64, self.height as f64);
        let Some(crop) = crop else {
            return full;
        };

        let finite = [crop.x, crop.y, crop.width, crop.height]
            .iter()
            .all(|v| v.is_finite());
        if finite {
            let left = crop.x.max(0.0);
            let top = crop.y.max(0.0);
            let right = (crop.x + crop.width).min(full.width);
            let bottom = (crop.y + crop.height).min(full.height);
            if right - left >= 1.0 && bottom - top >= 1.0 {
                return CropRect::new(left, top, right - left, bottom - top);
            }
        }

        warn!(
            "Ignoring degenerate crop {:?} for {}x{} subject",
            crop, self.width, self.height
        );
        full
    }
}

impl fmt::Debug for SubjectImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubjectImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl PartialEq for SubjectImage {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.data == other.data
    }
}

fn premultiply_argb(r: u8, g: u8, b: u8, a: u8) -> u32 {
    let mul = |c: u8| ((c as u32 * a as u32 + 127) / 255) & 0xff;
    ((a as u32) << 24) | (mul(r) << 16) | (mul(g) << 8) | mul(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, px: [u8; 4]) -> SubjectImage {
        let rgba: Vec<u8> = std::iter::repeat_n(px, (width * height) as usize)
            .flatten()
            .collect();
        SubjectImage::from_rgba(width, height, &rgba).unwrap()
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert!(SubjectImage::from_rgba(0, 10, &[]).is_none());
        assert!(SubjectImage::from_rgba(2, 2, &[0; 12]).is_none());
    }

    #[test]
    fn premultiplies_alpha() {
        assert_eq!(premultiply_argb(255, 0, 0, 255), 0xffff0000);
        assert_eq!(premultiply_argb(255, 255, 255, 0), 0);
        assert_eq!(premultiply_argb(200, 100, 0, 128) >> 24, 128);
        assert_eq!((premultiply_argb(200, 100, 0, 128) >> 16) & 0xff, 100);
    }

    #[test]
    fn surface_has_natural_size() {
        let image = solid(7, 3, [10, 20, 30, 255]);
        let surface = image.to_surface().unwrap();
        assert_eq!((surface.width(), surface.height()), (7, 3));
    }

    #[test]
    fn crop_is_clamped_to_bounds() {
        let image = solid(100, 50, [0, 0, 0, 255]);
        assert_eq!(
            image.source_rect(Some(CropRect::new(-10.0, 10.0, 60.0, 100.0))),
            CropRect::new(0.0, 10.0, 50.0, 40.0)
        );
    }

    #[test]
    fn degenerate_crop_uses_full_image() {
        let image = solid(100, 50, [0, 0, 0, 255]);
        let full = CropRect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(image.source_rect(Some(CropRect::new(200.0, 0.0, 10.0, 10.0))), full);
        assert_eq!(image.source_rect(Some(CropRect::new(0.0, 0.0, 0.5, 10.0))), full);
        assert_eq!(image.source_rect(None), full);
    }
}
