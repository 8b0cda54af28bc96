//! Decoding uploaded or pasted bytes into a [`SubjectImage`].

use crate::scene::SubjectImage;
use std::path::Path;
use thiserror::Error;

/// Reasons an upload cannot become the subject. The current subject, if any,
/// is left untouched when any of these is returned.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a decodable image: {0}")]
    Unsupported(String),

    #[error("Image has unusable dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Decode task failed: {0}")]
    Task(String),
}

/// Decodes PNG or JPEG bytes.
pub fn decode_image(bytes: &[u8]) -> Result<SubjectImage, DecodeError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| DecodeError::Unsupported(e.to_string()))?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    log::debug!("Decoded {}x{} image ({} bytes)", width, height, bytes.len());

    SubjectImage::from_rgba(width, height, decoded.as_raw())
        .ok_or(DecodeError::InvalidDimensions { width, height })
}

/// Reads and decodes an image file without blocking the async runtime.
pub async fn load_subject(path: &Path) -> Result<SubjectImage, DecodeError> {
    let bytes = tokio::fs::read(path).await?;
    log::info!("Loaded {} ({} bytes)", path.display(), bytes.len());
    tokio::task::spawn_blocking(move || decode_image(&bytes))
        .await
        .map_err(|e| DecodeError::Task(e.to_string()))?
}
