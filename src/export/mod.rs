//! Exporting a snapshot as an encoded image.
//!
//! This module provides:
//! - Synchronous and async export of a snapshot to PNG or JPEG bytes
//! - The surface codec shared by both formats
//! - File saving with timestamped names
//! - A background export manager with pollable status

pub mod codec;
pub mod file;
pub mod types;

mod manager;

pub use manager::ExportManager;
pub use types::{
    DEFAULT_JPEG_QUALITY, ExportError, ExportFormat, ExportOutcome, ExportResult, ExportSettings,
    ExportStatus,
};

use crate::pipeline;
use crate::scene::RenderSnapshot;

/// Renders `snapshot` at `settings.scale` and encodes it.
///
/// Fails with [`pipeline::RenderError::MissingSubject`] (wrapped) when there
/// is no subject; nothing is encoded in that case.
pub fn export_image(
    snapshot: &RenderSnapshot,
    settings: &ExportSettings,
) -> Result<Vec<u8>, ExportError> {
    let mut surface = pipeline::render_export(snapshot, settings.scale, &settings.render)?;
    codec::encode_surface(&mut surface, settings.format, settings.jpeg_quality)
}

/// Runs [`export_image`] on a blocking worker thread.
///
/// Takes the snapshot by value so the caller can keep editing its own copy.
pub async fn export_image_async(
    snapshot: RenderSnapshot,
    settings: ExportSettings,
) -> Result<Vec<u8>, ExportError> {
    tokio::task::spawn_blocking(move || export_image(&snapshot, &settings))
        .await
        .map_err(|e| ExportError::Task(e.to_string()))?
}
