//! Screenshot beautification engine.
//!
//! Composites a subject image onto a background with padding, rounded
//! corners, a drop shadow and an optional window title bar, then draws
//! annotations (strokes, shapes, numbered marks) on top. The same snapshot
//! renders to a preview surface or to an export raster at any scale with
//! identical geometry.

pub mod config;
pub mod draw;
pub mod editor;
pub mod export;
pub mod ingest;
pub mod pipeline;
pub mod scene;
pub mod util;

pub use config::Config;
pub use editor::Editor;
pub use scene::RenderSnapshot;
