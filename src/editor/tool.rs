//! Pointer tool selection.

use serde::{Deserialize, Serialize};

/// Pointer tool selection.
///
/// The active tool determines what a pointer press/drag/release creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Freehand stroke following the pointer
    Pen,
    /// Outline shape from drag start to drag end (kind set separately)
    Shape,
    /// Numbered mark placed on press
    Mark,
}
