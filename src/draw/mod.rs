//! Rendering primitives and layers (Cairo-based).
//!
//! Each layer of a composition has its own module:
//! - [`background`]: solid, gradient and placeholder fills
//! - [`subject`]: drop shadow, rounded clip, flips and the subject image
//! - [`render`]: annotations (strokes, shapes, numbered marks)
//! - [`chrome`]: the optional window title bar
//!
//! Supporting modules provide the geometry kernel, colors, fonts, the shadow
//! blur and scoped Cairo state.

pub mod annotation;
pub mod background;
pub mod blur;
pub mod chrome;
pub mod color;
pub mod font;
pub mod geometry;
pub mod render;
pub mod scope;
pub mod subject;

// Re-export commonly used types at module level
pub use annotation::{Annotation, ShapeKind, StrokeStyle};
pub use background::render_background;
pub use chrome::render_window_chrome;
pub use color::Color;
pub use font::FontDescriptor;
pub use geometry::{Point, ViewTransform};
pub use render::{render_annotations, render_centered_text};
pub use subject::{SubjectBounds, SubjectPlacement, composite_subject};

pub use color::{BLACK, BLUE, GREEN, ORANGE, PINK, RED, TRANSPARENT, WHITE, YELLOW};
