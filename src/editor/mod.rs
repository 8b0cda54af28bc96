//! Editing layer: owns the current snapshot and turns setter calls and
//! pointer events into new snapshots.
//!
//! Renderers only ever see the snapshot by shared reference. Every committed
//! edit is pushed onto the undo history; the mark counter lives outside the
//! history so labels are never handed out twice.

pub mod history;
pub mod tool;

pub use history::History;
pub use tool::Tool;

use crate::config::Config;
use crate::draw::{Annotation, Color, Point, ShapeKind, StrokeStyle, color::RED};
use crate::export::{self, ExportError, ExportManager, ExportSettings, file::FileSaveConfig};
use crate::ingest::{self, DecodeError};
use crate::pipeline::{self, Composition, RenderError, RenderOptions};
use crate::scene::{
    BackgroundConfig, FrameConfig, ImageManipulation, LayoutConfig, RenderSnapshot, SubjectImage,
};
use log::{debug, info};

const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Current pointer interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingState {
    /// Not actively drawing - waiting for a press
    Idle,
    /// Pointer held down with the pen or shape tool
    Drawing {
        /// Tool the drag started with
        tool: Tool,
        /// Press position in annotation space
        start: Point,
        /// Latest pointer position
        current: Point,
        /// Accumulated points for freehand strokes
        points: Vec<Point>,
    },
}

/// Editing session for one subject image.
pub struct Editor {
    snapshot: RenderSnapshot,
    history: History<RenderSnapshot>,
    next_mark: u32,
    tool: Option<Tool>,
    stroke_style: StrokeStyle,
    shape_kind: ShapeKind,
    mark_color: Color,
    state: DrawingState,
    render_options: RenderOptions,
    /// Set whenever the preview is stale; cleared by the caller after redrawing.
    pub needs_redraw: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Editor with built-in defaults and no subject.
    pub fn new() -> Self {
        let snapshot = RenderSnapshot::default();
        Self {
            history: History::new(snapshot.clone(), DEFAULT_HISTORY_LIMIT),
            snapshot,
            next_mark: 1,
            tool: None,
            stroke_style: StrokeStyle::default(),
            shape_kind: ShapeKind::default(),
            mark_color: RED,
            state: DrawingState::Idle,
            render_options: RenderOptions::default(),
            needs_redraw: true,
        }
    }

    /// Editor whose drawing defaults, font and history depth come from `config`.
    pub fn from_config(config: &Config) -> Self {
        let snapshot = RenderSnapshot::default();
        let stroke_style = config.stroke_style();
        Self {
            history: History::new(snapshot.clone(), config.history.limit),
            snapshot,
            stroke_style,
            shape_kind: config.drawing.default_shape,
            mark_color: stroke_style.color,
            render_options: RenderOptions {
                bake_frame: true,
                font: config.font(),
            },
            ..Self::new()
        }
    }

    pub fn snapshot(&self) -> &RenderSnapshot {
        &self.snapshot
    }

    pub fn has_subject(&self) -> bool {
        self.snapshot.subject.is_some()
    }

    // ------------------------------------------------------------------
    // Subject
    // ------------------------------------------------------------------

    /// Installs a freshly decoded subject.
    ///
    /// Annotations are dropped, the mark counter restarts at 1 and the undo
    /// history is reset. Background, layout, manipulation and frame are kept.
    pub fn on_image_decoded(&mut self, subject: SubjectImage) {
        info!(
            "New subject {}x{}, clearing {} annotations",
            subject.width(),
            subject.height(),
            self.snapshot.annotations.len()
        );
        self.state = DrawingState::Idle;
        self.snapshot.subject = Some(subject);
        self.snapshot.annotations.clear();
        self.next_mark = 1;
        self.history.reset(self.snapshot.clone());
        self.needs_redraw = true;
    }

    /// Decodes `bytes` and installs the result. On failure the current
    /// subject and annotations are untouched.
    pub fn upload_bytes(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        let subject = ingest::decode_image(bytes)?;
        self.on_image_decoded(subject);
        Ok(())
    }

    /// Replaces everything but the subject with a loaded scene.
    ///
    /// Mark numbering continues after the highest label in the scene and
    /// never goes back, since undo can restore marks placed earlier.
    pub fn apply_scene(&mut self, scene: RenderSnapshot) {
        let subject = self.snapshot.subject.take();
        let scene_next = scene
            .annotations
            .iter()
            .filter_map(Annotation::mark_label)
            .max()
            .map_or(1, |max| max.saturating_add(1));
        self.next_mark = self.next_mark.max(scene_next);
        self.snapshot = RenderSnapshot { subject, ..scene };
        self.commit();
    }

    // ------------------------------------------------------------------
    // Config setters
    // ------------------------------------------------------------------

    pub fn set_background(&mut self, background: BackgroundConfig) {
        if self.snapshot.background != background {
            self.snapshot.background = background;
            self.commit();
        }
    }

    pub fn set_layout(&mut self, layout: LayoutConfig) {
        if self.snapshot.layout != layout {
            self.snapshot.layout = layout;
            self.commit();
        }
    }

    pub fn set_frame(&mut self, frame: FrameConfig) {
        if self.snapshot.frame != frame {
            self.snapshot.frame = frame;
            self.commit();
        }
    }

    pub fn set_image_manipulation(&mut self, manipulation: ImageManipulation) {
        if self.snapshot.manipulation != manipulation {
            self.snapshot.manipulation = manipulation;
            self.commit();
        }
    }

    // ------------------------------------------------------------------
    // Tools
    // ------------------------------------------------------------------

    /// Selects the pointer tool; `None` disables annotation input.
    pub fn set_tool(&mut self, tool: Option<Tool>) {
        self.cancel_drawing();
        self.tool = tool;
    }

    pub fn tool(&self) -> Option<Tool> {
        self.tool
    }

    pub fn set_stroke_style(&mut self, style: StrokeStyle) {
        self.stroke_style = style;
    }

    pub fn stroke_style(&self) -> StrokeStyle {
        self.stroke_style
    }

    pub fn set_shape_kind(&mut self, kind: ShapeKind) {
        self.shape_kind = kind;
    }

    pub fn set_mark_color(&mut self, color: Color) {
        self.mark_color = color;
    }

    /// Label the next mark will get.
    pub fn next_mark_label(&self) -> u32 {
        self.next_mark
    }

    pub fn drawing_state(&self) -> &DrawingState {
        &self.state
    }

    // ------------------------------------------------------------------
    // Pointer input (annotation space)
    // ------------------------------------------------------------------

    /// Handles a press. Marks are placed immediately; pen and shape start a drag.
    ///
    /// Ignored without a subject or tool, or while a drag is in progress.
    pub fn pointer_down(&mut self, point: Point) {
        let Some(tool) = self.tool else {
            return;
        };
        if !self.has_subject() || !matches!(self.state, DrawingState::Idle) {
            return;
        }

        match tool {
            Tool::Mark => {
                let label = self.next_mark;
                self.next_mark = self.next_mark.saturating_add(1);
                debug!("Placing mark {} at ({:.1}, {:.1})", label, point.x, point.y);
                self.snapshot
                    .annotations
                    .push(Annotation::mark(point, label, self.mark_color));
                self.commit();
            }
            Tool::Pen | Tool::Shape => {
                self.state = DrawingState::Drawing {
                    tool,
                    start: point,
                    current: point,
                    points: vec![point],
                };
                self.needs_redraw = true;
            }
        }
    }

    /// Extends the current drag.
    pub fn pointer_move(&mut self, point: Point) {
        if let DrawingState::Drawing {
            tool,
            current,
            points,
            ..
        } = &mut self.state
        {
            *current = point;
            if *tool == Tool::Pen {
                points.push(point);
            }
            self.needs_redraw = true;
        }
    }

    /// Finishes the current drag and commits its annotation.
    ///
    /// Strokes with fewer than two points and shapes without extent are
    /// discarded.
    pub fn pointer_up(&mut self, point: Point) {
        self.pointer_move(point);
        let state = std::mem::replace(&mut self.state, DrawingState::Idle);
        if matches!(state, DrawingState::Idle) {
            return;
        }
        self.needs_redraw = true;

        match self.annotation_for(&state) {
            Some(annotation) => {
                self.snapshot.annotations.push(annotation);
                self.commit();
            }
            None => debug!("Discarding empty annotation"),
        }
    }

    /// Abandons a drag without committing anything.
    pub fn cancel_drawing(&mut self) {
        if !matches!(self.state, DrawingState::Idle) {
            self.state = DrawingState::Idle;
            self.needs_redraw = true;
        }
    }

    /// What the drag in progress would commit if released now.
    pub fn provisional_annotation(&self) -> Option<Annotation> {
        self.annotation_for(&self.state)
    }

    fn annotation_for(&self, state: &DrawingState) -> Option<Annotation> {
        let DrawingState::Drawing {
            tool,
            start,
            current,
            points,
        } = state
        else {
            return None;
        };

        match tool {
            Tool::Pen if points.len() >= 2 => {
                Some(Annotation::stroke(points.clone(), self.stroke_style))
            }
            Tool::Shape => {
                let dx = (current.x - start.x).abs();
                let dy = (current.y - start.y).abs();
                let empty = if self.shape_kind.is_boxed() {
                    dx == 0.0 || dy == 0.0
                } else {
                    dx == 0.0 && dy == 0.0
                };
                (!empty).then(|| {
                    Annotation::shape(self.shape_kind, *start, *current, self.stroke_style)
                })
            }
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Annotation list
    // ------------------------------------------------------------------

    /// Removes the annotation at `index` (draw order). Returns it if it existed.
    pub fn remove_annotation(&mut self, index: usize) -> Option<Annotation> {
        if index >= self.snapshot.annotations.len() {
            return None;
        }
        let removed = self.snapshot.annotations.remove(index);
        self.commit();
        Some(removed)
    }

    /// Removes the topmost annotation whose bounds contain `point`.
    pub fn remove_annotation_at(&mut self, point: Point) -> Option<Annotation> {
        let index = self
            .snapshot
            .annotations
            .iter()
            .rposition(|annotation| annotation.hit_test(point))?;
        self.remove_annotation(index)
    }

    pub fn clear_annotations(&mut self) {
        if !self.snapshot.annotations.is_empty() {
            self.snapshot.annotations.clear();
            self.commit();
        }
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    fn commit(&mut self) {
        self.history.push(self.snapshot.clone());
        self.needs_redraw = true;
    }

    /// Restores the previous committed snapshot. Returns `false` at the start.
    pub fn undo(&mut self) -> bool {
        self.cancel_drawing();
        match self.history.undo() {
            Some(previous) => {
                self.snapshot = previous.clone();
                self.needs_redraw = true;
                true
            }
            None => false,
        }
    }

    /// Re-applies an undone snapshot. Returns `false` when nothing was undone.
    pub fn redo(&mut self) -> bool {
        self.cancel_drawing();
        match self.history.redo() {
            Some(next) => {
                self.snapshot = next.clone();
                self.needs_redraw = true;
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Maps a pixel on a surface rendered at `scale` into annotation space.
    ///
    /// Returns `None` without a subject.
    pub fn surface_to_annotation(&self, surface_point: Point, scale: f64) -> Option<Point> {
        let composition = Composition::resolve(&self.snapshot)?;
        Some(composition.view(scale).to_local(surface_point))
    }

    /// Renders the preview for `viewport`, including a drag in progress.
    ///
    /// The preview always shows the window chrome of an enabled frame.
    pub fn render_preview(
        &self,
        viewport: (i32, i32),
    ) -> Result<(cairo::ImageSurface, f64), RenderError> {
        match self.provisional_annotation() {
            Some(provisional) => {
                let mut snapshot = self.snapshot.clone();
                snapshot.annotations.push(provisional);
                pipeline::render_preview(&snapshot, viewport, &self.render_options)
            }
            None => pipeline::render_preview(&self.snapshot, viewport, &self.render_options),
        }
    }

    /// Renders and encodes the committed snapshot.
    pub fn export(&self, settings: &ExportSettings) -> Result<Vec<u8>, ExportError> {
        export::export_image(&self.snapshot, settings)
    }

    /// Hands a copy of the committed snapshot to a background export.
    pub fn request_export(
        &self,
        manager: &ExportManager,
        settings: ExportSettings,
        save_config: Option<FileSaveConfig>,
    ) -> Result<(), ExportError> {
        manager.request_export(self.snapshot.clone(), settings, save_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::BLUE;
    use crate::scene::PositionPreset;

    fn subject() -> SubjectImage {
        SubjectImage::from_rgba(100, 80, &[200u8; 100 * 80 * 4]).unwrap()
    }

    fn editor_with_subject() -> Editor {
        let mut editor = Editor::new();
        editor.on_image_decoded(subject());
        editor
    }

    fn labels(editor: &Editor) -> Vec<u32> {
        editor
            .snapshot()
            .annotations
            .iter()
            .filter_map(Annotation::mark_label)
            .collect()
    }

    #[test]
    fn pointer_input_is_ignored_without_subject() {
        let mut editor = Editor::new();
        editor.set_tool(Some(Tool::Mark));
        editor.pointer_down(Point::new(5.0, 5.0));
        assert!(editor.snapshot().annotations.is_empty());
        assert_eq!(editor.next_mark_label(), 1);
    }

    #[test]
    fn mark_labels_increase_and_are_never_reused() {
        let mut editor = editor_with_subject();
        editor.set_tool(Some(Tool::Mark));
        editor.pointer_down(Point::new(10.0, 10.0));
        editor.pointer_down(Point::new(20.0, 20.0));
        editor.pointer_down(Point::new(30.0, 30.0));
        assert_eq!(labels(&editor), vec![1, 2, 3]);

        assert!(editor.remove_annotation(1).is_some());
        assert!(editor.undo());
        assert!(editor.undo());
        assert_eq!(labels(&editor), vec![1, 2]);

        editor.pointer_down(Point::new(40.0, 40.0));
        assert_eq!(labels(&editor), vec![1, 2, 4]);
    }

    #[test]
    fn new_upload_resets_marks_and_history() {
        let mut editor = editor_with_subject();
        editor.set_tool(Some(Tool::Mark));
        editor.pointer_down(Point::new(10.0, 10.0));
        editor.set_background(BackgroundConfig::preset("Nebula").unwrap());

        editor.on_image_decoded(subject());
        assert!(editor.snapshot().annotations.is_empty());
        assert_eq!(editor.next_mark_label(), 1);
        assert!(!editor.can_undo());
        // Configuration survives the upload.
        assert_eq!(
            editor.snapshot().background,
            BackgroundConfig::preset("Nebula").unwrap()
        );
    }

    #[test]
    fn failed_upload_keeps_current_subject() {
        let mut editor = editor_with_subject();
        editor.set_tool(Some(Tool::Mark));
        editor.pointer_down(Point::new(1.0, 1.0));

        assert!(editor.upload_bytes(b"nope").is_err());
        assert!(editor.has_subject());
        assert_eq!(editor.snapshot().annotations.len(), 1);
    }

    #[test]
    fn pen_drag_commits_a_stroke() {
        let mut editor = editor_with_subject();
        editor.set_tool(Some(Tool::Pen));
        editor.pointer_down(Point::new(0.0, 0.0));
        editor.pointer_move(Point::new(5.0, 5.0));
        assert!(editor.provisional_annotation().is_some());
        editor.pointer_up(Point::new(10.0, 0.0));

        match &editor.snapshot().annotations[..] {
            [Annotation::Stroke { points, .. }] => assert_eq!(points.len(), 3),
            other => panic!("unexpected annotations {other:?}"),
        }
        assert_eq!(*editor.drawing_state(), DrawingState::Idle);
    }

    #[test]
    fn shape_drag_is_normalised_and_empty_drags_are_dropped() {
        let mut editor = editor_with_subject();
        editor.set_tool(Some(Tool::Shape));
        editor.set_shape_kind(ShapeKind::Rectangle);

        editor.pointer_down(Point::new(50.0, 40.0));
        editor.pointer_up(Point::new(10.0, 20.0));
        assert_eq!(
            editor.snapshot().annotations[0],
            Annotation::shape(
                ShapeKind::Rectangle,
                Point::new(10.0, 20.0),
                Point::new(50.0, 40.0),
                StrokeStyle::default()
            )
        );

        editor.pointer_down(Point::new(5.0, 5.0));
        editor.pointer_up(Point::new(5.0, 5.0));
        assert_eq!(editor.snapshot().annotations.len(), 1);
    }

    #[test]
    fn cancel_discards_drag() {
        let mut editor = editor_with_subject();
        editor.set_tool(Some(Tool::Pen));
        editor.pointer_down(Point::new(0.0, 0.0));
        editor.pointer_move(Point::new(3.0, 3.0));
        editor.cancel_drawing();
        editor.pointer_up(Point::new(6.0, 6.0));
        assert!(editor.snapshot().annotations.is_empty());
    }

    #[test]
    fn undo_redo_restores_config_slices() {
        let mut editor = editor_with_subject();
        let original = editor.snapshot().manipulation;
        let moved = original.with_position_preset(PositionPreset::TopLeft);

        editor.set_image_manipulation(moved);
        assert!(editor.undo());
        assert_eq!(editor.snapshot().manipulation, original);
        assert!(editor.redo());
        assert_eq!(editor.snapshot().manipulation, moved);
        assert!(!editor.redo());
    }

    #[test]
    fn setting_identical_value_does_not_create_history() {
        let mut editor = editor_with_subject();
        editor.set_layout(LayoutConfig::default());
        assert!(!editor.can_undo());
    }

    #[test]
    fn remove_at_point_takes_topmost() {
        let mut editor = editor_with_subject();
        editor.set_tool(Some(Tool::Mark));
        editor.pointer_down(Point::new(20.0, 20.0));
        editor.set_mark_color(BLUE);
        editor.pointer_down(Point::new(24.0, 20.0));

        let removed = editor.remove_annotation_at(Point::new(22.0, 20.0)).unwrap();
        assert_eq!(removed.mark_label(), Some(2));
        assert_eq!(labels(&editor), vec![1]);
        assert!(editor.remove_annotation_at(Point::new(90.0, 90.0)).is_none());
    }

    #[test]
    fn surface_points_map_back_to_annotation_space() {
        let editor = editor_with_subject();
        // Default layout: 64 padding, no frame.
        let local = editor
            .surface_to_annotation(Point::new(148.0, 148.0), 2.0)
            .unwrap();
        assert_eq!(local, Point::new(10.0, 10.0));
        assert!(Editor::new().surface_to_annotation(local, 1.0).is_none());
    }

    #[test]
    fn apply_scene_continues_mark_numbering() {
        let mut editor = editor_with_subject();
        let mut scene = RenderSnapshot::default();
        scene
            .annotations
            .push(Annotation::mark(Point::new(1.0, 1.0), 7, RED));
        editor.apply_scene(scene);

        assert!(editor.has_subject());
        assert_eq!(editor.next_mark_label(), 8);
    }

    #[test]
    fn apply_scene_never_lowers_mark_counter() {
        let mut editor = editor_with_subject();
        editor.set_tool(Some(Tool::Mark));
        editor.pointer_down(Point::new(10.0, 10.0));
        editor.pointer_down(Point::new(20.0, 20.0));
        editor.pointer_down(Point::new(30.0, 30.0));

        editor.apply_scene(RenderSnapshot::default());
        assert!(editor.snapshot().annotations.is_empty());
        assert_eq!(editor.next_mark_label(), 4);

        assert!(editor.undo());
        assert_eq!(labels(&editor), vec![1, 2, 3]);
        editor.pointer_down(Point::new(40.0, 40.0));
        assert_eq!(labels(&editor), vec![1, 2, 3, 4]);
    }

    #[test]
    fn preview_includes_drag_in_progress() {
        let mut editor = editor_with_subject();
        editor.set_tool(Some(Tool::Shape));
        editor.pointer_down(Point::new(0.0, 0.0));
        editor.pointer_move(Point::new(30.0, 30.0));
        let (surface, scale) = editor.render_preview((228, 208)).unwrap();
        assert_eq!(scale, 1.0);
        assert_eq!((surface.width(), surface.height()), (228, 208));
        assert!(editor.snapshot().annotations.is_empty());
    }

    #[test]
    fn from_config_uses_drawing_defaults() {
        let mut config = Config::default();
        config.drawing.default_shape = ShapeKind::Arrow;
        config.drawing.default_stroke_width = 9.0;
        let editor = Editor::from_config(&config);
        assert_eq!(editor.stroke_style().width, 9.0);
        assert_eq!(editor.shape_kind, ShapeKind::Arrow);
    }
}
