//! Drawing surface controller.
//!
//! Turns pointer and keyboard events into element-collection changes. The
//! controller owns the live collection; every committed change replaces it
//! wholesale and is preceded by a history record.

use std::fmt;
use std::sync::Arc;

use kurbo::{Point, Rect, Size, Vec2};
use thiserror::Error;

use crate::config::BoardConfig;
use crate::coords::{path_to_normalized, path_to_pixels, to_normalized, to_pixel};
use crate::elements::{
    Arrow, ArrowKind, DrawingElement, ElementCollection, ElementError, ElementId, Marker,
    MarkerKind, RinkColor, TextLabel,
};
use crate::geometry::{ApproximateTextMeasure, HitOptions, TextMeasure, hit_test_with, topmost_hit};
use crate::history::History;
use crate::input::{Instant, Key, KeyEvent, Modifiers, MouseButton, MoveThrottle, PointerEvent};
use crate::selection::SelectionSet;
use crate::smoothing::{add_point_to_path, simplify_path};
use crate::storage::StorageError;
use crate::tools::{Mode, Tool, ToolError};

/// Errors surfaced to the host.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error(transparent)]
    Element(#[from] ElementError),
    #[error("Persistence failed: {0}")]
    Persistence(#[from] StorageError),
}

/// Text metrics shared with the renderer.
pub type SharedTextMeasure = Arc<dyn TextMeasure + Send + Sync>;

/// Pointer gesture in progress.
#[derive(Debug, Clone)]
enum Gesture {
    None,
    /// Capturing an arrow, held outside the committed collection.
    Drawing { arrow: Arrow },
    /// Dragging selected elements. `base` is the collection at pointer-down.
    Moving {
        origin: Point,
        base: ElementCollection,
        ids: Vec<ElementId>,
        recorded: bool,
    },
}

/// The drawing surface controller.
#[derive(Clone)]
pub struct Canvas {
    elements: ElementCollection,
    selection: SelectionSet,
    history: History,
    tool: Tool,
    mode: Mode,
    gesture: Gesture,
    /// Canvas rectangle in screen coordinates.
    canvas_rect: Rect,
    color: RinkColor,
    config: BoardConfig,
    throttle: MoveThrottle,
    text_measure: SharedTextMeasure,
    dirty: bool,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("elements", &self.elements.len())
            .field("selection", &self.selection)
            .field("tool", &self.tool)
            .field("mode", &self.mode)
            .field("gesture", &self.gesture)
            .field("canvas_rect", &self.canvas_rect)
            .field("color", &self.color)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl Canvas {
    /// Create an empty board with default settings.
    pub fn new() -> Self {
        Self::with_config(BoardConfig::default())
    }

    pub fn with_config(config: BoardConfig) -> Self {
        Self {
            elements: ElementCollection::new(),
            selection: SelectionSet::new(),
            history: History::new(config.history_limit),
            tool: Tool::default(),
            mode: Tool::default().resting_mode(),
            gesture: Gesture::None,
            canvas_rect: Rect::new(0.0, 0.0, 800.0, 400.0),
            color: config.default_color,
            throttle: MoveThrottle::from_hz(config.move_throttle_hz),
            text_measure: Arc::new(ApproximateTextMeasure),
            dirty: false,
            config,
        }
    }

    /// Create a board showing previously stored elements.
    pub fn with_elements(elements: ElementCollection, config: BoardConfig) -> Self {
        let mut canvas = Self::with_config(config);
        canvas.load_elements(elements);
        canvas
    }

    // --- State access ---

    pub fn elements(&self) -> &ElementCollection {
        &self.elements
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn color(&self) -> RinkColor {
        self.color
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn canvas_rect(&self) -> Rect {
        self.canvas_rect
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas_rect.size()
    }

    pub fn text_measure(&self) -> &SharedTextMeasure {
        &self.text_measure
    }

    /// Arrow being captured, for preview rendering.
    pub fn in_progress(&self) -> Option<DrawingElement> {
        match &self.gesture {
            Gesture::Drawing { arrow } => Some(DrawingElement::Arrow(arrow.clone())),
            _ => None,
        }
    }

    /// Whether a pointer gesture is running. Persistence waits for it to end.
    pub fn is_gesture_active(&self) -> bool {
        !matches!(self.gesture, Gesture::None)
    }

    /// Label whose text the host should show an input for.
    pub fn editing_element(&self) -> Option<&TextLabel> {
        match self.mode {
            Mode::TextEdit(id) => self.elements.get(id).and_then(DrawingElement::as_text),
            _ => None,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return and clear the unsaved-changes flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Elements as they should be handed to the store.
    pub fn elements_for_persistence(&self) -> Vec<DrawingElement> {
        self.elements.to_persisted()
    }

    // --- Host configuration ---

    /// Update the canvas rectangle after a layout change.
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    /// Use real font metrics for text hit testing.
    pub fn set_text_measure(&mut self, measure: SharedTextMeasure) {
        self.text_measure = measure;
    }

    /// Color for newly created elements.
    pub fn set_color(&mut self, color: RinkColor) {
        self.color = color;
    }

    /// Select a tool by id, e.g. `"pass"` or `"goalie"`.
    pub fn set_tool(&mut self, id: &str) -> Result<(), CanvasError> {
        let tool: Tool = id.parse()?;
        self.select_tool(tool);
        Ok(())
    }

    pub fn select_tool(&mut self, tool: Tool) {
        if self.is_gesture_active() {
            self.pointer_cancel();
        }
        if matches!(self.mode, Mode::TextEdit(_)) {
            self.commit_text_edit();
        }
        log::debug!("Tool changed: {} -> {}", self.tool, tool);
        self.tool = tool;
        self.mode = tool.resting_mode();
    }

    /// Replace the board with loaded elements. History and selection reset.
    pub fn load_elements(&mut self, elements: ElementCollection) {
        self.elements = elements.without_editing();
        self.selection.clear();
        self.history.clear();
        self.gesture = Gesture::None;
        self.mode = self.tool.resting_mode();
        self.dirty = false;
    }

    // --- Pointer input ---

    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
                modifiers,
            } => self.pointer_down(position, modifiers),
            PointerEvent::Down { .. } => {}
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up {
                position,
                button: MouseButton::Left,
            } => self.pointer_up(position),
            PointerEvent::Up { .. } => {}
            PointerEvent::Cancel => self.pointer_cancel(),
        }
    }

    /// Primary button pressed at a screen position.
    pub fn pointer_down(&mut self, screen: Point, modifiers: Modifiers) {
        if self.is_gesture_active() {
            self.pointer_cancel();
        }
        let point = to_normalized(screen, self.canvas_rect);
        self.throttle.reset();

        if let Mode::TextEdit(editing) = self.mode {
            if self.tool == Tool::Text && self.label_at(point) == Some(editing) {
                return;
            }
            // Clicking elsewhere blurs the text input.
            self.commit_text_edit();
        }

        match self.tool {
            Tool::Select => self.select_at(point, modifiers),
            Tool::Arrow(kind) => self.begin_arrow(kind, point),
            Tool::Marker(kind) => self.place_marker(kind, point),
            Tool::Text => self.begin_text_edit(point),
            Tool::Erase => self.erase_at(point),
        }
    }

    /// Pointer moved, throttled against the wall clock.
    pub fn pointer_move(&mut self, screen: Point) {
        self.pointer_move_at(screen, Instant::now());
    }

    /// Pointer moved at `now`. Moves arriving faster than the throttle rate
    /// are dropped.
    pub fn pointer_move_at(&mut self, screen: Point, now: Instant) {
        if !self.is_gesture_active() || !self.throttle.should_process(now) {
            return;
        }
        let point = to_normalized(screen, self.canvas_rect);
        self.track_pointer(point);
    }

    /// Primary button released. Commits the running gesture.
    pub fn pointer_up(&mut self, screen: Point) {
        if !self.is_gesture_active() {
            return;
        }
        let point = to_normalized(screen, self.canvas_rect);
        self.track_pointer(point);
        self.end_gesture();
    }

    /// Pointer released outside the canvas or capture lost. Treated like a
    /// release at the last tracked position.
    pub fn pointer_cancel(&mut self) {
        self.end_gesture();
    }

    fn track_pointer(&mut self, point: Point) {
        let size = self.canvas_size();
        let min_distance = self.config.min_point_distance_px;

        match &mut self.gesture {
            Gesture::None => {}
            Gesture::Drawing { arrow } => {
                let captured = path_to_pixels(&arrow.path, size);
                let before = captured.len();
                let filtered = add_point_to_path(captured, to_pixel(point, size), min_distance);
                if filtered.len() > before {
                    *arrow = arrow.append_point(point);
                }
            }
            Gesture::Moving {
                origin,
                base,
                ids,
                recorded,
            } => {
                let delta = point - *origin;
                if !*recorded {
                    if delta == Vec2::ZERO {
                        return;
                    }
                    self.history.record(base);
                    *recorded = true;
                    log::debug!("Moving {} element(s)", ids.len());
                }
                self.elements = base.map(|e| {
                    if ids.contains(&e.id()) {
                        e.translated(delta)
                    } else {
                        e.clone()
                    }
                });
            }
        }
    }

    fn end_gesture(&mut self) {
        match std::mem::replace(&mut self.gesture, Gesture::None) {
            Gesture::None => {}
            Gesture::Drawing { arrow } => self.finish_arrow(arrow),
            Gesture::Moving { recorded, .. } => {
                if recorded {
                    self.dirty = true;
                }
            }
        }
    }

    /// Drop the running gesture without committing it.
    fn abort_gesture(&mut self) {
        match std::mem::replace(&mut self.gesture, Gesture::None) {
            Gesture::None => {}
            Gesture::Drawing { .. } => {
                self.history.discard_last();
                self.mode = self.tool.resting_mode();
                log::debug!("Arrow capture aborted");
            }
            Gesture::Moving { base, recorded, .. } => {
                if recorded {
                    self.history.discard_last();
                    self.elements = base;
                }
            }
        }
    }

    fn hit_options(&self) -> HitOptions<'_> {
        HitOptions {
            arrow_tolerance: self.config.arrow_hit_tolerance_px,
            text_measure: self.text_measure.as_ref(),
        }
    }

    /// Topmost element under a normalized point.
    fn hit(&self, point: Point) -> Option<ElementId> {
        let size = self.canvas_size();
        topmost_hit(&self.elements, to_pixel(point, size), size, &self.hit_options())
    }

    /// Topmost text label under a normalized point, ignoring other elements.
    fn label_at(&self, point: Point) -> Option<ElementId> {
        let size = self.canvas_size();
        let pixel = to_pixel(point, size);
        let options = self.hit_options();
        self.elements
            .iter()
            .rev()
            .filter(|e| e.as_text().is_some())
            .find(|e| hit_test_with(e, pixel, size, &options))
            .map(DrawingElement::id)
    }

    /// Topmost element under a screen position, for hover feedback.
    pub fn element_at(&self, screen: Point) -> Option<ElementId> {
        self.hit(to_normalized(screen, self.canvas_rect))
    }

    fn select_at(&mut self, point: Point, modifiers: Modifiers) {
        let Some(id) = self.hit(point) else {
            self.selection.clear();
            return;
        };
        if modifiers.extends_selection() {
            self.selection.add(id);
        } else if !self.selection.contains(id) {
            self.selection.replace(id);
        }
        self.gesture = Gesture::Moving {
            origin: point,
            base: self.elements.clone(),
            ids: self.selection.ids().to_vec(),
            recorded: false,
        };
    }

    fn begin_arrow(&mut self, kind: ArrowKind, point: Point) {
        self.history.record(&self.elements);
        self.gesture = Gesture::Drawing {
            arrow: Arrow::new(kind, point, self.color),
        };
        self.mode = Mode::Draw(kind);
        log::debug!("Arrow capture started: {kind}");
    }

    fn finish_arrow(&mut self, arrow: Arrow) {
        self.mode = self.tool.resting_mode();

        let size = self.canvas_size();
        let pixels = path_to_pixels(&arrow.path, size);
        let simplified = simplify_path(&pixels, self.config.simplify_tolerance_px);
        let mut path = path_to_normalized(&simplified, size);
        // Keep the captured endpoints bit-exact.
        if let (Some(first), Some(start)) = (path.first_mut(), arrow.path.first()) {
            *first = *start;
        }
        if let (Some(last), Some(end)) = (path.last_mut(), arrow.path.last()) {
            *last = *end;
        }

        match arrow.with_path(path).finalize() {
            Ok(arrow) => {
                log::debug!(
                    "Arrow committed: {} with {} point(s)",
                    arrow.kind,
                    arrow.path.len()
                );
                self.elements = self.elements.with_pushed(arrow.into());
                self.dirty = true;
            }
            Err(err) => {
                self.history.discard_last();
                log::warn!("Discarding arrow: {err}");
            }
        }
    }

    fn place_marker(&mut self, kind: MarkerKind, point: Point) {
        self.history.record(&self.elements);
        let marker = Marker::new(kind, point, self.color);
        log::debug!("Marker placed: {kind} at ({:.3}, {:.3})", point.x, point.y);
        self.elements = self.elements.with_pushed(marker.into());
        self.mode = Mode::PlaceSingleClick(kind);
        self.dirty = true;
    }

    fn erase_at(&mut self, point: Point) {
        let Some(id) = self.hit(point) else {
            return;
        };
        self.history.record(&self.elements);
        self.elements = self.elements.without(&[id]);
        self.selection.retain_existing(&self.elements);
        self.dirty = true;
    }

    // --- Text editing ---

    fn begin_text_edit(&mut self, point: Point) {
        self.history.record(&self.elements);

        let id = match self.label_at(point) {
            Some(id) => {
                self.elements = self.elements.map(|e| match e {
                    DrawingElement::TextLabel(t) => {
                        let mut t = t.clone();
                        t.is_editing = t.id() == id;
                        DrawingElement::TextLabel(t)
                    }
                    other => other.clone(),
                });
                id
            }
            None => {
                let mut label = TextLabel::new(
                    point,
                    self.config.placeholder_label.clone(),
                    self.config.default_font_size,
                    self.color,
                );
                label.is_editing = true;
                let id = label.id();
                self.elements = self.elements.without_editing().with_pushed(label.into());
                id
            }
        };
        log::debug!("Text edit started: {id}");
        self.mode = Mode::TextEdit(id);
    }

    /// Live text from the host's input while a label is being edited.
    ///
    /// Returns `false` when no label is being edited.
    pub fn set_editing_text(&mut self, text: &str) -> bool {
        let Some(label) = self.editing_element() else {
            return false;
        };
        let mut label = label.clone();
        label.label = text.to_string();
        self.elements = self.elements.with_replaced(label.into());
        true
    }

    /// Finish editing (blur, Enter or Escape). Blank text falls back to the
    /// placeholder. Takes no extra history record.
    pub fn commit_text_edit(&mut self) {
        let Mode::TextEdit(id) = self.mode else {
            return;
        };
        self.mode = self.tool.resting_mode();

        let committed = self.elements.get(id).and_then(DrawingElement::as_text).map(|label| {
            let trimmed = label.label.trim();
            let text = if trimmed.is_empty() {
                self.config.placeholder_label.clone()
            } else {
                trimmed.to_string()
            };
            TextLabel {
                label: text,
                is_editing: false,
                ..label.clone()
            }
        });
        if let Some(label) = committed {
            self.elements = self.elements.with_replaced(label.into());
        }
        self.elements = self.elements.without_editing();
        self.dirty = true;
        log::debug!("Text edit committed: {id}");
    }

    /// Clear every editing flag without touching the text.
    pub fn cancel_text_edit(&mut self) {
        let was_editing = self.elements.editing_id().is_some();
        if let Mode::TextEdit(_) = self.mode {
            self.mode = self.tool.resting_mode();
        }
        if was_editing {
            self.elements = self.elements.without_editing();
            self.dirty = true;
        }
    }

    // --- Keyboard and commands ---

    /// Handle a key press. Returns whether the key was consumed.
    ///
    /// While a label is being edited only Enter and Escape are consumed; all
    /// other keys belong to the host's text input.
    pub fn key_down(&mut self, event: &KeyEvent) -> bool {
        if let Mode::TextEdit(_) = self.mode {
            return match event.key {
                Key::Escape => {
                    self.commit_text_edit();
                    true
                }
                Key::Enter if !event.modifiers.shift => {
                    self.commit_text_edit();
                    true
                }
                _ => false,
            };
        }

        if event.is_command('z') {
            if event.modifiers.shift {
                self.redo();
            } else {
                self.undo();
            }
            return true;
        }
        if event.is_command('y') {
            self.redo();
            return true;
        }
        if event.is_command('d') {
            self.duplicate_selected();
            return true;
        }
        if event.is_command('a') {
            self.select_all();
            return true;
        }

        match event.key {
            Key::Delete | Key::Backspace => self.delete_selected(),
            Key::Escape => {
                self.abort_gesture();
                self.cancel_text_edit();
                self.selection.clear();
                true
            }
            _ => false,
        }
    }

    /// Remove every selected element. Returns `false` when nothing was
    /// selected.
    pub fn delete_selected(&mut self) -> bool {
        self.selection.retain_existing(&self.elements);
        if self.selection.is_empty() || self.is_gesture_active() {
            return false;
        }
        self.history.record(&self.elements);
        self.elements = self.elements.without(self.selection.ids());
        log::debug!("Deleted {} element(s)", self.selection.len());
        self.selection.clear();
        self.dirty = true;
        true
    }

    /// Remove every element. No-op on an empty board.
    pub fn clear_all(&mut self) -> bool {
        self.abort_gesture();
        self.cancel_text_edit();
        if self.elements.is_empty() {
            return false;
        }
        self.history.record(&self.elements);
        self.elements = ElementCollection::new();
        self.selection.clear();
        self.dirty = true;
        log::debug!("Board cleared");
        true
    }

    /// Append offset copies of the selection and select them.
    pub fn duplicate_selected(&mut self) -> bool {
        self.selection.retain_existing(&self.elements);
        if self.selection.is_empty() || self.is_gesture_active() {
            return false;
        }
        let offset = Vec2::new(self.config.duplicate_offset, self.config.duplicate_offset);
        let copies: Vec<DrawingElement> = self
            .elements
            .iter()
            .filter(|e| self.selection.contains(e.id()))
            .map(|e| e.duplicate(offset))
            .collect();

        self.history.record(&self.elements);
        self.selection.set_all(copies.iter().map(DrawingElement::id));
        self.elements = self.elements.with_extended(copies);
        self.dirty = true;
        true
    }

    pub fn select_all(&mut self) {
        self.selection.set_all(self.elements.ids());
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Step back one change. Returns `false` when there is nothing to undo or
    /// a gesture is running.
    pub fn undo(&mut self) -> bool {
        if self.is_gesture_active() {
            return false;
        }
        self.cancel_text_edit();
        match self.history.undo(&self.elements) {
            Some(previous) => {
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        if self.is_gesture_active() {
            return false;
        }
        self.cancel_text_edit();
        match self.history.redo(&self.elements) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, elements: ElementCollection) {
        self.elements = elements.without_editing();
        self.selection.retain_existing(&self.elements);
        self.mode = self.tool.resting_mode();
        self.dirty = true;
    }
}
