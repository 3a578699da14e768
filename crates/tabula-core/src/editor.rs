//! Editor: wires the document, history, tools, and input together and
//! interprets pointer/keyboard events against the active tool.

use crate::document::{Document, ElementPatch};
use crate::elements::{Element, ElementId};
use crate::history::History;
use crate::input::{InputState, Modifiers, MouseButton, PointerEvent};
use crate::tools::{PenAction, ToolKind, ToolManager, DRAG_THRESHOLD};
use kurbo::{Point, Vec2};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hit-test tolerance for selection and erasing, in world units.
pub const HIT_TOLERANCE: f64 = 4.0;

/// Boolean operations between vector paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanOp {
    Union,
    Subtract,
    Intersect,
    Exclude,
}

/// Errors from path operations.
#[derive(Debug, Error)]
pub enum PathOpsError {
    /// Polygon boolean algebra is not implemented; the operation is
    /// surfaced as an explicit error rather than silently ignored.
    #[error("boolean path operation {0:?} is not implemented")]
    Unimplemented(BooleanOp),
}

/// Callback invoked with the full element sequence after every committed
/// mutation.
pub type ChangeHandler = Box<dyn FnMut(&[Element])>;

/// In-progress select-tool drag.
#[derive(Debug, Clone, Copy)]
enum DragKind {
    None,
    /// Translating the selected elements. `active` flips once the pointer
    /// travels past the drag threshold.
    MoveSelection {
        start: Point,
        last: Point,
        active: bool,
    },
}

/// An editing session over one document.
pub struct Editor {
    /// The document being edited.
    pub document: Document,
    /// Undo/redo timeline.
    history: History,
    /// Tool manager.
    pub tools: ToolManager,
    /// Pointer input state.
    pub input: InputState,
    /// Currently selected element ids. Ephemeral UI state: never
    /// snapshotted into history.
    selection: Vec<ElementId>,
    /// Select-tool drag state.
    drag: DragKind,
    /// While true, single-letter tool shortcuts are suppressed.
    text_editing: bool,
    /// Mutation notification for the embedding application.
    on_change: Option<ChangeHandler>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Create an editor with an empty document.
    pub fn new() -> Self {
        Self::with_document(Document::new())
    }

    /// Create an editor over an existing document. The initial state
    /// becomes the seed snapshot of the history.
    pub fn with_document(document: Document) -> Self {
        let history = History::new(document.snapshot());
        Self {
            document,
            history,
            tools: ToolManager::new(),
            input: InputState::new(),
            selection: Vec::new(),
            drag: DragKind::None,
            text_editing: false,
            on_change: None,
        }
    }

    /// Register the change notification callback.
    pub fn set_change_handler(&mut self, handler: impl FnMut(&[Element]) + 'static) {
        self.on_change = Some(Box::new(handler));
    }

    fn notify(&mut self) {
        if let Some(handler) = self.on_change.as_mut() {
            handler(&self.document.elements);
        }
    }

    /// Record a committed mutation: one history push, one notification.
    fn commit(&mut self) {
        self.history.push(self.document.snapshot());
        self.notify();
    }

    // --- selection -------------------------------------------------------

    /// Currently selected element ids.
    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    /// Check if an element is selected.
    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selection.contains(&id)
    }

    /// Select a single element (clears the previous selection).
    pub fn select(&mut self, id: ElementId) {
        self.selection.clear();
        self.selection.push(id);
    }

    /// Add an element to the selection.
    pub fn add_to_selection(&mut self, id: ElementId) {
        if !self.selection.contains(&id) {
            self.selection.push(id);
        }
    }

    /// Toggle an element's selection membership (Shift-click).
    pub fn toggle_selection(&mut self, id: ElementId) {
        if let Some(pos) = self.selection.iter().position(|&sid| sid == id) {
            self.selection.remove(pos);
        } else {
            self.selection.push(id);
        }
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Select all elements, in paint order.
    pub fn select_all(&mut self) {
        self.selection = self
            .document
            .elements_ordered()
            .iter()
            .map(|e| e.id())
            .collect();
    }

    fn prune_selection(&mut self) {
        let document = &self.document;
        self.selection.retain(|&id| document.get(id).is_some());
    }

    // --- tools and modes -------------------------------------------------

    /// Set the active tool. Switching tools clears any in-progress draft
    /// and pushes nothing to history.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tools.set_tool(tool);
        self.drag = DragKind::None;
    }

    /// The active tool.
    pub fn active_tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    /// Gate single-letter shortcuts while a text field has focus.
    pub fn set_text_editing(&mut self, editing: bool) {
        self.text_editing = editing;
    }

    /// Whether text editing is active.
    pub fn is_text_editing(&self) -> bool {
        self.text_editing
    }

    // --- pointer surface -------------------------------------------------

    /// Handle a pointer-down event.
    pub fn pointer_down(&mut self, position: Point, button: MouseButton, modifiers: Modifiers) {
        self.input.set_modifiers(modifiers);
        self.input
            .handle_pointer_event(PointerEvent::Down { position, button });
        if button != MouseButton::Left {
            return;
        }

        match self.tools.current_tool {
            ToolKind::Select => self.select_pointer_down(position, modifiers),
            ToolKind::Pen => self.pen_pointer_down(position),
            ToolKind::Eraser => self.erase_at(position),
            tool if tool.is_drag_tool() => self.tools.begin(position),
            // Pan and Comment have no canvas interaction here
            _ => {}
        }
    }

    /// Handle a pointer-move event.
    pub fn pointer_moved(&mut self, position: Point) {
        self.input
            .handle_pointer_event(PointerEvent::Move { position });

        if self.tools.is_active() {
            self.tools.update(position);
        }

        if let DragKind::MoveSelection { start, last, active } = self.drag {
            if active {
                self.translate_unlocked(position - last);
                self.drag = DragKind::MoveSelection {
                    start,
                    last: position,
                    active: true,
                };
            } else if (position - start).hypot() >= DRAG_THRESHOLD {
                self.translate_unlocked(position - start);
                self.drag = DragKind::MoveSelection {
                    start,
                    last: position,
                    active: true,
                };
            }
        }
    }

    /// Handle a pointer-up event.
    pub fn pointer_up(&mut self, position: Point, button: MouseButton) {
        self.input
            .handle_pointer_event(PointerEvent::Up { position, button });
        if button != MouseButton::Left {
            return;
        }

        if self.tools.is_active() {
            if let Some(element) = self.tools.end(position) {
                self.add_element(element);
            }
        }

        if let DragKind::MoveSelection { active, .. } = self.drag {
            if active {
                self.commit();
            }
            self.drag = DragKind::None;
        }
    }

    fn select_pointer_down(&mut self, position: Point, modifiers: Modifiers) {
        let hits = self.document.elements_at_point(position, HIT_TOLERANCE);
        match hits.first() {
            Some(&top) => {
                if modifiers.shift {
                    self.toggle_selection(top);
                } else if !self.is_selected(top) {
                    self.select(top);
                }
                self.drag = DragKind::MoveSelection {
                    start: position,
                    last: position,
                    active: false,
                };
            }
            None => {
                if !modifiers.shift {
                    self.clear_selection();
                }
            }
        }
    }

    fn pen_pointer_down(&mut self, position: Point) {
        if self.input.is_double_click() {
            if let Some(path) = self.tools.pen_finish() {
                self.add_element(Element::Path(path));
            }
            return;
        }
        if let PenAction::Committed(path) = self.tools.pen_click(position) {
            self.add_element(Element::Path(path));
        }
    }

    fn erase_at(&mut self, position: Point) {
        let hit = self
            .document
            .elements_at_point(position, HIT_TOLERANCE)
            .into_iter()
            .find(|&id| self.document.get(id).is_some_and(|e| !e.locked()));
        if let Some(id) = hit {
            self.document.remove(id);
            self.prune_selection();
            self.commit();
        }
    }

    fn translate_unlocked(&mut self, delta: Vec2) {
        for id in self.selection.clone() {
            if let Some(element) = self.document.get_mut(id) {
                if !element.locked() {
                    element.translate(delta);
                }
            }
        }
    }

    // --- keyboard surface ------------------------------------------------

    /// Handle a key press. `key` is the logical key name ("a", "Delete",
    /// "Escape", ...).
    pub fn key_pressed(&mut self, key: &str, modifiers: Modifiers) {
        self.input.set_modifiers(modifiers);
        let key = key.to_lowercase();

        if modifiers.command() {
            match key.as_str() {
                "z" if modifiers.shift => {
                    self.redo();
                }
                "z" => {
                    self.undo();
                }
                "y" => {
                    self.redo();
                }
                "d" => {
                    self.duplicate_selected();
                }
                "a" => self.select_all(),
                _ => {}
            }
            return;
        }

        match key.as_str() {
            "delete" | "backspace" => self.delete_selected(),
            "escape" => self.cancel_draft(),
            _ => {
                if !self.text_editing {
                    if let Some(tool) = ToolKind::from_shortcut(&key) {
                        self.set_tool(tool);
                    }
                }
            }
        }
    }

    /// Cancel the in-progress draft without committing (Escape). An
    /// active move-drag is reverted so the document matches its last
    /// committed snapshot.
    pub fn cancel_draft(&mut self) {
        self.tools.cancel();
        if let DragKind::MoveSelection { start, last, active: true } = self.drag {
            self.translate_unlocked(start - last);
        }
        self.drag = DragKind::None;
    }

    // --- command surface -------------------------------------------------

    /// Add an element, commit, and select it.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = self.document.add(element);
        self.commit();
        self.select(id);
        id
    }

    /// Apply a sparse update. Commits even when the id is unknown.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        let found = self.document.apply_patch(id, patch);
        self.commit();
        found
    }

    /// Delete the selected elements. No-op (and no history push) when the
    /// selection is empty. Deletion bypasses the lock flag.
    pub fn delete_selected(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        let ids: Vec<ElementId> = self.selection.drain(..).collect();
        self.document.remove_many(&ids);
        self.commit();
    }

    /// Duplicate the selected elements and select the clones. Returns the
    /// clone ids (empty when nothing was selected).
    pub fn duplicate_selected(&mut self) -> Vec<ElementId> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        let clones = self.document.duplicate(&self.selection);
        self.selection = clones.clone();
        self.commit();
        clones
    }

    /// Remove every element. No-op when the document is already empty.
    pub fn clear_all(&mut self) {
        if self.document.is_empty() {
            return;
        }
        self.document.clear();
        self.selection.clear();
        self.commit();
    }

    /// Move an element one step toward the front. Boundary no-ops push
    /// nothing.
    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        let moved = self.document.bring_forward(id);
        if moved {
            self.commit();
        }
        moved
    }

    /// Move an element one step toward the back.
    pub fn send_backward(&mut self, id: ElementId) -> bool {
        let moved = self.document.send_backward(id);
        if moved {
            self.commit();
        }
        moved
    }

    /// Translate the unlocked members of the selection and commit.
    /// Pushes nothing when nothing moved.
    pub fn translate_selected(&mut self, delta: Vec2) {
        let mut moved = false;
        for id in self.selection.clone() {
            if let Some(element) = self.document.get_mut(id) {
                if !element.locked() {
                    element.translate(delta);
                    moved = true;
                }
            }
        }
        if moved {
            self.commit();
        }
    }

    /// Resize an element. Refused for locked elements and kinds without a
    /// size box.
    pub fn resize_element(&mut self, id: ElementId, width: f64, height: f64) -> bool {
        let Some(element) = self.document.get_mut(id) else {
            return false;
        };
        if element.locked() {
            return false;
        }
        if element.set_size(width, height) {
            self.commit();
            true
        } else {
            false
        }
    }

    /// Rotate an element. Refused for locked elements and kinds that do
    /// not rotate.
    pub fn rotate_element(&mut self, id: ElementId, radians: f64) -> bool {
        let Some(element) = self.document.get_mut(id) else {
            return false;
        };
        if element.locked() || !element.supports_rotation() {
            return false;
        }
        element.set_rotation(radians);
        self.commit();
        true
    }

    /// Toggle an element's lock flag. Always succeeds regardless of the
    /// current lock state.
    pub fn set_locked(&mut self, id: ElementId, locked: bool) -> bool {
        let Some(element) = self.document.get_mut(id) else {
            return false;
        };
        element.set_locked(locked);
        self.commit();
        true
    }

    /// Toggle an element's visibility flag.
    pub fn set_visible(&mut self, id: ElementId, visible: bool) -> bool {
        let Some(element) = self.document.get_mut(id) else {
            return false;
        };
        element.set_visible(visible);
        self.commit();
        true
    }

    /// Toggle a vote on a sticky note. Returns the new vote presence, or
    /// None when the element is not a sticky note.
    pub fn toggle_vote(&mut self, id: ElementId, voter: &str) -> Option<bool> {
        let note = match self.document.get_mut(id) {
            Some(Element::Sticky(note)) => note,
            _ => return None,
        };
        let voted = note.toggle_vote(voter);
        self.commit();
        Some(voted)
    }

    /// Apply a boolean operation to the selected vector paths.
    ///
    /// With fewer than two paths selected this is a silent policy no-op.
    /// Otherwise the operation is not implemented and says so.
    pub fn boolean_op(&mut self, op: BooleanOp) -> Result<(), PathOpsError> {
        let path_count = self
            .selection
            .iter()
            .filter(|&&id| self.document.get(id).is_some_and(Element::is_path))
            .count();
        if path_count < 2 {
            debug!("boolean op {op:?} ignored: fewer than two paths selected");
            return Ok(());
        }
        warn!("boolean op {op:?} requested but not implemented");
        Err(PathOpsError::Unimplemented(op))
    }

    // --- history ---------------------------------------------------------

    /// Undo the last committed mutation. Restores the previous snapshot,
    /// cancels any draft, and prunes the selection to surviving ids.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.document.restore(&snapshot);
        self.tools.cancel();
        self.drag = DragKind::None;
        self.prune_selection();
        debug!("undo: history depth {}", self.history.len());
        self.notify();
        true
    }

    /// Redo the last undone mutation.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.document.restore(&snapshot);
        self.tools.cancel();
        self.drag = DragKind::None;
        self.prune_selection();
        debug!("redo: history depth {}", self.history.len());
        self.notify();
        true
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of snapshots in the history (including the seed).
    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}
