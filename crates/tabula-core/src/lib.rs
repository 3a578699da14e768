//! Tabula Core Library
//!
//! Platform-agnostic document model and editing logic for the Tabula
//! whiteboard and vector editor: the element store, linear undo/redo
//! history, tool state machine, and geometry helpers. Rendering and
//! transport belong to the embedding application.

pub mod document;
pub mod editor;
pub mod elements;
pub mod geometry;
pub mod history;
pub mod input;
pub mod storage;
pub mod tools;

pub use document::{Document, ElementPatch, DUPLICATE_OFFSET};
pub use editor::{BooleanOp, Editor, PathOpsError, HIT_TOLERANCE};
pub use elements::{
    Connector, Element, ElementId, ElementStyle, ElementTrait, FontFamily, Freehand, PathPoint,
    PathStyle, SerializableColor, Shape, ShapePrimitive, StickyNote, StrokeStyle, TextBox,
    VectorPath,
};
pub use geometry::{ellipse_points, line_points, rectangle_points, svg_path_data, KAPPA};
pub use history::{History, Snapshot};
pub use input::{InputState, Modifiers, MouseButton, PointerEvent};
pub use storage::{ExportedDocument, StorageError, StorageResult, DOCUMENT_FORMAT_VERSION};
pub use tools::{PenAction, ToolKind, ToolManager, ToolState, DRAG_THRESHOLD, PEN_CLOSE_DISTANCE};
