//! RinkBoard Core Library
//!
//! Platform-agnostic data structures and gesture logic for the RinkBoard
//! hockey tactics board.

pub mod canvas;
pub mod config;
pub mod coords;
pub mod elements;
pub mod geometry;
pub mod history;
pub mod input;
pub mod selection;
pub mod smoothing;
pub mod storage;
pub mod tools;

pub use canvas::{Canvas, CanvasError, SharedTextMeasure};
pub use config::{BoardConfig, ConfigError};
pub use coords::{DefendingSide, flip_if_defending_away, to_normalized, to_pixel};
pub use elements::{
    Arrow, ArrowKind, DrawingElement, ElementCollection, ElementError, ElementId, Marker,
    MarkerKind, RinkColor, TextLabel,
};
pub use geometry::{ApproximateTextMeasure, TextMeasure, bounding_rect, hit_test};
pub use history::History;
pub use input::{Key, KeyEvent, Modifiers, MouseButton, MoveThrottle, PointerEvent};
pub use selection::SelectionSet;
pub use smoothing::{add_point_to_path, simplify_path};
pub use storage::{MemoryStorage, SaveSession, Storage, StorageError, StorageResult};
pub use tools::{Mode, Tool, ToolError};
