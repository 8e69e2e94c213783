//! Free text annotations.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ElementId, RinkColor, clamp_normalized};

/// Average glyph advance as a fraction of the font size.
pub const CHAR_WIDTH_FACTOR: f64 = 0.6;
/// Line height as a fraction of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Text label anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLabel {
    pub(crate) id: ElementId,
    pub position: Point,
    pub label: String,
    /// Font size in pixels.
    pub font_size: f64,
    pub color: RinkColor,
    /// Transient editor state, never persisted as `true`.
    #[serde(default)]
    pub is_editing: bool,
}

impl TextLabel {
    pub fn new(position: Point, label: impl Into<String>, font_size: f64, color: RinkColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            position: clamp_normalized(position),
            label: label.into(),
            font_size,
            color,
            is_editing: false,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Estimated size in pixels from character count and font size.
    ///
    /// Multi-line labels use the longest line for width.
    pub fn approximate_size(&self) -> Size {
        let lines = self.label.lines().count().max(1);
        let longest = self
            .label
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .max(1);
        Size::new(
            longest as f64 * self.font_size * CHAR_WIDTH_FACTOR,
            lines as f64 * self.font_size * LINE_HEIGHT_FACTOR,
        )
    }
}
