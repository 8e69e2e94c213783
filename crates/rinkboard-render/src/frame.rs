//! Backend-neutral display list.

use kurbo::{BezPath, Point, Rect, Size, Stroke};
use rinkboard_core::RinkColor;

use crate::background::BackgroundImage;

/// One drawing operation, in canvas-local pixels.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// Fill the whole frame.
    Clear(RinkColor),
    /// Stretch an image over `rect`.
    Background { image: BackgroundImage, rect: Rect },
    Fill { path: BezPath, color: RinkColor },
    Stroke {
        path: BezPath,
        style: Stroke,
        color: RinkColor,
    },
    /// Text anchored at its top-left corner.
    Text {
        origin: Point,
        text: String,
        font_size: f64,
        color: RinkColor,
    },
}

impl DrawCommand {
    pub fn kind(&self) -> &'static str {
        match self {
            DrawCommand::Clear(_) => "clear",
            DrawCommand::Background { .. } => "background",
            DrawCommand::Fill { .. } => "fill",
            DrawCommand::Stroke { .. } => "stroke",
            DrawCommand::Text { .. } => "text",
        }
    }
}

/// Ordered list of commands for one frame. Later commands paint over earlier ones.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    size: Size,
    commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn fill(&mut self, path: BezPath, color: RinkColor) {
        self.push(DrawCommand::Fill { path, color });
    }

    pub fn stroke(&mut self, path: BezPath, style: Stroke, color: RinkColor) {
        self.push(DrawCommand::Stroke { path, style, color });
    }

    pub fn text(&mut self, origin: Point, text: impl Into<String>, font_size: f64, color: RinkColor) {
        self.push(DrawCommand::Text {
            origin,
            text: text.into(),
            font_size,
            color,
        });
    }

    /// Command kinds in paint order, mostly for assertions.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.commands.iter().map(DrawCommand::kind).collect()
    }
}

impl<'a> IntoIterator for &'a Frame {
    type Item = &'a DrawCommand;
    type IntoIter = std::slice::Iter<'a, DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
