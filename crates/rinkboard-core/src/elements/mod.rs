//! Drawable element definitions for the tactics board.
//!
//! Every element stores its geometry in normalized rink space (`0.0..=1.0` on
//! both axes) so a board is portable across canvas sizes. Pixel space only
//! exists transiently, inside geometry and smoothing calls.

mod arrow;
mod collection;
mod color;
mod marker;
mod text;

pub use arrow::{Arrow, ArrowKind, append_point, create_arrow, finalize};
pub use collection::ElementCollection;
pub use color::RinkColor;
pub use marker::{Marker, MarkerKind, create_marker};
pub use text::{CHAR_WIDTH_FACTOR, LINE_HEIGHT_FACTOR, TextLabel};

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Element construction and validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElementError {
    #[error("Unrecognized element kind: {0}")]
    InvalidKind(String),
    #[error("Arrow path has {points} point(s), at least 2 are required")]
    DegeneratePath { points: usize },
    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

/// Clamp a point into normalized rink space.
pub fn clamp_normalized(point: Point) -> Point {
    let clamp = |v: f64| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
    Point::new(clamp(point.x), clamp(point.y))
}

/// A drawable object on the rink.
///
/// Serialized with an internal `type` tag; field names are camelCase. This
/// shape is the on-disk contract shared with the external store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DrawingElement {
    #[serde(rename = "marker")]
    Marker(Marker),
    #[serde(rename = "arrow")]
    Arrow(Arrow),
    #[serde(rename = "text")]
    TextLabel(TextLabel),
}

impl DrawingElement {
    pub fn id(&self) -> ElementId {
        match self {
            DrawingElement::Marker(m) => m.id(),
            DrawingElement::Arrow(a) => a.id(),
            DrawingElement::TextLabel(t) => t.id(),
        }
    }

    pub fn color(&self) -> RinkColor {
        match self {
            DrawingElement::Marker(m) => m.color,
            DrawingElement::Arrow(a) => a.color,
            DrawingElement::TextLabel(t) => t.color,
        }
    }

    /// Tag value used on the wire for this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            DrawingElement::Marker(_) => "marker",
            DrawingElement::Arrow(_) => "arrow",
            DrawingElement::TextLabel(_) => "text",
        }
    }

    pub fn as_marker(&self) -> Option<&Marker> {
        match self {
            DrawingElement::Marker(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_arrow(&self) -> Option<&Arrow> {
        match self {
            DrawingElement::Arrow(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextLabel> {
        match self {
            DrawingElement::TextLabel(t) => Some(t),
            _ => None,
        }
    }

    /// Whether this element is a text label currently being edited.
    pub fn is_editing(&self) -> bool {
        matches!(self, DrawingElement::TextLabel(t) if t.is_editing)
    }

    /// All normalized anchor points of the element.
    pub fn points(&self) -> Vec<Point> {
        match self {
            DrawingElement::Marker(m) => vec![m.position],
            DrawingElement::Arrow(a) => a.path.clone(),
            DrawingElement::TextLabel(t) => vec![t.position],
        }
    }

    /// Normalized extent of the element's anchor points.
    fn anchor_extent(&self) -> Option<Rect> {
        let points = self.points();
        let first = *points.first()?;
        Some(
            points
                .iter()
                .fold(Rect::from_points(first, first), |r, p| r.union_pt(*p)),
        )
    }

    /// Return a copy moved by a normalized delta.
    ///
    /// The delta is clamped per element so that every anchor stays inside the
    /// rink; the shape of an arrow is never distorted at the boards.
    pub fn translated(&self, delta: Vec2) -> Self {
        let Some(extent) = self.anchor_extent() else {
            return self.clone();
        };
        let dx = delta.x.clamp(-extent.x0, 1.0 - extent.x1);
        let dy = delta.y.clamp(-extent.y0, 1.0 - extent.y1);
        let shift = |p: Point| clamp_normalized(Point::new(p.x + dx, p.y + dy));

        match self {
            DrawingElement::Marker(m) => {
                let mut m = m.clone();
                m.position = shift(m.position);
                DrawingElement::Marker(m)
            }
            DrawingElement::Arrow(a) => {
                let path = a.path.iter().map(|p| shift(*p)).collect();
                DrawingElement::Arrow(a.with_path(path))
            }
            DrawingElement::TextLabel(t) => {
                let mut t = t.clone();
                t.position = shift(t.position);
                DrawingElement::TextLabel(t)
            }
        }
    }

    /// Return an offset copy with a fresh identifier.
    pub fn duplicate(&self, offset: Vec2) -> Self {
        let mut copy = self.translated(offset);
        copy.regenerate_id();
        if let DrawingElement::TextLabel(t) = &mut copy {
            t.is_editing = false;
        }
        copy
    }

    /// Regenerate the element's ID with a new unique identifier.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            DrawingElement::Marker(m) => m.id = new_id,
            DrawingElement::Arrow(a) => a.id = new_id,
            DrawingElement::TextLabel(t) => t.id = new_id,
        }
    }

    /// Check the invariants a committed element must hold.
    pub fn validate(&self) -> Result<(), ElementError> {
        match self {
            DrawingElement::Arrow(a) if a.path.len() < 2 => Err(ElementError::DegeneratePath {
                points: a.path.len(),
            }),
            _ => Ok(()),
        }
    }

    /// Copy with every anchor pulled into normalized space. Arrow endpoints
    /// are rebuilt from the path.
    pub fn clamped(&self) -> Self {
        match self {
            DrawingElement::Marker(m) => {
                let mut m = m.clone();
                m.position = clamp_normalized(m.position);
                DrawingElement::Marker(m)
            }
            DrawingElement::Arrow(a) => {
                let path = a.path.iter().map(|p| clamp_normalized(*p)).collect();
                DrawingElement::Arrow(a.with_path(path))
            }
            DrawingElement::TextLabel(t) => {
                let mut t = t.clone();
                t.position = clamp_normalized(t.position);
                DrawingElement::TextLabel(t)
            }
        }
    }

    /// Copy with transient editor state cleared, ready for the store.
    pub fn for_persistence(&self) -> Self {
        match self {
            DrawingElement::TextLabel(t) if t.is_editing => {
                let mut t = t.clone();
                t.is_editing = false;
                DrawingElement::TextLabel(t)
            }
            other => other.clone(),
        }
    }
}

impl From<Marker> for DrawingElement {
    fn from(marker: Marker) -> Self {
        DrawingElement::Marker(marker)
    }
}

impl From<Arrow> for DrawingElement {
    fn from(arrow: Arrow) -> Self {
        DrawingElement::Arrow(arrow)
    }
}

impl From<TextLabel> for DrawingElement {
    fn from(label: TextLabel) -> Self {
        DrawingElement::TextLabel(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finalized_arrow() -> Arrow {
        Arrow::new(ArrowKind::Pass, Point::new(0.1, 0.1), RinkColor::black())
            .append_point(Point::new(0.3, 0.2))
            .append_point(Point::new(0.5, 0.2))
            .finalize()
            .unwrap()
    }

    #[test]
    fn test_wire_format_uses_type_tag_and_camel_case() {
        let arrow = finalized_arrow();
        let json = serde_json::to_value(DrawingElement::Arrow(arrow)).unwrap();
        assert_eq!(json["type"], "arrow");
        assert_eq!(json["kind"], "pass");
        assert!(json.get("startPoint").is_some());
        assert!(json.get("endPoint").is_some());
        assert_eq!(json["path"].as_array().unwrap().len(), 3);

        let label = TextLabel::new(Point::new(0.5, 0.5), "Breakout", 18.0, RinkColor::black());
        let json = serde_json::to_value(DrawingElement::TextLabel(label)).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["fontSize"], 18.0);
        assert_eq!(json["isEditing"], false);
    }

    #[test]
    fn test_unknown_type_tag_is_rejected() {
        let json = r##"{"type":"zamboni","id":"5f0c1a8e-0000-4000-8000-000000000000"}"##;
        assert!(serde_json::from_str::<DrawingElement>(json).is_err());
    }

    #[test]
    fn test_translate_clamps_whole_element() {
        let arrow = finalized_arrow();
        let moved = DrawingElement::Arrow(arrow.clone()).translated(Vec2::new(0.9, 0.0));
        let moved = moved.as_arrow().unwrap();
        // Rightmost point hits the boards, the shape is kept.
        assert!((moved.path[2].x - 1.0).abs() < 1e-12);
        let original_span = arrow.path[2].x - arrow.path[0].x;
        let moved_span = moved.path[2].x - moved.path[0].x;
        assert!((original_span - moved_span).abs() < 1e-12);
        assert_eq!(moved.start_point, moved.path[0]);
        assert_eq!(moved.end_point, moved.path[2]);
    }

    #[test]
    fn test_duplicate_gets_fresh_id() {
        let marker = Marker::new(MarkerKind::Cone, Point::new(0.5, 0.5), RinkColor::black());
        let element = DrawingElement::Marker(marker);
        let copy = element.duplicate(Vec2::new(0.02, 0.02));
        assert_ne!(copy.id(), element.id());
        let pos = copy.as_marker().unwrap().position;
        assert!((pos.x - 0.52).abs() < 1e-12);
    }

    #[test]
    fn test_for_persistence_clears_editing() {
        let mut label = TextLabel::new(Point::new(0.2, 0.2), "Text", 18.0, RinkColor::black());
        label.is_editing = true;
        let element = DrawingElement::TextLabel(label);
        assert!(element.is_editing());
        assert!(!element.for_persistence().is_editing());
    }

    #[test]
    fn test_clamped_pulls_anchors_inside() {
        let mut marker = Marker::new(MarkerKind::Puck, Point::new(0.5, 0.5), RinkColor::black());
        marker.position = Point::new(1.4, -0.2);
        let marker = DrawingElement::Marker(marker).clamped();
        assert_eq!(marker.as_marker().unwrap().position, Point::new(1.0, 0.0));

        let mut arrow = finalized_arrow();
        arrow.path[0] = Point::new(-3.0, 0.5);
        arrow.start_point = Point::new(0.9, 0.9);
        arrow.end_point = Point::new(0.0, 0.0);
        let clamped = DrawingElement::Arrow(arrow.clone()).clamped();
        let clamped = clamped.as_arrow().unwrap();
        assert_eq!(clamped.path[0], Point::new(0.0, 0.5));
        assert_eq!(clamped.start_point, clamped.path[0]);
        assert_eq!(clamped.end_point, *clamped.path.last().unwrap());
        assert_eq!(clamped.path[1..], arrow.path[1..]);
    }

    #[test]
    fn test_validate_rejects_short_arrow() {
        let arrow = Arrow::new(ArrowKind::Shoot, Point::new(0.5, 0.5), RinkColor::black());
        assert_eq!(
            DrawingElement::Arrow(arrow).validate(),
            Err(ElementError::DegeneratePath { points: 1 })
        );
    }
}
