//! Hand-drawn arrows captured from pointer drags.

use std::fmt;
use std::str::FromStr;

use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ElementError, ElementId, RinkColor, clamp_normalized};

/// What an arrow means on the ice. Each kind renders with its own line style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowKind {
    /// Skating without the puck. Solid line.
    Movement,
    /// Pass. Dashed line.
    Pass,
    /// Shot on goal. Double line.
    Shoot,
    /// Skating backwards. Wavy line.
    Backward,
}

impl ArrowKind {
    pub const ALL: [ArrowKind; 4] = [
        ArrowKind::Movement,
        ArrowKind::Pass,
        ArrowKind::Shoot,
        ArrowKind::Backward,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArrowKind::Movement => "movement",
            ArrowKind::Pass => "pass",
            ArrowKind::Shoot => "shoot",
            ArrowKind::Backward => "backward",
        }
    }
}

impl fmt::Display for ArrowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArrowKind {
    type Err = ElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArrowKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ElementError::InvalidKind(s.to_string()))
    }
}

/// A polyline arrow in normalized coordinates.
///
/// `start_point` and `end_point` mirror the first and last entries of `path`.
/// While the gesture is running the path may hold a single point; a finalized
/// arrow always has at least two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrow {
    pub(crate) id: ElementId,
    pub kind: ArrowKind,
    pub start_point: Point,
    pub path: Vec<Point>,
    pub end_point: Point,
    pub color: RinkColor,
}

impl Arrow {
    /// Start capturing an arrow at `start`.
    pub fn new(kind: ArrowKind, start: Point, color: RinkColor) -> Self {
        let start = clamp_normalized(start);
        Self {
            id: Uuid::new_v4(),
            kind,
            start_point: start,
            path: vec![start],
            end_point: start,
            color,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// New arrow with `point` appended; `self` is left untouched.
    pub fn append_point(&self, point: Point) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(clamp_normalized(point));
        self.with_path(path)
    }

    /// Same arrow (same id) following a different path.
    ///
    /// Endpoints are kept in sync with the path. An empty path keeps the
    /// previous endpoints.
    pub fn with_path(&self, path: Vec<Point>) -> Self {
        let start_point = path.first().copied().unwrap_or(self.start_point);
        let end_point = path.last().copied().unwrap_or(self.end_point);
        Self {
            id: self.id,
            kind: self.kind,
            start_point,
            path,
            end_point,
            color: self.color,
        }
    }

    /// Close the arrow: pins `end_point` to the last path point.
    pub fn finalize(self) -> Result<Self, ElementError> {
        if self.path.len() < 2 {
            return Err(ElementError::DegeneratePath {
                points: self.path.len(),
            });
        }
        let end_point = self.path[self.path.len() - 1];
        Ok(Self { end_point, ..self })
    }
}

/// Begin an arrow from a kind name such as `"pass"`.
pub fn create_arrow(kind: &str, start: Point, color: RinkColor) -> Result<Arrow, ElementError> {
    let kind: ArrowKind = kind.parse()?;
    Ok(Arrow::new(kind, start, color))
}

/// Free-function form of [`Arrow::append_point`].
pub fn append_point(arrow: &Arrow, point: Point) -> Arrow {
    arrow.append_point(point)
}

/// Free-function form of [`Arrow::finalize`].
pub fn finalize(arrow: Arrow) -> Result<Arrow, ElementError> {
    arrow.finalize()
}
