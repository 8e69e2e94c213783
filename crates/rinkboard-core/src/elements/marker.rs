//! Single-click markers: puck, cone and player roles.

use std::fmt;
use std::str::FromStr;

use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ElementError, ElementId, RinkColor, clamp_normalized};

/// Kind of marker dropped on the rink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Puck,
    Cone,
    Offense,
    Defense,
    Opponent,
    Goalie,
}

impl MarkerKind {
    pub const ALL: [MarkerKind; 6] = [
        MarkerKind::Puck,
        MarkerKind::Cone,
        MarkerKind::Offense,
        MarkerKind::Defense,
        MarkerKind::Opponent,
        MarkerKind::Goalie,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerKind::Puck => "puck",
            MarkerKind::Cone => "cone",
            MarkerKind::Offense => "offense",
            MarkerKind::Defense => "defense",
            MarkerKind::Opponent => "opponent",
            MarkerKind::Goalie => "goalie",
        }
    }

    /// Default radius in pixels.
    pub fn default_radius(&self) -> f64 {
        match self {
            MarkerKind::Puck => 6.0,
            MarkerKind::Cone => 8.0,
            MarkerKind::Offense | MarkerKind::Defense | MarkerKind::Opponent | MarkerKind::Goalie => {
                14.0
            }
        }
    }

    /// Whether this marker represents a player.
    pub fn is_player(&self) -> bool {
        !matches!(self, MarkerKind::Puck | MarkerKind::Cone)
    }

    /// Letter drawn inside player markers.
    pub fn glyph(&self) -> Option<&'static str> {
        match self {
            MarkerKind::Offense => Some("O"),
            MarkerKind::Defense => Some("D"),
            MarkerKind::Opponent => Some("X"),
            MarkerKind::Goalie => Some("G"),
            MarkerKind::Puck | MarkerKind::Cone => None,
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarkerKind {
    type Err = ElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MarkerKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ElementError::InvalidKind(s.to_string()))
    }
}

/// A puck, cone or player icon at a normalized position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub(crate) id: ElementId,
    pub kind: MarkerKind,
    pub position: Point,
    pub color: RinkColor,
    /// Radius in pixels.
    pub radius: f64,
}

impl Marker {
    /// Create a marker with the kind's default radius.
    pub fn new(kind: MarkerKind, position: Point, color: RinkColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            position: clamp_normalized(position),
            color,
            radius: kind.default_radius(),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }
}

/// Create a marker from a kind name such as `"defense"`.
pub fn create_marker(kind: &str, position: Point, color: RinkColor) -> Result<Marker, ElementError> {
    let kind: MarkerKind = kind.parse()?;
    Ok(Marker::new(kind, position, color))
}
