//! Tool palette identifiers and controller modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::elements::{ArrowKind, ElementId, MarkerKind};

/// Tool selection errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("Unrecognized tool: {0}")]
    InvalidTool(String),
}

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Tool {
    #[default]
    Select,
    /// Freehand arrow of the given kind.
    Arrow(ArrowKind),
    /// Single-click marker of the given kind.
    Marker(MarkerKind),
    Text,
    Erase,
}

impl Tool {
    /// Every tool in palette order.
    pub const ALL: [Tool; 13] = [
        Tool::Select,
        Tool::Arrow(ArrowKind::Movement),
        Tool::Arrow(ArrowKind::Pass),
        Tool::Arrow(ArrowKind::Shoot),
        Tool::Arrow(ArrowKind::Backward),
        Tool::Marker(MarkerKind::Puck),
        Tool::Marker(MarkerKind::Cone),
        Tool::Marker(MarkerKind::Offense),
        Tool::Marker(MarkerKind::Defense),
        Tool::Marker(MarkerKind::Opponent),
        Tool::Marker(MarkerKind::Goalie),
        Tool::Text,
        Tool::Erase,
    ];

    /// Stable tool id as used by hosts and palette events.
    pub fn id(&self) -> &'static str {
        match self {
            Tool::Select => "select",
            Tool::Arrow(kind) => kind.as_str(),
            Tool::Marker(kind) => kind.as_str(),
            Tool::Text => "text",
            Tool::Erase => "erase",
        }
    }

    /// Human-readable name for tooltips.
    pub fn label(&self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Arrow(ArrowKind::Movement) => "Skate",
            Tool::Arrow(ArrowKind::Pass) => "Pass",
            Tool::Arrow(ArrowKind::Shoot) => "Shot",
            Tool::Arrow(ArrowKind::Backward) => "Skate backward",
            Tool::Marker(MarkerKind::Puck) => "Puck",
            Tool::Marker(MarkerKind::Cone) => "Cone",
            Tool::Marker(MarkerKind::Offense) => "Forward",
            Tool::Marker(MarkerKind::Defense) => "Defender",
            Tool::Marker(MarkerKind::Opponent) => "Opponent",
            Tool::Marker(MarkerKind::Goalie) => "Goalie",
            Tool::Text => "Text",
            Tool::Erase => "Erase",
        }
    }

    /// Mode the controller rests in while this tool is active.
    pub fn resting_mode(&self) -> Mode {
        match self {
            Tool::Select => Mode::Select,
            Tool::Marker(kind) => Mode::PlaceSingleClick(*kind),
            Tool::Arrow(_) | Tool::Text | Tool::Erase => Mode::Idle,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Tool {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::ALL
            .into_iter()
            .find(|tool| tool.id() == s)
            .ok_or_else(|| ToolError::InvalidTool(s.to_string()))
    }
}

impl TryFrom<String> for Tool {
    type Error = ToolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tool> for String {
    fn from(tool: Tool) -> Self {
        tool.id().to_string()
    }
}

/// What the drawing surface controller is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Waiting for input with a tool that has no resting behavior.
    #[default]
    Idle,
    /// Picking and moving elements.
    Select,
    /// Capturing an arrow of the given kind.
    Draw(ArrowKind),
    /// Dropping markers of the given kind on every click.
    PlaceSingleClick(MarkerKind),
    /// Editing the text of a label.
    TextEdit(ElementId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tool_id_parses_back() {
        for tool in Tool::ALL {
            assert_eq!(tool.id().parse::<Tool>().unwrap(), tool);
        }
    }

    #[test]
    fn test_unknown_tool_fails_fast() {
        assert_eq!(
            "lasso".parse::<Tool>(),
            Err(ToolError::InvalidTool("lasso".to_string()))
        );
    }

    #[test]
    fn test_resting_modes() {
        assert_eq!(Tool::Select.resting_mode(), Mode::Select);
        assert_eq!(
            Tool::Marker(MarkerKind::Cone).resting_mode(),
            Mode::PlaceSingleClick(MarkerKind::Cone)
        );
        assert_eq!(Tool::Arrow(ArrowKind::Pass).resting_mode(), Mode::Idle);
    }

    #[test]
    fn test_serde_uses_tool_id() {
        let json = serde_json::to_string(&Tool::Marker(MarkerKind::Goalie)).unwrap();
        assert_eq!(json, "\"goalie\"");
        let tool: Tool = serde_json::from_str("\"backward\"").unwrap();
        assert_eq!(tool, Tool::Arrow(ArrowKind::Backward));
        assert!(serde_json::from_str::<Tool>("\"zamboni\"").is_err());
    }
}
