//! Board tuning knobs, loadable from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::elements::RinkColor;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tuning for capture, hit testing, history and new elements.
///
/// Missing fields take their defaults; unknown fields are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    /// Capture filter spacing in pixels.
    pub min_point_distance_px: f64,
    /// Release-time simplification tolerance in pixels.
    pub simplify_tolerance_px: f64,
    /// Pick distance around arrows in pixels.
    pub arrow_hit_tolerance_px: f64,
    /// Processed pointer moves per second. `0` disables throttling.
    pub move_throttle_hz: f64,
    /// Maximum undo steps.
    pub history_limit: usize,
    /// Color of new elements until the palette picks another.
    pub default_color: RinkColor,
    /// Font size of new labels in pixels.
    pub default_font_size: f64,
    /// Text used for new and emptied labels.
    pub placeholder_label: String,
    /// Normalized offset applied to duplicates.
    pub duplicate_offset: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            min_point_distance_px: crate::smoothing::DEFAULT_MIN_POINT_DISTANCE,
            simplify_tolerance_px: crate::smoothing::DEFAULT_SIMPLIFY_TOLERANCE,
            arrow_hit_tolerance_px: crate::geometry::ARROW_HIT_TOLERANCE,
            move_throttle_hz: 60.0,
            history_limit: crate::history::MAX_UNDO_HISTORY,
            default_color: RinkColor::default(),
            default_font_size: 18.0,
            placeholder_label: "Text".to_string(),
            duplicate_offset: 0.02,
        }
    }
}

impl BoardConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = |field: &'static str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a finite value >= 0, got {value}"),
                })
            }
        };
        non_negative("min_point_distance_px", self.min_point_distance_px)?;
        non_negative("simplify_tolerance_px", self.simplify_tolerance_px)?;
        non_negative("arrow_hit_tolerance_px", self.arrow_hit_tolerance_px)?;
        non_negative("move_throttle_hz", self.move_throttle_hz)?;
        non_negative("duplicate_offset", self.duplicate_offset)?;

        if !(self.default_font_size.is_finite() && self.default_font_size > 0.0) {
            return Err(ConfigError::Invalid {
                field: "default_font_size",
                reason: format!("expected a positive size, got {}", self.default_font_size),
            });
        }
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "history_limit",
                reason: "must keep at least one undo step".to_string(),
            });
        }
        if self.placeholder_label.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "placeholder_label",
                reason: "must not be blank".to_string(),
            });
        }
        Ok(())
    }
}
