//! Pointer and keyboard events fed to the controller by the host.

use std::time::Duration;

use kurbo::Point;
use serde::{Deserialize, Serialize};

// Use web_time for WASM compatibility
#[cfg(not(target_arch = "wasm32"))]
pub use std::time::Instant;
#[cfg(target_arch = "wasm32")]
pub use web_time::Instant;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Ctrl on Linux/Windows, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Modifier that appends to the selection instead of replacing it.
    pub fn extends_selection(&self) -> bool {
        self.shift || self.command()
    }
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    /// Pointer capture lost or released outside the canvas.
    Cancel,
}

/// Keys the controller reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Enter,
    /// Printable character, lowercase for letters.
    Character(char),
}

/// Key press with the modifiers held at the time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Whether this is `Ctrl/Cmd + c` for the given letter.
    pub fn is_command(&self, c: char) -> bool {
        self.modifiers.command() && self.key == Key::Character(c.to_ascii_lowercase())
    }
}

/// Drops pointer moves that arrive faster than a target rate.
#[derive(Debug, Clone)]
pub struct MoveThrottle {
    min_interval: Duration,
    last: Option<Instant>,
}

impl MoveThrottle {
    /// Throttle to at most `hz` processed moves per second. Zero or a
    /// non-finite rate disables throttling.
    pub fn from_hz(hz: f64) -> Self {
        let min_interval = if hz.is_finite() && hz > 0.0 {
            Duration::from_secs_f64(1.0 / hz)
        } else {
            Duration::ZERO
        };
        Self {
            min_interval,
            last: None,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Whether a move at `now` should be processed. Accepted moves become the
    /// new reference point.
    pub fn should_process(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last
            && now.saturating_duration_since(last) < self.min_interval
        {
            return false;
        }
        self.last = Some(now);
        true
    }

    /// Forget the last processed move, so the next one always passes.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for MoveThrottle {
    fn default() -> Self {
        Self::from_hz(60.0)
    }
}
