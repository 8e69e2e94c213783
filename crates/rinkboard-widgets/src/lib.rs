//! egui components for driving a RinkBoard canvas.
//!
//! - **Buttons**: tool buttons with painted icons, command buttons
//! - **Colors**: the rink palette and color swatches
//! - **Palette**: the full toolbar, reporting clicks as [`PaletteEvent`]s

pub mod buttons;
pub mod colors;
pub mod palette;

pub use buttons::{CommandButton, ToolButton};
pub use colors::{ColorSwatch, RINK_PALETTE, from_color32, to_color32};
pub use palette::{PaletteEvent, ToolPalette};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Color swatch size
    pub const SWATCH: f32 = 20.0;
    /// Toolbar button size
    pub const TOOL: f32 = 32.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    /// Selection/active color (blue)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    pub const HOVER_BG: Color32 = Color32::from_rgb(235, 235, 235);
    pub const DISABLED: Color32 = Color32::from_rgb(190, 190, 190);
}
