//! Rink drawing colors and the swatch that picks them.

use egui::{Color32, CursorIcon, Rect, Sense, Stroke, Ui, vec2};
use rinkboard_core::RinkColor;

use crate::{sizing, theme};

/// Colors offered by the palette, darkest first. The first entry matches
/// the default element color.
pub const RINK_PALETTE: [(&str, RinkColor); 8] = [
    ("Slate", RinkColor::rgb(0x1e, 0x29, 0x3b)),
    ("Black", RinkColor::rgb(0x00, 0x00, 0x00)),
    ("Red", RinkColor::rgb(0xdc, 0x26, 0x26)),
    ("Blue", RinkColor::rgb(0x25, 0x63, 0xeb)),
    ("Green", RinkColor::rgb(0x16, 0xa3, 0x4a)),
    ("Orange", RinkColor::rgb(0xea, 0x58, 0x0c)),
    ("Purple", RinkColor::rgb(0x7c, 0x3a, 0xed)),
    ("Gold", RinkColor::rgb(0xca, 0x8a, 0x04)),
];

pub fn to_color32(color: RinkColor) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

pub fn from_color32(color: Color32) -> RinkColor {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    RinkColor::new(r, g, b, a)
}

/// A clickable circular color swatch.
pub struct ColorSwatch<'a> {
    color: RinkColor,
    tooltip: &'a str,
    selected: bool,
    size: f32,
}

impl<'a> ColorSwatch<'a> {
    pub fn new(color: RinkColor, tooltip: &'a str) -> Self {
        Self {
            color,
            tooltip,
            selected: false,
            size: sizing::SWATCH,
        }
    }

    /// Set whether this swatch is the active color.
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Show the swatch and return (clicked, rect).
    pub fn show(self, ui: &mut Ui) -> (bool, Rect) {
        let (rect, response) = ui.allocate_exact_size(vec2(self.size, self.size), Sense::click());

        if ui.is_rect_visible(rect) {
            let center = rect.center();
            let radius = rect.width().min(rect.height()) / 2.0;
            ui.painter().circle_filled(center, radius, to_color32(self.color));

            if self.selected {
                ui.painter().circle_stroke(center, radius - 3.0, Stroke::new(2.0, Color32::WHITE));
                ui.painter().circle_stroke(center, radius, Stroke::new(1.5, theme::ACCENT));
            } else if response.hovered() {
                ui.painter().circle_stroke(center, radius, Stroke::new(1.0, theme::TEXT_MUTED));
            }
        }

        let clicked = response.clicked();
        response.on_hover_text(self.tooltip).on_hover_cursor(CursorIcon::PointingHand);
        (clicked, rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_starts_with_default_color() {
        assert_eq!(RINK_PALETTE[0].1, RinkColor::default());
    }

    #[test]
    fn test_palette_colors_are_distinct() {
        for (i, (_, a)) in RINK_PALETTE.iter().enumerate() {
            for (_, b) in &RINK_PALETTE[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_color32_conversion() {
        let red = RINK_PALETTE[2].1;
        assert_eq!(to_color32(red), Color32::from_rgb(0xdc, 0x26, 0x26));
        assert_eq!(from_color32(to_color32(red)), red);
    }
}
