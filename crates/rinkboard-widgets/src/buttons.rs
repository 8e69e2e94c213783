//! Toolbar buttons: tool toggles with painted icons and text command buttons.

use egui::{
    Align2, Color32, CornerRadius, CursorIcon, FontId, Painter, Rect, Sense, Shape, Stroke,
    Ui, pos2, vec2,
};
use rinkboard_core::{ArrowKind, MarkerKind, Tool};

use crate::{sizing, theme};

/// A toggle button for one tool. Solid accent background when active.
pub struct ToolButton {
    tool: Tool,
    selected: bool,
}

impl ToolButton {
    pub fn new(tool: Tool, selected: bool) -> Self {
        Self { tool, selected }
    }

    /// Show the button and return (clicked, rect).
    pub fn show(self, ui: &mut Ui) -> (bool, Rect) {
        let (rect, response) =
            ui.allocate_exact_size(vec2(sizing::TOOL, sizing::TOOL), Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                theme::ACCENT
            } else if response.hovered() {
                theme::HOVER_BG
            } else {
                Color32::TRANSPARENT
            };
            ui.painter()
                .rect_filled(rect, CornerRadius::same(6), bg_color);

            let ink = if self.selected {
                Color32::WHITE
            } else {
                Color32::from_gray(80)
            };
            paint_tool_icon(ui.painter(), self.tool, rect.shrink(7.0), ink);
        }

        let clicked = response.clicked();
        response
            .on_hover_text(self.tool.label())
            .on_hover_cursor(CursorIcon::PointingHand);
        (clicked, rect)
    }
}

/// Draw a small pictogram of what the tool produces inside `rect`.
fn paint_tool_icon(painter: &Painter, tool: Tool, rect: Rect, ink: Color32) {
    let stroke = Stroke::new(1.5, ink);
    match tool {
        Tool::Arrow(kind) => {
            let tail = rect.left_bottom();
            let tip = rect.right_top();
            let dir = (tip - tail).normalized();
            let normal = vec2(-dir.y, dir.x);
            match kind {
                ArrowKind::Movement => {
                    painter.line_segment([tail, tip], stroke);
                }
                ArrowKind::Pass => {
                    painter.extend(Shape::dashed_line(&[tail, tip], stroke, 3.0, 2.0));
                }
                ArrowKind::Shoot => {
                    painter.line_segment([tail + normal * 1.5, tip + normal * 1.5], stroke);
                    painter.line_segment([tail - normal * 1.5, tip - normal * 1.5], stroke);
                }
                ArrowKind::Backward => {
                    let steps = 6;
                    let points = (0..=steps)
                        .map(|i| {
                            let t = i as f32 / steps as f32;
                            let side = match i {
                                0 => 0.0,
                                i if i == steps => 0.0,
                                i if i % 2 == 0 => 2.0,
                                _ => -2.0,
                            };
                            tail + (tip - tail) * t + normal * side
                        })
                        .collect();
                    painter.add(Shape::line(points, stroke));
                }
            }
            let back = tip - dir * 6.0;
            painter.add(Shape::convex_polygon(
                vec![tip, back + normal * 3.0, back - normal * 3.0],
                ink,
                Stroke::NONE,
            ));
        }
        Tool::Marker(MarkerKind::Puck) => {
            painter.circle_filled(rect.center(), rect.width() * 0.2, ink);
        }
        Tool::Marker(MarkerKind::Cone) => {
            let c = rect.center();
            let r = rect.width() * 0.35;
            painter.add(Shape::convex_polygon(
                vec![pos2(c.x, c.y - r), pos2(c.x + r, c.y + r), pos2(c.x - r, c.y + r)],
                ink,
                Stroke::NONE,
            ));
        }
        Tool::Marker(kind) => {
            painter.circle_stroke(rect.center(), rect.width() * 0.5, stroke);
            if let Some(glyph) = kind.glyph() {
                painter.text(rect.center(), Align2::CENTER_CENTER, glyph, FontId::proportional(11.0), ink);
            }
        }
        Tool::Select => {
            let a = rect.left_top();
            painter.add(Shape::convex_polygon(
                vec![a, pos2(a.x, a.y + 14.0), pos2(a.x + 10.0, a.y + 10.0)],
                ink,
                Stroke::NONE,
            ));
        }
        Tool::Text => {
            painter.text(rect.center(), Align2::CENTER_CENTER, "T", FontId::proportional(16.0), ink);
        }
        Tool::Erase => {
            let c = rect.center();
            let half = rect.width() * 0.35;
            painter.line_segment([c - vec2(half, half), c + vec2(half, half)], stroke);
            painter.line_segment([c + vec2(-half, half), c + vec2(half, -half)], stroke);
        }
    }
}

/// A text button for board commands, greyed out when it would do nothing.
pub struct CommandButton<'a> {
    label: &'a str,
    enabled: bool,
    shortcut: Option<&'a str>,
}

impl<'a> CommandButton<'a> {
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            enabled: true,
            shortcut: None,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Add a shortcut hint.
    pub fn shortcut(mut self, shortcut: &'a str) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Show the button and return true if clicked while enabled.
    pub fn show(self, ui: &mut Ui) -> bool {
        let font_id = FontId::proportional(12.0);
        let galley = ui
            .painter()
            .layout_no_wrap(self.label.to_string(), font_id.clone(), Color32::PLACEHOLDER);
        let size = vec2(galley.size().x + 16.0, 24.0);

        let sense = if self.enabled {
            Sense::click()
        } else {
            Sense::hover()
        };
        let (rect, response) = ui.allocate_exact_size(size, sense);

        if ui.is_rect_visible(rect) {
            let bg_color = if self.enabled && response.hovered() {
                theme::HOVER_BG
            } else {
                Color32::TRANSPARENT
            };
            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);

            let text_color = if self.enabled { theme::TEXT } else { theme::DISABLED };
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                self.label,
                font_id,
                text_color,
            );
        }

        let clicked = self.enabled && response.clicked();
        let response = match self.shortcut {
            Some(shortcut) => response.on_hover_text(shortcut),
            None => response,
        };
        if self.enabled {
            response.on_hover_cursor(CursorIcon::PointingHand);
        }
        clicked
    }
}
