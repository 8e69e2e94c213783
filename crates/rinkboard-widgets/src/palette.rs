//! The board toolbar: tools, colors and history commands.

use egui::{Color32, Stroke, Ui};
use rinkboard_core::{Canvas, RinkColor, Tool};

use crate::buttons::{CommandButton, ToolButton};
use crate::colors::{ColorSwatch, RINK_PALETTE};

/// Something the user picked in the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteEvent {
    ToolSelected(Tool),
    ColorSelected(RinkColor),
    Undo,
    Redo,
    DeleteSelected,
    ClearAll,
}

impl PaletteEvent {
    /// Forward the event to the controller. Returns whether the board changed.
    pub fn apply(self, canvas: &mut Canvas) -> bool {
        log::debug!("Palette event: {self:?}");
        match self {
            PaletteEvent::ToolSelected(tool) => {
                canvas.select_tool(tool);
                false
            }
            PaletteEvent::ColorSelected(color) => {
                canvas.set_color(color);
                false
            }
            PaletteEvent::Undo => canvas.undo(),
            PaletteEvent::Redo => canvas.redo(),
            PaletteEvent::DeleteSelected => canvas.delete_selected(),
            PaletteEvent::ClearAll => canvas.clear_all(),
        }
    }
}

/// Snapshot of the controller state the toolbar displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolPalette {
    pub tool: Tool,
    pub color: RinkColor,
    pub can_undo: bool,
    pub can_redo: bool,
    pub has_selection: bool,
    pub has_elements: bool,
}

impl ToolPalette {
    pub fn for_canvas(canvas: &Canvas) -> Self {
        Self {
            tool: canvas.tool(),
            color: canvas.color(),
            can_undo: canvas.can_undo(),
            can_redo: canvas.can_redo(),
            has_selection: !canvas.selection().is_empty(),
            has_elements: !canvas.elements().is_empty(),
        }
    }

    /// Lay the toolbar out in one row. Returns the click of this frame, if any.
    pub fn show(&self, ui: &mut Ui) -> Option<PaletteEvent> {
        let mut event = None;

        ui.horizontal(|ui| {
            for tool in Tool::ALL {
                let (clicked, _) = ToolButton::new(tool, tool == self.tool).show(ui);
                if clicked {
                    event = Some(PaletteEvent::ToolSelected(tool));
                }
            }

            divider(ui);

            for (name, color) in RINK_PALETTE {
                let (clicked, _) = ColorSwatch::new(color, name)
                    .selected(color == self.color)
                    .show(ui);
                if clicked {
                    event = Some(PaletteEvent::ColorSelected(color));
                }
            }

            divider(ui);

            let commands = [
                ("Undo", "Ctrl+Z", self.can_undo, PaletteEvent::Undo),
                ("Redo", "Ctrl+Shift+Z", self.can_redo, PaletteEvent::Redo),
                ("Delete", "Del", self.has_selection, PaletteEvent::DeleteSelected),
                ("Clear", "", self.has_elements, PaletteEvent::ClearAll),
            ];
            for (label, shortcut, enabled, command) in commands {
                let mut button = CommandButton::new(label).enabled(enabled);
                if !shortcut.is_empty() {
                    button = button.shortcut(shortcut);
                }
                if button.show(ui) {
                    event = Some(command);
                }
            }
        });

        event
    }
}

fn divider(ui: &mut Ui) {
    let rect = ui.available_rect_before_wrap();
    let x = rect.left() + 4.0;
    let top = rect.top() + 6.0;
    ui.painter().line_segment(
        [egui::pos2(x, top), egui::pos2(x, top + 20.0)],
        Stroke::new(1.0, Color32::from_gray(210)),
    );
    ui.add_space(9.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Event, Modifiers, PointerButton, Pos2, RawInput};
    use kurbo::{Point, Rect};
    use rinkboard_core::input::Modifiers as BoardModifiers;
    use rinkboard_core::{ArrowKind, MarkerKind};

    fn board_with_marker() -> Canvas {
        let mut canvas = Canvas::new();
        canvas.set_canvas_rect(Rect::new(0.0, 0.0, 800.0, 400.0));
        canvas.set_tool("puck").unwrap();
        canvas.pointer_down(Point::new(400.0, 200.0), BoardModifiers::NONE);
        canvas.pointer_up(Point::new(400.0, 200.0));
        canvas
    }

    #[test]
    fn test_snapshot_tracks_canvas() {
        let canvas = board_with_marker();
        let palette = ToolPalette::for_canvas(&canvas);
        assert_eq!(palette.tool, Tool::Marker(MarkerKind::Puck));
        assert!(palette.can_undo);
        assert!(!palette.can_redo);
        assert!(!palette.has_selection);
        assert!(palette.has_elements);
    }

    #[test]
    fn test_events_drive_canvas() {
        let mut canvas = board_with_marker();

        assert!(!PaletteEvent::ToolSelected(Tool::Arrow(ArrowKind::Pass)).apply(&mut canvas));
        assert_eq!(canvas.tool(), Tool::Arrow(ArrowKind::Pass));

        let red = RINK_PALETTE[2].1;
        PaletteEvent::ColorSelected(red).apply(&mut canvas);
        assert_eq!(canvas.color(), red);

        assert!(PaletteEvent::Undo.apply(&mut canvas));
        assert!(canvas.elements().is_empty());
        assert!(PaletteEvent::Redo.apply(&mut canvas));
        assert_eq!(canvas.elements().len(), 1);

        assert!(!PaletteEvent::DeleteSelected.apply(&mut canvas));
        assert!(PaletteEvent::ClearAll.apply(&mut canvas));
        assert!(canvas.elements().is_empty());
    }

    fn run_frame(ctx: &egui::Context, input: RawInput, palette: &ToolPalette) -> Option<PaletteEvent> {
        let mut event = None;
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                if let Some(e) = palette.show(ui) {
                    event = Some(e);
                }
            });
        });
        event
    }

    #[test]
    fn test_headless_frame_without_input() {
        let ctx = egui::Context::default();
        let palette = ToolPalette::for_canvas(&Canvas::new());
        assert_eq!(run_frame(&ctx, RawInput::default(), &palette), None);
        assert_eq!(run_frame(&ctx, RawInput::default(), &palette), None);
    }

    #[test]
    fn test_click_selects_tool() {
        let ctx = egui::Context::default();
        let palette = ToolPalette::for_canvas(&Canvas::new());

        // Find where the first tool button lands.
        let mut first = None;
        let _ = ctx.run(RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.horizontal(|ui| {
                    first = Some(ToolButton::new(Tool::Select, true).show(ui).1);
                });
            });
        });
        let pos: Pos2 = first.unwrap().center();

        let press = RawInput {
            events: vec![
                Event::PointerMoved(pos),
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed: true,
                    modifiers: Modifiers::NONE,
                },
            ],
            ..Default::default()
        };
        let release = RawInput {
            events: vec![Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed: false,
                modifiers: Modifiers::NONE,
            }],
            ..Default::default()
        };

        assert_eq!(run_frame(&ctx, press, &palette), None);
        assert_eq!(
            run_frame(&ctx, release, &palette),
            Some(PaletteEvent::ToolSelected(Tool::Select))
        );
    }
}
