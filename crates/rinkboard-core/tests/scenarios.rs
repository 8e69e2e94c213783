//! End-to-end gesture scenarios against the public controller API.

use std::sync::Arc;
use std::time::Duration;

use kurbo::{Point, Rect};
use rinkboard_core::input::Instant;
use rinkboard_core::{
    ArrowKind, BoardConfig, Canvas, DefendingSide, DrawingElement, Key, KeyEvent, MarkerKind,
    MemoryStorage, Modifiers, SaveSession, Storage, flip_if_defending_away,
};

mod common;

use common::{block_on, init_logging};

fn board() -> Canvas {
    init_logging();
    let mut canvas = Canvas::new();
    canvas.set_canvas_rect(Rect::new(0.0, 0.0, 800.0, 400.0));
    canvas
}

fn click(canvas: &mut Canvas, x: f64, y: f64) {
    canvas.pointer_down(Point::new(x, y), Modifiers::NONE);
    canvas.pointer_up(Point::new(x, y));
}

#[test]
fn defense_marker_placed_then_deleted() {
    let mut canvas = board();
    canvas.set_tool("defense").unwrap();
    click(&mut canvas, 100.0, 100.0);

    assert_eq!(canvas.elements().len(), 1);
    let marker = canvas.elements().as_slice()[0].as_marker().unwrap().clone();
    assert_eq!(marker.kind, MarkerKind::Defense);
    assert_eq!(marker.position, Point::new(0.125, 0.25));

    canvas.set_tool("select").unwrap();
    click(&mut canvas, 100.0, 100.0);
    assert_eq!(canvas.selection().ids(), &[marker.id()]);

    assert!(canvas.key_down(&KeyEvent::new(Key::Delete)));
    assert!(canvas.elements().is_empty());
    assert!(canvas.selection().is_empty());
}

#[test]
fn movement_arrow_is_filtered_and_simplified() {
    let mut canvas = board();
    canvas.set_tool("movement").unwrap();

    let start = Instant::now();
    canvas.pointer_down(Point::new(50.0, 50.0), Modifiers::NONE);
    for i in 1..=20u64 {
        let y = 50.0 + 5.0 * i as f64;
        canvas.pointer_move_at(Point::new(50.0, y), start + Duration::from_millis(20 * i));
    }

    let captured = canvas.in_progress().unwrap();
    let captured = captured.as_arrow().unwrap();
    assert!(captured.path.len() < 20);
    for pair in captured.path.windows(2) {
        let dy = (pair[1].y - pair[0].y) * 400.0;
        assert!(dy >= 8.0 - 1e-9);
    }

    canvas.pointer_up(Point::new(50.0, 250.0));
    assert!(canvas.in_progress().is_none());

    let persisted = canvas.elements_for_persistence();
    assert_eq!(persisted.len(), 1);
    let arrow = persisted[0].as_arrow().unwrap();
    assert_eq!(arrow.kind, ArrowKind::Movement);
    assert!(arrow.path.len() >= 2);
    assert_eq!(arrow.start_point, Point::new(0.0625, 0.125));
    assert_eq!(arrow.end_point, Point::new(0.0625, 0.625));
}

#[test]
fn second_undo_after_single_change_is_noop() {
    let mut canvas = board();
    canvas.set_tool("puck").unwrap();
    click(&mut canvas, 400.0, 200.0);

    assert!(canvas.undo());
    assert!(canvas.elements().is_empty());
    assert!(!canvas.undo());
    assert!(canvas.elements().is_empty());
}

#[test]
fn undo_all_then_redo_all() {
    let mut canvas = board();
    canvas.set_tool("cone").unwrap();
    for i in 0..6 {
        click(&mut canvas, 50.0 + i as f64 * 100.0, 200.0);
    }
    let final_state = canvas.elements().clone();

    while canvas.undo() {}
    assert!(canvas.elements().is_empty());
    while canvas.redo() {}
    assert_eq!(canvas.elements(), &final_state);

    canvas.undo();
    click(&mut canvas, 700.0, 50.0);
    assert!(!canvas.can_redo());
    assert!(!canvas.redo());
}

#[test]
fn full_board_round_trips_through_storage() {
    let mut canvas = board();

    canvas.set_tool("offense").unwrap();
    click(&mut canvas, 200.0, 200.0);

    canvas.set_tool("pass").unwrap();
    let start = Instant::now();
    canvas.pointer_down(Point::new(200.0, 200.0), Modifiers::NONE);
    canvas.pointer_move_at(Point::new(300.0, 120.0), start + Duration::from_millis(20));
    canvas.pointer_up(Point::new(420.0, 180.0));

    canvas.set_tool("text").unwrap();
    click(&mut canvas, 600.0, 40.0);
    canvas.set_editing_text("Stretch pass");
    canvas.commit_text_edit();

    let storage = Arc::new(MemoryStorage::new());
    let mut session = SaveSession::new(storage.clone(), "coach-42");
    assert!(block_on(session.save_if_dirty(&mut canvas)).unwrap());
    assert!(block_on(storage.exists("coach-42")).unwrap());

    let mut restored = Canvas::with_config(BoardConfig::default());
    block_on(session.load_into(&mut restored)).unwrap();
    assert_eq!(restored.elements(), canvas.elements());

    let kinds: Vec<&str> = restored.elements().iter().map(DrawingElement::type_name).collect();
    assert_eq!(kinds, ["marker", "arrow", "text"]);
}

#[test]
fn away_team_view_mirrors_markers() {
    let mut canvas = board();
    canvas.set_tool("goalie").unwrap();
    click(&mut canvas, 40.0, 200.0);
    let position = canvas.elements().as_slice()[0].as_marker().unwrap().position;
    let mirrored = flip_if_defending_away(position, DefendingSide::Away);
    assert!((mirrored.x - 0.95).abs() < 1e-9);
    assert_eq!(mirrored.y, position.y);
}
