//! Integration tests for the terminal game loop pieces

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent};

use cubetris::core::{BoardConfig, BoardController, Error};
use cubetris::input::{handle_key_event, InputHandler};
use cubetris::term::{BoardView, EventFeed, Viewport};
use cubetris::types::{BoardCommand, BoardEvent, TICK_MS};

#[test]
fn test_session_lifecycle() {
    let mut board = BoardController::new(BoardConfig::default()).unwrap();
    assert!(!board.is_started());
    assert!(board.active_piece().is_none());

    board.start();
    assert!(board.is_started());
    assert!(board.active_piece().is_some());
    assert!(!board.is_topped_out());
}

#[test]
fn test_keys_drive_the_board() {
    let mut board = BoardController::new(BoardConfig::default()).unwrap();
    board.start();
    let start_x = board.active_piece().unwrap().face_x();

    let command = handle_key_event(KeyEvent::from(KeyCode::Left)).unwrap();
    assert_eq!(command, BoardCommand::MoveLeft);
    assert!(board.apply_command(command));
    assert_eq!(board.active_piece().unwrap().face_x(), start_x - 1);

    let spin = handle_key_event(KeyEvent::from(KeyCode::Char('.'))).unwrap();
    assert!(board.apply_command(spin));
    assert_eq!(board.target_face(), 1);

    assert_eq!(
        board.take_events(),
        vec![
            BoardEvent::PieceMove { dx: -1, dy: 0 },
            BoardEvent::BoardRotate { from: 0, to: 1 },
        ]
    );
}

#[test]
fn test_hurry_hold_and_release() {
    let mut board = BoardController::new(BoardConfig::default()).unwrap();
    board.start();
    let mut input = InputHandler::new().with_key_release_timeout_ms(10_000);

    let hurry = input.handle_key_press(KeyCode::Down).unwrap();
    assert!(board.apply_command(hurry));
    assert_eq!(board.active_piece().unwrap().fall_ms(), 150);

    let ease = input.handle_key_release(KeyCode::Down).unwrap();
    assert!(board.apply_command(ease));
    assert_eq!(board.active_piece().unwrap().fall_ms(), 600);

    assert_eq!(
        board.take_events(),
        vec![
            BoardEvent::PieceHurry { factor: 4 },
            BoardEvent::PieceHurry { factor: 1 },
        ]
    );
}

#[test]
fn test_config_from_variables() {
    let vars: HashMap<&str, &str> = [("CUBETRIS_SIDE_WIDTH", "5"), ("CUBETRIS_SEED", "42")]
        .into_iter()
        .collect();
    let config = BoardConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();
    assert_eq!(config.side_width, 5);
    assert_eq!(config.board_height, BoardConfig::default().board_height);
    assert_eq!(config.seed, 42);

    let bad = BoardConfig::from_lookup(|name| {
        (name == "CUBETRIS_BOARD_HEIGHT").then(|| "tall".to_string())
    });
    assert!(matches!(bad, Err(Error::InvalidEnv { .. })));

    let narrow = BoardConfig::from_json(r#"{ "side_width": 1 }"#).unwrap();
    assert!(BoardController::new(narrow).is_err());
}

#[test]
fn test_snapshot_serializes_for_tools() {
    let mut board = BoardController::new(BoardConfig::with_dims(4, 5)).unwrap();
    board.start();
    let json = board.snapshot().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["board_width"], 12);
    assert_eq!(value["cells"].as_array().map(Vec::len), Some(60));
    assert!(value["piece"].is_object());
}

#[test]
fn test_frames_render_a_running_game() {
    let mut board = BoardController::new(BoardConfig::default()).unwrap();
    board.start();
    board.apply_command(BoardCommand::Drop);

    let mut feed = EventFeed::new();
    let mut events = Vec::new();
    for _ in 0..100 {
        board.update(TICK_MS);
        board.drain_events_into(&mut events);
    }
    feed.extend(&events);
    assert!(events.iter().any(|e| matches!(e, BoardEvent::PieceCommit { .. })));

    let snap = board.snapshot();
    assert_eq!(snap.totals.pieces, 1);
    assert_eq!(snap.occupied_count(), 4);

    let fb = BoardView::default().render(&snap, &feed, false, Viewport::new(100, 30));
    let text: String = fb.cells().iter().map(|c| c.ch).collect();
    assert!(text.contains("FACE 0"));
    assert!(text.contains("piece"));
    assert!(text.contains("flame"));
    assert!(text.matches('█').count() >= 4);
}
