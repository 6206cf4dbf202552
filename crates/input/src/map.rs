//! Key mapping from terminal events to board commands.

use crate::types::BoardCommand;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map a key press to a board command.
pub fn handle_key_event(key: KeyEvent) -> Option<BoardCommand> {
    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(BoardCommand::MoveLeft)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(BoardCommand::MoveRight)
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(BoardCommand::Hurry)
        }

        // Piece rotation
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(BoardCommand::RotateCw)
        }
        KeyCode::Char('z') | KeyCode::Char('Z') | KeyCode::Char('x') | KeyCode::Char('X') => {
            Some(BoardCommand::RotateCcw)
        }

        // Board spins
        KeyCode::Char(',') | KeyCode::Char('<') | KeyCode::Char('[') => Some(BoardCommand::SpinLeft),
        KeyCode::Char('.') | KeyCode::Char('>') | KeyCode::Char(']') => Some(BoardCommand::SpinRight),

        KeyCode::Char(' ') | KeyCode::Enter => Some(BoardCommand::Drop),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Check if key toggles pause.
pub fn should_pause(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('p') | KeyCode::Char('P'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Option<BoardCommand> {
        handle_key_event(KeyEvent::from(code))
    }

    #[test]
    fn test_movement_keys() {
        assert_eq!(key(KeyCode::Left), Some(BoardCommand::MoveLeft));
        assert_eq!(key(KeyCode::Right), Some(BoardCommand::MoveRight));
        assert_eq!(key(KeyCode::Down), Some(BoardCommand::Hurry));
        assert_eq!(key(KeyCode::Char('A')), Some(BoardCommand::MoveLeft));
        assert_eq!(key(KeyCode::Char('l')), Some(BoardCommand::MoveRight));
    }

    #[test]
    fn test_rotation_and_spin_keys() {
        assert_eq!(key(KeyCode::Up), Some(BoardCommand::RotateCw));
        assert_eq!(key(KeyCode::Char('x')), Some(BoardCommand::RotateCcw));
        assert_eq!(key(KeyCode::Char(',')), Some(BoardCommand::SpinLeft));
        assert_eq!(key(KeyCode::Char(']')), Some(BoardCommand::SpinRight));
    }

    #[test]
    fn test_drop_and_unmapped() {
        assert_eq!(key(KeyCode::Char(' ')), Some(BoardCommand::Drop));
        assert_eq!(key(KeyCode::Char('c')), None);
        assert_eq!(key(KeyCode::Tab), None);
    }

    #[test]
    fn test_quit_and_pause_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::from(KeyCode::Esc)));
        assert!(should_quit(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
        assert!(should_pause(KeyEvent::from(KeyCode::Char('P'))));
        assert!(!should_pause(KeyEvent::from(KeyCode::Char('q'))));
    }
}
