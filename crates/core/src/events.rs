//! Events module - synchronous dispatch to board listeners
//!
//! Every [`BoardEvent`] is handed, in firing order, to each registered
//! [`BoardListener`] together with a [`BoardStatus`] taken at the moment it
//! fired, then appended to a bounded journal that pollers drain with
//! `take_events`.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::trace;

use crate::types::BoardEvent;

/// Oldest events are dropped past this many undrained entries.
pub const JOURNAL_CAPACITY: usize = 256;

/// Running counts over a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoardTotals {
    pub lines: u32,
    pub pieces: u32,
    pub bad_moves: u32,
}

/// Board state visible to a listener while it handles an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardStatus {
    pub active_face: usize,
    pub target_face: usize,
    pub angle: f32,
    /// Meaningful while handling `on_piece_commit`.
    pub was_bad_move: bool,
    /// Rows cleared by the commit being reported.
    pub last_line_completion_count: u32,
    pub totals: BoardTotals,
}

/// Collaborator interface for audio, effects and scoring.
///
/// Every method defaults to a no-op so implementors pick the events they
/// care about.
pub trait BoardListener: Send {
    fn on_board_rotate(&mut self, _board: &BoardStatus) {}
    fn on_board_rotate_blocked(&mut self, _board: &BoardStatus) {}
    fn on_piece_move(&mut self, _board: &BoardStatus, _dx: i32, _dy: i32) {}
    fn on_piece_rotate(&mut self, _board: &BoardStatus) {}
    fn on_piece_slide(&mut self, _board: &BoardStatus, _dx: i32) {}
    fn on_piece_hurry(&mut self, _board: &BoardStatus, _factor: u32) {}
    fn on_piece_drop(&mut self, _board: &BoardStatus) {}
    fn on_piece_commit(&mut self, _board: &BoardStatus) {}
    fn on_line_complete(&mut self, _board: &BoardStatus) {}
    fn on_top_out(&mut self, _board: &BoardStatus) {}
}

fn dispatch(listener: &mut dyn BoardListener, event: BoardEvent, board: &BoardStatus) {
    match event {
        BoardEvent::BoardRotate { .. } => listener.on_board_rotate(board),
        BoardEvent::BoardRotateBlocked => listener.on_board_rotate_blocked(board),
        BoardEvent::PieceMove { dx, dy } => listener.on_piece_move(board, dx, dy),
        BoardEvent::PieceRotate => listener.on_piece_rotate(board),
        BoardEvent::PieceSlide { dx } => listener.on_piece_slide(board, dx),
        BoardEvent::PieceHurry { factor } => listener.on_piece_hurry(board, factor),
        BoardEvent::PieceDrop => listener.on_piece_drop(board),
        BoardEvent::PieceCommit { .. } => listener.on_piece_commit(board),
        BoardEvent::LineComplete { .. } => listener.on_line_complete(board),
        BoardEvent::TopOut => listener.on_top_out(board),
    }
}

#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn BoardListener>>,
    journal: VecDeque<BoardEvent>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("journal", &self.journal)
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Box<dyn BoardListener>) {
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Dispatch to every listener in registration order, then journal.
    pub fn fire(&mut self, event: BoardEvent, board: &BoardStatus) {
        trace!(event = event.as_str(), ?event, "fire");
        for listener in &mut self.listeners {
            dispatch(listener.as_mut(), event, board);
        }

        if self.journal.len() == JOURNAL_CAPACITY {
            self.journal.pop_front();
        }
        self.journal.push_back(event);
    }

    pub fn journal_len(&self) -> usize {
        self.journal.len()
    }

    /// Move every journaled event into `out`, oldest first.
    pub fn drain_into(&mut self, out: &mut Vec<BoardEvent>) {
        out.extend(self.journal.drain(..));
    }
}
