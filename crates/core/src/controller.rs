//! Board controller - one game session
//!
//! `BoardController` owns the grid, the active piece, the face rotation and
//! the event bus, and is the only thing that mutates them. Commands are
//! applied immediately; [`BoardController::update`] runs one frame in a fixed
//! order:
//!
//! 1. replace a committed piece with a fresh one
//! 2. animate committed and ejected cubes
//! 3. advance the piece's fall, committing it if it settled
//! 4. advance any board spin
//!
//! A commit writes the piece into the grid, clears completed rows
//! (`LineComplete`), evaluates the landing (`PieceCommit`), and may end the
//! session (`TopOut`).

use arrayvec::ArrayVec;
use glam::Vec3;
use tracing::debug;

use crate::collision::board_spin_blocked;
use crate::config::BoardConfig;
use crate::error::Result;
use crate::events::{BoardListener, BoardStatus, BoardTotals, EventBus};
use crate::face_rotation::FaceRotation;
use crate::geometry::BoardDims;
use crate::grid::{BoardGrid, GridHandle};
use crate::line_clear::LineClearEngine;
use crate::piece::{ActivePiece, MoveMode, PieceTiming};
use crate::rng::SimpleRng;
use crate::safe_landing::SafeLandingAnalyzer;
use crate::snapshot::{BoardSnapshot, PieceSnapshot};
use crate::types::{BoardCommand, BoardEvent, PieceStyle, Spin, COMMIT_FLASH_MS, HURRY_FACTOR, PIECE_CELLS};

#[derive(Debug)]
pub struct BoardController {
    config: BoardConfig,
    dims: BoardDims,
    timing: PieceTiming,
    grid: BoardGrid,
    piece: Option<ActivePiece>,
    rotation: FaceRotation,
    line_clear: LineClearEngine,
    analyzer: SafeLandingAnalyzer,
    rng: SimpleRng,
    bus: EventBus,
    started: bool,
    topped_out: bool,
    was_bad_move: bool,
    last_line_completion_count: u32,
    totals: BoardTotals,
}

impl BoardController {
    /// Create a session with an empty board. Fails on invalid configuration.
    pub fn new(config: BoardConfig) -> Result<Self> {
        let dims = config.validate()?;
        debug!(
            side_width = dims.side_width(),
            board_height = dims.board_height(),
            seed = config.seed,
            "new board"
        );

        Ok(Self {
            dims,
            timing: config.piece_timing(),
            grid: BoardGrid::new(dims),
            piece: None,
            rotation: FaceRotation::new(config.spin_ms),
            line_clear: LineClearEngine::new(config.max_ejected),
            analyzer: SafeLandingAnalyzer::new(),
            rng: SimpleRng::new(config.seed),
            bus: EventBus::new(),
            started: false,
            topped_out: false,
            was_bad_move: false,
            last_line_completion_count: 0,
            totals: BoardTotals::default(),
            config,
        })
    }

    /// Begin play from the current board state by spawning the first piece.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        if self.needs_piece() {
            self.spawn_random_piece();
        }
    }

    pub fn add_listener(&mut self, listener: impl BoardListener + 'static) {
        self.bus.subscribe(Box::new(listener));
    }

    /// Run one frame.
    pub fn update(&mut self, dt_ms: u32) {
        if self.started && self.needs_piece() {
            self.spawn_random_piece();
        }

        let expired = self.grid.animate(dt_ms);
        if expired > 0 {
            debug!(expired, "ejected cubes expired");
        }

        let outcome = match self.piece.as_mut() {
            Some(piece) if !piece.is_committed() => {
                let view = self.grid.face(self.rotation.active_face());
                Some(piece.advance(&view, dt_ms))
            }
            _ => None,
        };
        if let Some(outcome) = outcome {
            if let Some(dx) = outcome.slid {
                self.fire(BoardEvent::PieceSlide { dx });
            }
            if outcome.settled {
                self.commit_active_piece();
            }
        }

        self.rotation.update(dt_ms);
    }

    /// Replace the active piece with a fresh one of `style` at the spawn
    /// point. Refused once the board has topped out.
    pub fn spawn_piece(&mut self, style: PieceStyle) -> bool {
        if self.topped_out {
            return false;
        }
        let palette = self.rng.next_palette();
        debug!(style = style.as_str(), palette, "spawn");
        self.piece = Some(ActivePiece::spawn(style, palette, self.dims, self.timing));
        true
    }

    /// Move the piece by `(dx, dy)` face cells. Fires `PieceMove` on success.
    pub fn move_piece(&mut self, dx: i32, dy: i32) -> bool {
        if self.topped_out {
            return false;
        }
        let Some(piece) = self.piece.as_mut() else {
            return false;
        };
        let moved = {
            let view = self.grid.face(self.rotation.active_face());
            piece.try_move(&view, dx, dy, MoveMode::Apply)
        };
        if moved {
            self.fire(BoardEvent::PieceMove { dx, dy });
        }
        moved
    }

    /// Rotate the piece a quarter turn. Refused while the board spins.
    pub fn rotate_piece(&mut self, spin: Spin) -> bool {
        if self.topped_out || self.rotation.is_rotating() {
            return false;
        }
        let Some(piece) = self.piece.as_mut() else {
            return false;
        };
        let rotated = {
            let view = self.grid.face(self.rotation.active_face());
            piece.rotate(&view, spin)
        };
        if rotated {
            self.fire(BoardEvent::PieceRotate);
        }
        rotated
    }

    /// Spin the board to present the neighbouring face.
    ///
    /// Silently refused while already spinning or while the piece drops.
    /// Fires `BoardRotateBlocked` if the piece would be dragged through
    /// cubes on the way.
    pub fn rotate_board(&mut self, spin: Spin) -> bool {
        if self.topped_out || self.rotation.is_rotating() {
            return false;
        }

        let positions = match self.piece.as_ref() {
            Some(piece) if piece.is_dropping() => return false,
            Some(piece) if !piece.is_committed() => piece.face_positions(),
            _ => ArrayVec::new(),
        };

        let blocked = {
            let view = self.grid.face(self.rotation.active_face());
            board_spin_blocked(&view, &positions, spin)
        };
        if blocked {
            self.fire(BoardEvent::BoardRotateBlocked);
            return false;
        }

        let from = self.rotation.active_face();
        let Some(to) = self.rotation.begin(spin) else {
            return false;
        };
        debug!(from, to, "board rotate");
        self.fire(BoardEvent::BoardRotate {
            from: from as u8,
            to: to as u8,
        });
        true
    }

    /// Put the piece into its permanent fast fall.
    pub fn drop_active_piece(&mut self) -> bool {
        if self.topped_out {
            return false;
        }
        let dropped = self.piece.as_mut().is_some_and(ActivePiece::drop);
        if dropped {
            self.fire(BoardEvent::PieceDrop);
        }
        dropped
    }

    /// Fall `factor` times faster than resting speed; `1` restores it.
    ///
    /// Fires `PieceHurry` whenever there is a piece, even if a dropping
    /// piece ignores the new speed. A zero factor is ignored.
    pub fn modulate_piece_speed(&mut self, factor: u32) -> bool {
        if self.topped_out || factor == 0 {
            return false;
        }
        let Some(piece) = self.piece.as_mut().filter(|p| !p.is_committed()) else {
            return false;
        };
        piece.modulate_speed(factor);
        self.fire(BoardEvent::PieceHurry { factor });
        true
    }

    /// Apply one command from the input mapper.
    pub fn apply_command(&mut self, command: BoardCommand) -> bool {
        match command {
            BoardCommand::MoveLeft => self.move_piece(-1, 0),
            BoardCommand::MoveRight => self.move_piece(1, 0),
            BoardCommand::MoveDown => self.move_piece(0, -1),
            BoardCommand::RotateCw => self.rotate_piece(Spin::Clockwise),
            BoardCommand::RotateCcw => self.rotate_piece(Spin::CounterClockwise),
            BoardCommand::SpinLeft => self.rotate_board(Spin::CounterClockwise),
            BoardCommand::SpinRight => self.rotate_board(Spin::Clockwise),
            BoardCommand::Drop => self.drop_active_piece(),
            BoardCommand::Hurry => self.modulate_piece_speed(HURRY_FACTOR),
            BoardCommand::Ease => self.modulate_piece_speed(1),
        }
    }

    /// Whether the most recent commit sealed off empty space.
    ///
    /// Set just before `PieceCommit` fires and kept until the next commit.
    pub fn was_bad_move(&self) -> bool {
        self.was_bad_move
    }

    /// Rows cleared by the commit being reported. Reset to zero once
    /// `PieceCommit` has been dispatched.
    pub fn last_line_completion_count(&self) -> u32 {
        self.last_line_completion_count
    }

    pub fn active_piece(&self) -> Option<&ActivePiece> {
        self.piece.as_ref().filter(|p| !p.is_committed())
    }

    /// Mutable access to the live piece, for scripted setups.
    pub fn active_piece_mut(&mut self) -> Option<&mut ActivePiece> {
        self.piece.as_mut().filter(|p| !p.is_committed())
    }

    /// Model-space positions of the live piece's cubes.
    pub fn piece_positions(&self) -> ArrayVec<Vec3, PIECE_CELLS> {
        self.active_piece()
            .map(|p| p.cubes().map(|c| c.position()).collect())
            .unwrap_or_default()
    }

    pub fn grid(&self) -> &BoardGrid {
        &self.grid
    }

    /// Mutable grid access, for scripted layouts.
    pub fn grid_mut(&mut self) -> &mut BoardGrid {
        &mut self.grid
    }

    pub fn grid_handle(&self) -> GridHandle {
        self.grid.handle()
    }

    pub fn dims(&self) -> BoardDims {
        self.dims
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn board_angle(&self) -> f32 {
        self.rotation.angle()
    }

    pub fn active_face(&self) -> usize {
        self.rotation.active_face()
    }

    pub fn target_face(&self) -> usize {
        self.rotation.target_face()
    }

    pub fn is_rotating(&self) -> bool {
        self.rotation.is_rotating()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_topped_out(&self) -> bool {
        self.topped_out
    }

    pub fn totals(&self) -> BoardTotals {
        self.totals
    }

    pub fn status(&self) -> BoardStatus {
        BoardStatus {
            active_face: self.rotation.active_face(),
            target_face: self.rotation.target_face(),
            angle: self.rotation.angle(),
            was_bad_move: self.was_bad_move,
            last_line_completion_count: self.last_line_completion_count,
            totals: self.totals,
        }
    }

    /// Drain the event journal, oldest first.
    pub fn take_events(&mut self) -> Vec<BoardEvent> {
        let mut out = Vec::new();
        self.bus.drain_into(&mut out);
        out
    }

    pub fn drain_events_into(&mut self, out: &mut Vec<BoardEvent>) {
        self.bus.drain_into(out);
    }

    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        out.fill_cells(&self.grid.read());
        out.active_face = self.rotation.active_face();
        out.target_face = self.rotation.target_face();
        out.angle = self.rotation.angle();
        out.totals = self.totals;
        out.topped_out = self.topped_out;
        out.piece = self.active_piece().map(|piece| {
            let mut cells = [(0, 0); PIECE_CELLS];
            for (slot, pos) in cells.iter_mut().zip(piece.face_positions()) {
                *slot = pos;
            }
            PieceSnapshot {
                style: piece.style().as_str(),
                palette: piece.cubes().next().map(|c| c.palette()).unwrap_or(0),
                face_x: piece.face_x(),
                face_y: piece.face_y(),
                cells,
                dropping: piece.is_dropping(),
            }
        });
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut snap = BoardSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    fn needs_piece(&self) -> bool {
        !self.topped_out && self.piece.as_ref().map_or(true, ActivePiece::is_committed)
    }

    fn spawn_random_piece(&mut self) {
        let style = self.rng.next_style();
        self.spawn_piece(style);
    }

    fn fire(&mut self, event: BoardEvent) {
        let status = self.status();
        self.bus.fire(event, &status);
    }

    fn commit_active_piece(&mut self) {
        let Some(piece) = self.piece.as_mut() else {
            return;
        };
        let face = self.rotation.active_face();
        let cubes = piece.commit_cells().into_iter().map(|(face_x, face_y, mut cube)| {
            cube.flash(COMMIT_FLASH_MS);
            (face_x, face_y, cube)
        });

        let line_clear = self.line_clear;
        let rng = &mut self.rng;
        let (overflow, rows) = self
            .grid
            .commit_piece(face, cubes, |cells| line_clear.clear_rows(cells, rng));
        if rows > 0 {
            self.last_line_completion_count += rows;
            self.totals.lines += rows;
            self.fire(BoardEvent::LineComplete { rows });
        }

        self.was_bad_move = {
            let cells = self.grid.read();
            self.analyzer.is_bad_move(&cells, self.grid.commit_locations())
        };
        self.totals.pieces += 1;
        if self.was_bad_move {
            self.totals.bad_moves += 1;
        }

        self.fire(BoardEvent::PieceCommit {
            bad_move: self.was_bad_move,
            lines: self.last_line_completion_count,
        });
        self.last_line_completion_count = 0;
        self.grid.clear_commit_locations();

        if overflow > 0 {
            debug!(overflow, "top out");
            self.topped_out = true;
            self.fire(BoardEvent::TopOut);
        }
    }
}
