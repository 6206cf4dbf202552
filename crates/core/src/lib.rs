//! Core board simulation - pure, deterministic, and testable
//!
//! This crate holds every rule of the game and nothing that draws, plays
//! sound or reads devices. Those collaborators talk to it through the command
//! API on [`BoardController`], the [`BoardListener`] events and read-only
//! grid handles.
//!
//! # Module Structure
//!
//! - [`geometry`]: board dimensions, face/column wrapping and 3D placement
//! - [`grid`]: the committed-cell matrix behind a coarse read/write lock
//! - [`collision`]: legality of piece moves, rotations and board spins
//! - [`piece`]: the falling piece with its fall, slide and drop timers
//! - [`line_clear`]: completed rows, ejected cubes and compaction
//! - [`safe_landing`]: flood fill that flags commits sealing off empty space
//! - [`face_rotation`]: the board-spin state machine
//! - [`controller`]: per-frame orchestration and the event bus
//!
//! # Rules
//!
//! - **Shared edges**: adjacent faces share a column, so a piece can be spun
//!   onto the next face without moving
//! - **Slides**: a sideways move blocked late in a fall cycle is retried when
//!   the piece next ticks down
//! - **Drops**: a dropped piece falls at a fixed fast interval and can no
//!   longer rotate or spin the board
//! - **Bad moves**: a commit that leaves an empty pocket with no way to the
//!   top is flagged on `PieceCommit`
//!
//! # Example
//!
//! ```
//! use cubetris_core::{BoardConfig, BoardController};
//! use cubetris_types::{BoardCommand, BoardEvent};
//!
//! let mut board = BoardController::new(BoardConfig::default()).unwrap();
//! board.start();
//!
//! board.apply_command(BoardCommand::SpinRight);
//! board.apply_command(BoardCommand::Drop);
//! for _ in 0..120 {
//!     board.update(16);
//! }
//!
//! let events = board.take_events();
//! assert!(events.contains(&BoardEvent::BoardRotate { from: 0, to: 1 }));
//! assert!(events.iter().any(|e| matches!(e, BoardEvent::PieceCommit { .. })));
//! ```

pub mod collision;
pub mod config;
pub mod controller;
pub mod cube;
pub mod error;
pub mod events;
pub mod face_rotation;
pub mod geometry;
pub mod grid;
pub mod line_clear;
pub mod piece;
pub mod rng;
pub mod safe_landing;
pub mod snapshot;

pub use cubetris_types as types;

pub use collision::MoveCheck;
pub use config::BoardConfig;
pub use controller::BoardController;
pub use cube::Cube;
pub use error::{Error, Result};
pub use events::{BoardListener, BoardStatus, BoardTotals, EventBus};
pub use face_rotation::FaceRotation;
pub use geometry::BoardDims;
pub use grid::{BoardGrid, FaceView, GridCells, GridHandle, GridPos, Slot};
pub use line_clear::LineClearEngine;
pub use piece::{ActivePiece, FallOutcome, MoveMode, PieceTiming};
pub use rng::SimpleRng;
pub use safe_landing::SafeLandingAnalyzer;
pub use snapshot::{BoardSnapshot, PieceSnapshot};
