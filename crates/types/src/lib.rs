//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data with no external dependencies, so they can be used
//! by the simulation, the input mapper and the terminal renderer alike.
//!
//! # Board Shape
//!
//! The playfield is a four-sided prism. Every face is `side_width` columns wide,
//! and adjacent faces share their edge column, so the unrolled board is
//! `side_width * 4 - 4` columns wide.
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Frame step used by the terminal loop (~60 FPS) |
//! | `DEFAULT_FALL_MS` | 600 | Resting interval between forced-down ticks |
//! | `DROP_FALL_MS` | 30 | Fall interval once a piece is dropped |
//! | `BOARD_SPIN_MS` | 230 | Duration of a face-to-face board spin |
//! | `COMMIT_FLASH_MS` | 600 | Highlight on freshly committed cubes |
//! | `CLEAR_FLASH_MS` | 325 | Highlight on cubes ejected by a line clear |
//!
//! # Examples
//!
//! ```
//! use cubetris_types::{BoardCommand, PieceStyle, Spin, SIDE_COUNT};
//!
//! assert_eq!(SIDE_COUNT, 4);
//! assert!(!PieceStyle::Square.can_rotate());
//! assert_eq!(Spin::Clockwise.sign(), 1);
//! assert_eq!(BoardCommand::from_str("spinLeft"), Some(BoardCommand::SpinLeft));
//! ```

/// Number of faces around the board.
pub const SIDE_COUNT: usize = 4;

/// Number of cells in every piece style.
pub const PIECE_CELLS: usize = 4;

/// Default face width (columns per face, shared edges included).
pub const DEFAULT_SIDE_WIDTH: usize = 7;

/// Default board height in rows.
pub const DEFAULT_BOARD_HEIGHT: usize = 18;

/// Frame step used by the terminal loop (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Resting fall interval: one forced-down tick every 600ms.
pub const DEFAULT_FALL_MS: u32 = 600;

/// Fall interval forced on a dropped piece.
pub const DROP_FALL_MS: u32 = 30;

/// Fraction of the fall interval after which a blocked sideways move arms a slide.
pub const SLIDE_SENSITIVITY: f32 = 0.60;

/// Speed factor applied while the player hurries a piece.
pub const HURRY_FACTOR: u32 = 4;

/// Duration of a board spin between two adjacent faces.
pub const BOARD_SPIN_MS: u32 = 230;

/// Presented angle (degrees about the vertical axis) of each face.
pub const FACE_ANGLES: [f32; SIDE_COUNT] = [0.0, 90.0, 180.0, 270.0];

/// Outward normal of each face, `(x, y, z)`.
pub const FACE_NORMALS: [[f32; 3]; SIDE_COUNT] = [
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0],
    [0.0, 0.0, -1.0],
    [-1.0, 0.0, 0.0],
];

/// Flash duration for cubes written by a commit.
pub const COMMIT_FLASH_MS: u32 = 600;

/// Flash duration for cubes ejected by a line clear.
pub const CLEAR_FLASH_MS: u32 = 325;

/// Maximum number of ejected cubes alive at once; extra cleared cubes are discarded.
pub const MAX_EJECTED_CUBES: usize = 100;

/// Outward speed of an ejected cube along its face normal.
pub const EJECT_SPEED: f32 = 10.0;

/// Upper bound of the random jitter added to each ejection velocity component.
pub const EJECT_JITTER: f32 = 4.0;

/// Vertical acceleration applied to ejected cubes.
pub const GRAVITY: f32 = -9.8;

/// Ejected cubes below this height are dead.
pub const EJECT_KILL_Y: f32 = -10.0;

/// Number of cube colors a piece can be drawn with.
pub const PALETTE_SIZE: u8 = 7;


/// The seven piece styles.
///
/// Offsets are defined around a pivot at `(0, 0)`, y pointing up:
/// - **Square**: 2x2 block, never rotates
/// - **Z** / **S**: skew pieces
/// - **L** / **R**: three-tall columns with a foot to the right / left
/// - **T**: three wide with a nub below
/// - **I**: four tall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceStyle {
    Square,
    Z,
    S,
    L,
    R,
    T,
    I,
}

impl PieceStyle {
    /// All styles, in spawn-table order.
    pub const ALL: [PieceStyle; 7] = [
        PieceStyle::Square,
        PieceStyle::Z,
        PieceStyle::S,
        PieceStyle::L,
        PieceStyle::R,
        PieceStyle::T,
        PieceStyle::I,
    ];

    /// Square pieces never rotate.
    pub fn can_rotate(&self) -> bool {
        !matches!(self, PieceStyle::Square)
    }

    /// Parse a style from string (case-insensitive)
    ///
    /// ```
    /// use cubetris_types::PieceStyle;
    ///
    /// assert_eq!(PieceStyle::from_str("i"), Some(PieceStyle::I));
    /// assert_eq!(PieceStyle::from_str("Square"), Some(PieceStyle::Square));
    /// assert_eq!(PieceStyle::from_str("o"), Some(PieceStyle::Square));
    /// assert_eq!(PieceStyle::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "square" | "o" => Some(PieceStyle::Square),
            "z" => Some(PieceStyle::Z),
            "s" => Some(PieceStyle::S),
            "l" => Some(PieceStyle::L),
            "r" | "j" => Some(PieceStyle::R),
            "t" => Some(PieceStyle::T),
            "i" => Some(PieceStyle::I),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceStyle::Square => "square",
            PieceStyle::Z => "z",
            PieceStyle::S => "s",
            PieceStyle::L => "l",
            PieceStyle::R => "r",
            PieceStyle::T => "t",
            PieceStyle::I => "i",
        }
    }
}

/// Direction of a quarter turn, for both piece rotation and board spins.
///
/// `Clockwise` is the `+1` direction: a piece turns clockwise and the board
/// presents the face to the right of the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spin {
    Clockwise,
    CounterClockwise,
}

impl Spin {
    /// Integer multiplier used by the rotation and sweep math.
    pub fn sign(&self) -> i32 {
        match self {
            Spin::Clockwise => 1,
            Spin::CounterClockwise => -1,
        }
    }

    /// Map a raw `-1 | 1` direction onto a spin.
    ///
    /// ```
    /// use cubetris_types::Spin;
    ///
    /// assert_eq!(Spin::from_sign(1), Some(Spin::Clockwise));
    /// assert_eq!(Spin::from_sign(-1), Some(Spin::CounterClockwise));
    /// assert_eq!(Spin::from_sign(0), None);
    /// ```
    pub fn from_sign(sign: i32) -> Option<Self> {
        match sign {
            1 => Some(Spin::Clockwise),
            -1 => Some(Spin::CounterClockwise),
            _ => None,
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            Spin::Clockwise => Spin::CounterClockwise,
            Spin::CounterClockwise => Spin::Clockwise,
        }
    }
}

/// Commands accepted by the board
///
/// These are produced by the input mapper and applied through
/// `BoardController::apply_command`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardCommand {
    /// Move the piece one column left
    MoveLeft,
    /// Move the piece one column right
    MoveRight,
    /// Nudge the piece one row down
    MoveDown,
    /// Rotate the piece clockwise
    RotateCw,
    /// Rotate the piece counter-clockwise
    RotateCcw,
    /// Spin the board to present the face on the left
    SpinLeft,
    /// Spin the board to present the face on the right
    SpinRight,
    /// Permanently fast-fall the piece until it commits
    Drop,
    /// Fall at `HURRY_FACTOR` times the resting speed
    Hurry,
    /// Restore the resting fall speed
    Ease,
}

impl BoardCommand {
    /// Parse a command from its camelCase name (case-insensitive)
    ///
    /// ```
    /// use cubetris_types::BoardCommand;
    ///
    /// assert_eq!(BoardCommand::from_str("moveLeft"), Some(BoardCommand::MoveLeft));
    /// assert_eq!(BoardCommand::from_str("DROP"), Some(BoardCommand::Drop));
    /// assert_eq!(BoardCommand::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(BoardCommand::MoveLeft),
            "moveright" => Some(BoardCommand::MoveRight),
            "movedown" => Some(BoardCommand::MoveDown),
            "rotatecw" => Some(BoardCommand::RotateCw),
            "rotateccw" => Some(BoardCommand::RotateCcw),
            "spinleft" => Some(BoardCommand::SpinLeft),
            "spinright" => Some(BoardCommand::SpinRight),
            "drop" => Some(BoardCommand::Drop),
            "hurry" => Some(BoardCommand::Hurry),
            "ease" => Some(BoardCommand::Ease),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BoardCommand::MoveLeft => "moveLeft",
            BoardCommand::MoveRight => "moveRight",
            BoardCommand::MoveDown => "moveDown",
            BoardCommand::RotateCw => "rotateCw",
            BoardCommand::RotateCcw => "rotateCcw",
            BoardCommand::SpinLeft => "spinLeft",
            BoardCommand::SpinRight => "spinRight",
            BoardCommand::Drop => "drop",
            BoardCommand::Hurry => "hurry",
            BoardCommand::Ease => "ease",
        }
    }
}

/// Events produced by the board, one per occurrence.
///
/// Consumed by audio, visual effects and scoring collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    /// A board spin started from face `from` toward face `to`.
    BoardRotate { from: u8, to: u8 },
    /// A board spin was refused because the piece would sweep through cubes.
    BoardRotateBlocked,
    /// The piece moved by a player command.
    PieceMove { dx: i32, dy: i32 },
    /// The piece rotated.
    PieceRotate,
    /// An armed slide shifted the piece sideways as it settled.
    PieceSlide { dx: i32 },
    /// The fall speed was modulated.
    PieceHurry { factor: u32 },
    /// The piece entered its permanent fast fall.
    PieceDrop,
    /// The piece was written into the board.
    PieceCommit { bad_move: bool, lines: u32 },
    /// One or more rows completed during the last commit.
    LineComplete { rows: u32 },
    /// A piece settled with cells above the ceiling; the board is finished.
    TopOut,
}

impl BoardEvent {
    /// Stable lowercase name, used for logs and the HUD.
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardEvent::BoardRotate { .. } => "board_rotate",
            BoardEvent::BoardRotateBlocked => "board_rotate_blocked",
            BoardEvent::PieceMove { .. } => "piece_move",
            BoardEvent::PieceRotate => "piece_rotate",
            BoardEvent::PieceSlide { .. } => "piece_slide",
            BoardEvent::PieceHurry { .. } => "piece_hurry",
            BoardEvent::PieceDrop => "piece_drop",
            BoardEvent::PieceCommit { .. } => "piece_commit",
            BoardEvent::LineComplete { .. } => "line_complete",
            BoardEvent::TopOut => "top_out",
        }
    }
}

#[cfg(test)]
mod tests_events {
    use super::*;

    #[test]
    fn timing_defaults() {
        assert_eq!(DEFAULT_FALL_MS, 600);
        assert_eq!(DROP_FALL_MS, 30);
        assert_eq!(BOARD_SPIN_MS, 230);
        assert_eq!(COMMIT_FLASH_MS, 600);
        assert_eq!(CLEAR_FLASH_MS, 325);
        assert_eq!(DEFAULT_FALL_MS / HURRY_FACTOR, 150);
    }

    #[test]
    fn names_round_trip() {
        for style in PieceStyle::ALL {
            assert_eq!(PieceStyle::from_str(style.as_str()), Some(style));
        }
        for spin in [Spin::Clockwise, Spin::CounterClockwise] {
            assert_eq!(Spin::from_sign(spin.sign()), Some(spin));
            assert_eq!(spin.reversed().sign(), -spin.sign());
        }
        assert_eq!(BoardCommand::from_str(BoardCommand::RotateCcw.as_str()), Some(BoardCommand::RotateCcw));
    }

    #[test]
    fn face_normals_are_unit_and_outward() {
        for (face, n) in FACE_NORMALS.iter().enumerate() {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-6, "face {face}");
            assert_eq!(n[1], 0.0);
        }
        assert_eq!(FACE_ANGLES[SIDE_COUNT - 1], 270.0);
    }
}
