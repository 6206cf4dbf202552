//! Piece module - the falling piece
//!
//! An [`ActivePiece`] is a style, a pivot on the presented face and four
//! cubes at offsets from that pivot. It owns its fall timer, the armed slide
//! direction and the irreversible drop flag. It never writes to the board:
//! once [`ActivePiece::advance`] reports that the piece settled, the
//! controller takes the cubes with [`ActivePiece::commit_cells`].

use arrayvec::ArrayVec;
use tracing::debug;

use crate::collision::{check_move, rotated_offset, rotation_blocked};
use crate::cube::Cube;
use crate::geometry::BoardDims;
use crate::grid::FaceView;
use crate::types::{PieceStyle, Spin, DEFAULT_FALL_MS, DROP_FALL_MS, PIECE_CELLS, SLIDE_SENSITIVITY};

/// Cell offsets of a style around its pivot, y up.
pub fn shape(style: PieceStyle) -> [(i32, i32); PIECE_CELLS] {
    match style {
        PieceStyle::Square => [(0, 0), (1, 0), (1, -1), (0, -1)],
        PieceStyle::Z => [(0, 0), (-1, 0), (0, -1), (1, -1)],
        PieceStyle::S => [(0, 0), (1, 0), (0, -1), (-1, -1)],
        PieceStyle::L => [(0, 1), (0, 0), (0, -1), (1, -1)],
        PieceStyle::R => [(0, 1), (0, 0), (0, -1), (-1, -1)],
        PieceStyle::T => [(0, 0), (-1, 0), (1, 0), (0, -1)],
        PieceStyle::I => [(0, 1), (0, 0), (0, -1), (0, -2)],
    }
}

/// Fall tuning handed to every spawned piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceTiming {
    /// Resting fall interval.
    pub fall_ms: u32,
    /// Fall interval once dropped.
    pub drop_fall_ms: u32,
    /// Fraction of the fall interval after which a blocked sideways move arms a slide.
    pub slide_sensitivity: f32,
}

impl Default for PieceTiming {
    fn default() -> Self {
        Self {
            fall_ms: DEFAULT_FALL_MS,
            drop_fall_ms: DROP_FALL_MS,
            slide_sensitivity: SLIDE_SENSITIVITY,
        }
    }
}

/// Whether a move is applied or only tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMode {
    Apply,
    /// Legality test only. A probe can still arm a slide.
    Probe,
}

/// What one [`ActivePiece::advance`] step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FallOutcome {
    /// The forced-down tick moved the piece one row.
    pub fell: bool,
    /// An armed slide shifted the piece this way.
    pub slid: Option<i32>,
    /// The piece can fall no further and must be committed.
    pub settled: bool,
}

#[derive(Debug, Clone)]
struct PieceCell {
    offset: (i32, i32),
    cube: Cube,
}

#[derive(Debug, Clone)]
pub struct ActivePiece {
    style: PieceStyle,
    cells: ArrayVec<PieceCell, PIECE_CELLS>,
    dims: BoardDims,
    face_x: i32,
    face_y: i32,
    resting_ms: u32,
    fall_ms: u32,
    drop_fall_ms: u32,
    elapsed_ms: u32,
    slide_sensitivity: f32,
    slide: Option<i32>,
    dropping: bool,
    committed: bool,
}

impl ActivePiece {
    /// Spawn a piece in the top middle of the presented face, pivot just
    /// above the ceiling.
    pub fn spawn(style: PieceStyle, palette: u8, dims: BoardDims, timing: PieceTiming) -> Self {
        let cells = shape(style)
            .into_iter()
            .map(|offset| PieceCell {
                offset,
                cube: Cube::new(palette),
            })
            .collect();

        let mut piece = Self {
            style,
            cells,
            dims,
            face_x: (dims.side_width() / 2) as i32,
            face_y: dims.board_height() as i32,
            resting_ms: timing.fall_ms.max(1),
            fall_ms: timing.fall_ms.max(1),
            drop_fall_ms: timing.drop_fall_ms.max(1),
            elapsed_ms: 0,
            slide_sensitivity: timing.slide_sensitivity,
            slide: None,
            dropping: false,
            committed: false,
        };
        piece.sync_cubes();
        piece
    }

    pub fn style(&self) -> PieceStyle {
        self.style
    }

    pub fn face_x(&self) -> i32 {
        self.face_x
    }

    pub fn face_y(&self) -> i32 {
        self.face_y
    }

    /// Reposition the pivot without collision checks. For scripted layouts.
    pub fn set_face_position(&mut self, face_x: i32, face_y: i32) {
        self.face_x = face_x;
        self.face_y = face_y;
        self.sync_cubes();
    }

    pub fn offsets(&self) -> ArrayVec<(i32, i32), PIECE_CELLS> {
        self.cells.iter().map(|c| c.offset).collect()
    }

    /// Face-relative cell locations: pivot plus offsets.
    pub fn face_positions(&self) -> ArrayVec<(i32, i32), PIECE_CELLS> {
        self.cells
            .iter()
            .map(|c| (self.face_x + c.offset.0, self.face_y + c.offset.1))
            .collect()
    }

    /// Cubes of the piece with their model-space positions. Empty once committed.
    pub fn cubes(&self) -> impl Iterator<Item = &Cube> + '_ {
        self.cells.iter().map(|c| &c.cube)
    }

    pub fn fall_ms(&self) -> u32 {
        self.fall_ms
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    /// Progress toward the next forced-down tick.
    pub fn fall_fraction(&self) -> f32 {
        self.elapsed_ms as f32 / self.fall_ms as f32
    }

    pub fn slide_direction(&self) -> Option<i32> {
        self.slide
    }

    pub fn is_dropping(&self) -> bool {
        self.dropping
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Try to translate the piece by `(dx, dy)` on `view`'s face.
    ///
    /// A sideways move that runs into a cube late in the fall cycle arms a
    /// slide in that direction, whether or not the move is applied. Only a
    /// downward move resets the fall timer.
    pub fn try_move(&mut self, view: &FaceView<'_>, dx: i32, dy: i32, mode: MoveMode) -> bool {
        if self.committed {
            return false;
        }

        let offsets = self.offsets();
        let check = check_move(
            view,
            (self.face_x, self.face_y),
            &offsets,
            dx,
            dy,
            self.elapsed_ms != 0,
        );

        if check.slide_collision() && self.fall_fraction() >= self.slide_sensitivity {
            debug!(direction = dx, "slide armed");
            self.slide = Some(dx);
        }

        if !check.is_clear() {
            return false;
        }

        if mode == MoveMode::Apply {
            self.face_x += dx;
            self.face_y += dy;
            if dy < 0 {
                self.elapsed_ms = 0;
            }
            self.sync_cubes();
        }
        true
    }

    /// Quarter-turn every offset about the pivot, all or nothing.
    pub fn rotate(&mut self, view: &FaceView<'_>, spin: Spin) -> bool {
        if !self.style.can_rotate() || self.dropping || self.committed {
            return false;
        }

        let offsets = self.offsets();
        if rotation_blocked(view, (self.face_x, self.face_y), &offsets, spin) {
            return false;
        }

        for cell in &mut self.cells {
            cell.offset = rotated_offset(cell.offset, spin);
        }
        self.sync_cubes();
        true
    }

    /// Enter the permanent fast fall. Returns false if already dropping.
    pub fn drop(&mut self) -> bool {
        if self.dropping || self.committed {
            return false;
        }
        self.dropping = true;
        self.fall_ms = self.drop_fall_ms;
        true
    }

    /// Fall `factor` times faster than resting speed, keeping the piece's
    /// drawn height where it is. Ignored while dropping and for a zero factor.
    pub fn modulate_speed(&mut self, factor: u32) -> bool {
        if self.dropping || factor == 0 {
            return false;
        }

        let fraction = self.fall_fraction();
        self.fall_ms = (self.resting_ms / factor).max(1);
        self.elapsed_ms = (fraction * self.fall_ms as f32) as u32;
        true
    }

    /// One frame of falling.
    ///
    /// Below the fall interval this only animates the cubes toward the next
    /// row. On the tick it moves the piece down, spends an armed slide and
    /// reports whether the piece has settled.
    pub fn advance(&mut self, view: &FaceView<'_>, dt_ms: u32) -> FallOutcome {
        let mut outcome = FallOutcome::default();
        if self.committed {
            return outcome;
        }

        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
        if self.elapsed_ms < self.fall_ms {
            self.sync_cubes();
            return outcome;
        }

        if self.try_move(view, 0, -1, MoveMode::Apply) {
            outcome.fell = true;
            if let Some(dir) = self.slide {
                if self.try_move(view, dir, 0, MoveMode::Apply) {
                    debug!(direction = dir, "slide after fall");
                    outcome.slid = Some(dir);
                }
            }
            // Moved down onto something it cannot fall into.
            if !self.try_move(view, 0, -1, MoveMode::Probe) {
                outcome.settled = true;
            }
        } else if let Some(dir) = self.slide {
            if self.try_move(view, dir, 0, MoveMode::Apply) {
                debug!(direction = dir, "slide at rest");
                outcome.slid = Some(dir);
            } else {
                debug!(direction = dir, "slide failed, settling");
                outcome.settled = true;
            }
        } else {
            outcome.settled = true;
        }

        self.reset_fall_cycle();
        outcome
    }

    /// Mark the piece committed and hand over its cubes with their
    /// face-relative locations.
    pub fn commit_cells(&mut self) -> ArrayVec<(i32, i32, Cube), PIECE_CELLS> {
        self.committed = true;
        let (face_x, face_y) = (self.face_x, self.face_y);
        self.cells
            .drain(..)
            .map(|c| (face_x + c.offset.0, face_y + c.offset.1, c.cube))
            .collect()
    }

    fn reset_fall_cycle(&mut self) {
        self.elapsed_ms = 0;
        self.slide = None;
        self.sync_cubes();
    }

    fn sync_cubes(&mut self) {
        let drift = self.fall_fraction().min(1.0);
        for cell in &mut self.cells {
            let x = self.face_x + cell.offset.0;
            let y = (self.face_y + cell.offset.1) as f32 - drift;
            cell.cube.set_position(self.dims.piece_position(x, y));
        }
    }
}
