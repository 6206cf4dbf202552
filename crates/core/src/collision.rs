//! Collision module - legality of candidate piece positions
//!
//! Pure predicates over a [`FaceView`] and a piece footprint (pivot plus
//! per-cell offsets). Nothing here mutates the board or the piece.

use tracing::debug;

use crate::grid::FaceView;
use crate::types::Spin;

/// Outcome of testing a translation of the piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveCheck {
    /// The piece may move.
    Clear,
    /// The piece would leave the face sideways. Never arms a slide.
    OffFace,
    /// Some target cell is taken. `slide` is set when a sideways move ran
    /// into an occupied target, which is what arms a slide.
    Blocked { slide: bool },
}

impl MoveCheck {
    #[inline]
    pub fn is_clear(&self) -> bool {
        matches!(self, MoveCheck::Clear)
    }

    #[inline]
    pub fn slide_collision(&self) -> bool {
        matches!(self, MoveCheck::Blocked { slide: true })
    }
}

/// Horizontal extent of a footprint, always including the pivot column.
pub fn offset_extent(offsets: &[(i32, i32)]) -> (i32, i32) {
    offsets
        .iter()
        .fold((0, 0), |(lo, hi), &(x, _)| (lo.min(x), hi.max(x)))
}

/// Test moving the piece with pivot `origin` by `(dx, dy)`.
///
/// The footprint is walked one cell at a time, sideways first and then
/// vertically, so a long move cannot pass through a cube. `mid_fall` is true
/// while the fall timer has progressed; a sideways step then also needs the
/// cell diagonally below each target free, since the cube is already drawn
/// partway into the row beneath.
pub fn check_move(
    view: &FaceView<'_>,
    origin: (i32, i32),
    offsets: &[(i32, i32)],
    dx: i32,
    dy: i32,
    mid_fall: bool,
) -> MoveCheck {
    let (left, right) = offset_extent(offsets);
    let side_width = view.dims().side_width() as i32;
    if origin.0 + dx + left < 0 || origin.0 + dx + right >= side_width {
        return MoveCheck::OffFace;
    }
    if origin.1 + dy < 0 {
        return MoveCheck::Blocked { slide: false };
    }

    let (step_x, step_y) = (dx.signum(), dy.signum());
    let mut x = origin.0;
    for _ in 0..dx.abs() {
        x += step_x;
        let mut blocked = false;
        let mut slide = false;
        for &(ox, oy) in offsets {
            let (cx, cy) = (x + ox, origin.1 + oy);
            if view.is_occupied(cx, cy) {
                slide = true;
                blocked = true;
            }
            if mid_fall && view.is_occupied(cx, cy - 1) {
                blocked = true;
            }
        }
        if blocked {
            return MoveCheck::Blocked { slide };
        }
    }

    let mut y = origin.1;
    for _ in 0..dy.abs() {
        y += step_y;
        if footprint_occupied(view, (x, y), offsets) {
            return MoveCheck::Blocked { slide: false };
        }
    }

    MoveCheck::Clear
}

fn footprint_occupied(view: &FaceView<'_>, pivot: (i32, i32), offsets: &[(i32, i32)]) -> bool {
    offsets
        .iter()
        .any(|&(ox, oy)| view.is_occupied(pivot.0 + ox, pivot.1 + oy))
}

/// Offset of a cell after a quarter turn about the pivot.
#[inline]
pub fn rotated_offset((x, y): (i32, i32), spin: Spin) -> (i32, i32) {
    let dir = spin.sign();
    (dir * y, -dir * x)
}

/// True if any cell of the rotated footprint lands on an occupied cell.
pub fn rotation_blocked(
    view: &FaceView<'_>,
    origin: (i32, i32),
    offsets: &[(i32, i32)],
    spin: Spin,
) -> bool {
    offsets.iter().any(|&offset| {
        let (ox, oy) = rotated_offset(offset, spin);
        view.is_occupied(origin.0 + ox, origin.1 + oy)
    })
}

/// True if spinning the board would drag the piece through committed cubes.
///
/// Every piece cell is swept one face width along the spin direction. A
/// swept column blocks if the cell itself or the one beneath it is taken,
/// and a piece touching row 0 can never be spun. Cells above the ceiling
/// sweep freely.
pub fn board_spin_blocked(view: &FaceView<'_>, positions: &[(i32, i32)], spin: Spin) -> bool {
    let dims = view.dims();
    let height = dims.board_height() as i32;
    let dir = spin.sign();

    for &(face_x, face_y) in positions {
        if face_y <= 0 {
            debug!(face_x, face_y, "board spin blocked at floor");
            return true;
        }
        if face_y >= height {
            continue;
        }
        let row = face_y as usize;
        for diff in 0..dims.side_width() as i32 {
            let x = view.true_x(face_x + dir * diff);
            if view.cells().is_occupied(x, row) || view.cells().is_occupied(x, row - 1) {
                debug!(x, y = row, "board spin blocked by sweep");
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::Cube;
    use crate::geometry::BoardDims;
    use crate::grid::BoardGrid;

    const T_SHAPE: [(i32, i32); 4] = [(0, 0), (-1, 0), (1, 0), (0, -1)];
    const I_SHAPE: [(i32, i32); 4] = [(0, 1), (0, 0), (0, -1), (0, -2)];

    fn grid(side_width: usize, height: usize) -> BoardGrid {
        BoardGrid::new(BoardDims::new(side_width, height).unwrap())
    }

    #[test]
    fn test_extent_includes_pivot() {
        assert_eq!(offset_extent(&T_SHAPE), (-1, 1));
        assert_eq!(offset_extent(&I_SHAPE), (0, 0));
        assert_eq!(offset_extent(&[(1, 0), (2, 0)]), (0, 2));
    }

    #[test]
    fn test_off_face_on_either_side() {
        let g = grid(7, 18);
        let view = g.face(0);
        assert_eq!(check_move(&view, (1, 5), &T_SHAPE, -1, 0, false), MoveCheck::OffFace);
        assert_eq!(check_move(&view, (5, 5), &T_SHAPE, 1, 0, false), MoveCheck::OffFace);
        // The shared edge column is still part of the face.
        assert!(check_move(&view, (5, 5), &I_SHAPE, 1, 0, false).is_clear());
    }

    #[test]
    fn test_floor_blocks_without_slide() {
        let g = grid(7, 18);
        let view = g.face(0);
        let check = check_move(&view, (3, 2), &I_SHAPE, 0, -1, false);
        assert_eq!(check, MoveCheck::Blocked { slide: false });
    }

    #[test]
    fn test_sideways_into_cube_is_slide_collision() {
        let mut g = grid(7, 18);
        g.place(4, 5, Cube::new(0));
        let view = g.face(0);
        let check = check_move(&view, (3, 6), &I_SHAPE, 1, 0, false);
        assert!(check.slide_collision());
    }

    #[test]
    fn test_diagonal_pre_occupancy_only_mid_fall() {
        let mut g = grid(7, 18);
        // Below the lowest target cell of the I piece moved right.
        g.place(4, 3, Cube::new(0));
        let view = g.face(0);
        assert!(check_move(&view, (3, 6), &I_SHAPE, 1, 0, false).is_clear());
        let check = check_move(&view, (3, 6), &I_SHAPE, 1, 0, true);
        assert_eq!(check, MoveCheck::Blocked { slide: false });
    }

    #[test]
    fn test_long_moves_cannot_pass_through_cubes() {
        let mut g = grid(7, 18);
        g.place(3, 5, Cube::new(0));
        g.place(5, 12, Cube::new(0));
        let view = g.face(0);

        assert_eq!(
            check_move(&view, (3, 10), &I_SHAPE, 0, -8, false),
            MoveCheck::Blocked { slide: false }
        );
        assert!(check_move(&view, (3, 10), &I_SHAPE, 0, -2, false).is_clear());
        assert!(check_move(&view, (1, 12), &I_SHAPE, 5, 0, false).slide_collision());
        assert!(check_move(&view, (1, 12), &I_SHAPE, 3, 0, false).is_clear());
    }

    #[test]
    fn test_above_ceiling_is_free() {
        let g = grid(7, 18);
        let view = g.face(0);
        assert!(check_move(&view, (3, 18), &T_SHAPE, 0, -1, false).is_clear());
        assert!(check_move(&view, (3, 25), &I_SHAPE, 1, 0, true).is_clear());
    }

    #[test]
    fn test_rotation_round_trip() {
        for &offset in T_SHAPE.iter().chain(I_SHAPE.iter()) {
            let turned = rotated_offset(offset, Spin::Clockwise);
            assert_eq!(rotated_offset(turned, Spin::CounterClockwise), offset);
        }
        assert_eq!(rotated_offset((0, 1), Spin::Clockwise), (1, 0));
        assert_eq!(rotated_offset((1, 0), Spin::Clockwise), (0, -1));
    }

    #[test]
    fn test_rotation_blocked_by_cube() {
        let mut g = grid(7, 18);
        let view = g.face(0);
        assert!(!rotation_blocked(&view, (3, 5), &I_SHAPE, Spin::Clockwise));
        drop(view);

        // I turned clockwise lies along row 5 from x=1 to x=4.
        g.place(1, 5, Cube::new(0));
        let view = g.face(0);
        assert!(rotation_blocked(&view, (3, 5), &I_SHAPE, Spin::Clockwise));
    }

    #[test]
    fn test_board_spin_blocked_by_floor_row() {
        let g = grid(4, 5);
        let view = g.face(0);
        assert!(board_spin_blocked(&view, &[(1, 0)], Spin::Clockwise));
        assert!(!board_spin_blocked(&view, &[(1, 3), (1, 5)], Spin::Clockwise));
    }

    #[test]
    fn test_board_spin_sweep_follows_direction() {
        let mut g = grid(4, 5);
        // Two columns to the right of face 0 column 1, one row under the cell.
        g.place(3, 1, Cube::new(0));
        let view = g.face(0);
        assert!(board_spin_blocked(&view, &[(1, 2)], Spin::Clockwise));
        // Counter-clockwise sweeps 1, 0, 11, 10 and misses it.
        assert!(!board_spin_blocked(&view, &[(1, 2)], Spin::CounterClockwise));
    }

    #[test]
    fn test_board_spin_ignores_cells_above_ceiling() {
        let mut g = grid(4, 5);
        for x in 0..12 {
            g.place(x, 4, Cube::new(0));
        }
        let view = g.face(0);
        assert!(!board_spin_blocked(&view, &[(1, 5), (1, 6)], Spin::Clockwise));
        assert!(board_spin_blocked(&view, &[(1, 4)], Spin::Clockwise));
    }
}
