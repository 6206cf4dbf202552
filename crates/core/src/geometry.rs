//! Geometry module - board dimensions and logical-to-3D mapping
//!
//! The board is a square prism centered on the origin. Columns are numbered
//! around it: face 0 owns absolute columns `0..side_width-1`, face 1 the next
//! `side_width-1`, and so on. The last column of a face is the first column of
//! the next one, which is why the unrolled width is `side_width * 4 - 4`.
//!
//! Everything here is pure: no state, no locking.

use glam::Vec3;

use crate::error::{Error, Result};
use crate::types::{FACE_ANGLES, SIDE_COUNT};

/// Validated board dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardDims {
    side_width: usize,
    board_height: usize,
    board_width: usize,
}

impl BoardDims {
    /// Validate dimensions. A face needs two columns and the board one row.
    pub fn new(side_width: usize, board_height: usize) -> Result<Self> {
        if side_width < 2 {
            return Err(Error::SideTooNarrow { side_width });
        }
        if board_height == 0 {
            return Err(Error::ZeroHeight);
        }
        Ok(Self {
            side_width,
            board_height,
            board_width: board_width(side_width),
        })
    }

    pub fn side_width(&self) -> usize {
        self.side_width
    }

    pub fn board_height(&self) -> usize {
        self.board_height
    }

    /// Unrolled width, all four faces with shared edges counted once.
    pub fn board_width(&self) -> usize {
        self.board_width
    }

    /// Number of columns a face adds to the unrolled board.
    #[inline(always)]
    pub fn face_stride(&self) -> usize {
        self.side_width - 1
    }

    /// Absolute column of a face-relative column.
    ///
    /// `face_x` may be any integer; the result wraps around the board.
    #[inline]
    pub fn true_x(&self, face: usize, face_x: i32) -> usize {
        let base = (face * self.face_stride()) as i64;
        (base + face_x as i64).rem_euclid(self.board_width as i64) as usize
    }

    /// Face an absolute column lies on. Shared edge columns belong to the
    /// face they start.
    #[inline]
    pub fn face_of_column(&self, x: usize) -> usize {
        (x / self.face_stride()).min(SIDE_COUNT - 1)
    }

    /// Position of the committed cube at absolute `(x, y)`, in board model
    /// space (before the board's own rotation is applied).
    pub fn cube_position(&self, x: usize, y: usize) -> Vec3 {
        let face = self.face_of_column(x) as i32;
        let side_mod = (x % self.face_stride()) as i32;
        let half = (self.side_width / 2) as i32;

        let (cube_x, cube_z) = if face == 0 || face == 2 {
            // +1 on the front face, -1 on the back face
            let m = 1 - face;
            (m * -half + m * side_mod, m * half)
        } else {
            // -1 on the right face, +1 on the left face
            let m = face - 2;
            (m * -half, -half * m + side_mod * m)
        };

        Vec3::new(cube_x as f32, y as f32, cube_z as f32)
    }

    /// Model-space position of an active piece cell.
    ///
    /// The active piece always sits on the presented face, so it is placed in
    /// unrotated model space; `y` is fractional while the piece animates
    /// between rows.
    pub fn piece_position(&self, face_x: i32, y: f32) -> Vec3 {
        let half = self.side_width as f32 / 2.0;
        Vec3::new(-half + face_x as f32 + 0.5, y, half - 0.5)
    }
}

/// Unrolled board width for a face width.
pub fn board_width(side_width: usize) -> usize {
    side_width * SIDE_COUNT - SIDE_COUNT
}

/// Presented angle of a face, in degrees.
pub fn face_angle(face: usize) -> f32 {
    FACE_ANGLES[face % SIDE_COUNT]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_board_width() {
        assert_eq!(board_width(2), 4);
        assert_eq!(board_width(4), 12);
        assert_eq!(board_width(7), 24);
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        assert!(matches!(
            BoardDims::new(1, 10),
            Err(Error::SideTooNarrow { side_width: 1 })
        ));
        assert!(matches!(BoardDims::new(0, 10), Err(Error::SideTooNarrow { .. })));
        assert!(matches!(BoardDims::new(5, 0), Err(Error::ZeroHeight)));
    }

    #[test]
    fn test_true_x_is_bijective_over_face_columns() {
        for side_width in 2..12 {
            let dims = BoardDims::new(side_width, 4).unwrap();
            let mut seen = HashSet::new();
            for face in 0..SIDE_COUNT {
                for face_x in 0..(side_width as i32 - 1) {
                    assert!(seen.insert(dims.true_x(face, face_x)));
                }
            }
            assert_eq!(seen.len(), dims.board_width());
            assert!(seen.iter().all(|&x| x < dims.board_width()));
        }
    }

    #[test]
    fn test_shared_edge_columns() {
        let dims = BoardDims::new(7, 18).unwrap();
        for face in 0..SIDE_COUNT {
            let next = (face + 1) % SIDE_COUNT;
            assert_eq!(dims.true_x(face, 6), dims.true_x(next, 0));
        }
        // Last face wraps onto column 0.
        assert_eq!(dims.true_x(3, 6), 0);
        assert_eq!(dims.true_x(0, -1), 23);
    }

    #[test]
    fn test_face_of_column() {
        let dims = BoardDims::new(4, 5).unwrap();
        let faces: Vec<usize> = (0..12).map(|x| dims.face_of_column(x)).collect();
        assert_eq!(faces, vec![0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3]);
    }

    #[test]
    fn test_cube_positions_trace_the_prism() {
        let dims = BoardDims::new(7, 18).unwrap();
        // Front face runs left to right at z = +3.
        assert_eq!(dims.cube_position(0, 0), Vec3::new(-3.0, 0.0, 3.0));
        assert_eq!(dims.cube_position(5, 2), Vec3::new(2.0, 2.0, 3.0));
        // Right face runs front to back at x = +3.
        assert_eq!(dims.cube_position(6, 0), Vec3::new(3.0, 0.0, 3.0));
        assert_eq!(dims.cube_position(11, 0), Vec3::new(3.0, 0.0, -2.0));
        // Back face runs right to left at z = -3.
        assert_eq!(dims.cube_position(12, 0), Vec3::new(3.0, 0.0, -3.0));
        // Left face runs back to front at x = -3.
        assert_eq!(dims.cube_position(18, 0), Vec3::new(-3.0, 0.0, -3.0));
        assert_eq!(dims.cube_position(23, 0), Vec3::new(-3.0, 0.0, 2.0));
    }

    #[test]
    fn test_cube_positions_are_distinct_per_row() {
        let dims = BoardDims::new(7, 18).unwrap();
        let mut seen = HashSet::new();
        for x in 0..dims.board_width() {
            let p = dims.cube_position(x, 0);
            assert!(seen.insert((p.x as i32, p.z as i32)), "column {x}");
        }
    }

    #[test]
    fn test_piece_position_matches_front_face() {
        let dims = BoardDims::new(7, 18).unwrap();
        for face_x in 0..6 {
            let piece = dims.piece_position(face_x, 4.0);
            let cube = dims.cube_position(face_x as usize, 4);
            assert_eq!(piece, cube);
        }
    }

    #[test]
    fn test_face_angle_wraps() {
        assert_eq!(face_angle(0), 0.0);
        assert_eq!(face_angle(3), 270.0);
        assert_eq!(face_angle(4), 0.0);
    }
}
