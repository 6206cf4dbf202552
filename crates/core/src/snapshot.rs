use serde::Serialize;

use crate::error::Result;
use crate::events::BoardTotals;
use crate::grid::GridCells;
use crate::types::PIECE_CELLS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PieceSnapshot {
    pub style: &'static str,
    pub palette: u8,
    pub face_x: i32,
    pub face_y: i32,
    /// Face-relative cell locations.
    pub cells: [(i32, i32); PIECE_CELLS],
    pub dropping: bool,
}

/// Plain-data copy of the board for renderers and tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoardSnapshot {
    pub side_width: usize,
    pub board_height: usize,
    pub board_width: usize,
    pub active_face: usize,
    pub target_face: usize,
    pub angle: f32,
    /// Row-major from the floor up: `0` is empty, otherwise palette + 1.
    pub cells: Vec<u8>,
    pub piece: Option<PieceSnapshot>,
    pub ejected: usize,
    pub totals: BoardTotals,
    pub topped_out: bool,
}

impl BoardSnapshot {
    /// Cell code at absolute `(x, y)`; `0` outside the board.
    pub fn cell(&self, x: usize, y: usize) -> u8 {
        if x >= self.board_width || y >= self.board_height {
            return 0;
        }
        self.cells.get(y * self.board_width + x).copied().unwrap_or(0)
    }

    /// Cell code at a face-relative location on `face`.
    pub fn face_cell(&self, face: usize, face_x: i32, face_y: i32) -> u8 {
        if self.board_width == 0 || face_y < 0 {
            return 0;
        }
        let base = (face * (self.side_width - 1)) as i64;
        let x = (base + face_x as i64).rem_euclid(self.board_width as i64) as usize;
        self.cell(x, face_y as usize)
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Copy the matrix and ejected count out of a locked grid, reusing the
    /// cell buffer.
    pub(crate) fn fill_cells(&mut self, cells: &GridCells) {
        let dims = cells.dims();
        self.side_width = dims.side_width();
        self.board_height = dims.board_height();
        self.board_width = dims.board_width();

        self.cells.clear();
        self.cells.resize(self.board_width * self.board_height, 0);
        for (pos, cube) in cells.occupied() {
            self.cells[pos.y * self.board_width + pos.x] = cube.palette() + 1;
        }
        self.ejected = cells.ejected().len();
    }
}
