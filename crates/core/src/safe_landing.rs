//! Safe landing module - does a commit seal off empty space?
//!
//! For every cell a commit wrote, the cell directly beneath it is checked: it
//! is a safe landing if it is the floor, already taken, or part of an empty
//! region that still opens onto the top row. The region is explored with an
//! explicit stack over empty cells, four ways, wrapping around the board.

use tracing::debug;

use crate::grid::{GridCells, GridPos};

/// Flood-fill scratch space, reused across commits.
#[derive(Debug, Default)]
pub struct SafeLandingAnalyzer {
    visited: Vec<bool>,
    stack: Vec<(usize, usize)>,
}

impl SafeLandingAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the cell at `(x, y)` can reach the top of the board.
    ///
    /// The visited set is reset on every call. Touching the top row counts
    /// as reaching it, taken or not.
    pub fn has_safe_landing(&mut self, cells: &GridCells, x: usize, y: i32) -> bool {
        if y < 0 {
            return true;
        }
        let dims = cells.dims();
        let (width, height) = (dims.board_width(), dims.board_height());
        let (x, y) = (x % width, y as usize);
        let top = height - 1;

        if y >= top || cells.is_occupied(x, y) {
            return true;
        }

        self.visited.clear();
        self.visited.resize(width * height, false);
        self.stack.clear();

        self.visited[x * height + y] = true;
        self.stack.push((x, y));

        while let Some((cx, cy)) = self.stack.pop() {
            if cy + 1 >= top {
                return true;
            }

            let left = (cx + width - 1) % width;
            let right = (cx + 1) % width;
            let mut visit = |nx: usize, ny: usize, stack: &mut Vec<(usize, usize)>| {
                let idx = nx * height + ny;
                if !self.visited[idx] && !cells.is_occupied(nx, ny) {
                    self.visited[idx] = true;
                    stack.push((nx, ny));
                }
            };

            visit(left, cy, &mut self.stack);
            visit(right, cy, &mut self.stack);
            if cy > 0 {
                visit(cx, cy - 1, &mut self.stack);
            }
            visit(cx, cy + 1, &mut self.stack);
        }

        false
    }

    /// True if any of `locations` sealed off the space beneath it.
    pub fn is_bad_move(&mut self, cells: &GridCells, locations: &[GridPos]) -> bool {
        for pos in locations {
            if !self.has_safe_landing(cells, pos.x, pos.y as i32 - 1) {
                debug!(x = pos.x, y = pos.y, "bad move: sealed void below");
                return true;
            }
        }
        false
    }
}
