//! Line clear module - completed rows, ejection and compaction
//!
//! Rows are scanned from the top down. A completed row is emptied column by
//! column: each cube is thrown off its face (while fewer than `max_ejected`
//! are in flight) or discarded, and the column above drops by one. Scanning
//! top-down means a clear only ever pulls down rows that were already
//! checked.

use glam::Vec3;
use tracing::debug;

use crate::cube::Cube;
use crate::grid::{BoardGrid, GridCells, Slot};
use crate::rng::SimpleRng;
use crate::types::{CLEAR_FLASH_MS, EJECT_JITTER, EJECT_SPEED, FACE_NORMALS, GRAVITY, MAX_EJECTED_CUBES};

#[derive(Debug, Clone, Copy)]
pub struct LineClearEngine {
    max_ejected: usize,
}

impl Default for LineClearEngine {
    fn default() -> Self {
        Self::new(MAX_EJECTED_CUBES)
    }
}

impl LineClearEngine {
    pub fn new(max_ejected: usize) -> Self {
        Self { max_ejected }
    }

    pub fn max_ejected(&self) -> usize {
        self.max_ejected
    }

    /// Clear every completed row in one pass. Returns the number of rows
    /// cleared.
    ///
    /// Holds the grid write lock for the whole pass.
    pub fn run(&self, grid: &mut BoardGrid, rng: &mut SimpleRng) -> u32 {
        let mut cells = grid.write();
        self.clear_rows(&mut cells, rng)
    }

    /// Same as [`run`](Self::run), on cells the caller already has locked.
    pub fn clear_rows(&self, cells: &mut GridCells, rng: &mut SimpleRng) -> u32 {
        let dims = cells.dims();
        let mut rows = 0;

        for y in (0..dims.board_height()).rev() {
            if !cells.is_row_full(y) {
                continue;
            }
            rows += 1;

            let mut ejected = 0usize;
            for x in 0..dims.board_width() {
                if let Slot::Occupied(mut cube) = cells.take(x, y) {
                    if cells.ejected().len() < self.max_ejected {
                        launch(&mut cube, dims.face_of_column(x), rng);
                        cells.push_ejected(cube);
                        ejected += 1;
                    }
                }
                cells.shift_column_down(x, y);
            }
            debug!(row = y, ejected, "row cleared");
        }

        if rows > 0 {
            debug!(rows, "line completion");
        }
        rows
    }
}

/// Throw a cleared cube outward from its face with a random tumble.
fn launch(cube: &mut Cube, face: usize, rng: &mut SimpleRng) {
    let normal = Vec3::from(FACE_NORMALS[face]);

    cube.flash(CLEAR_FLASH_MS);

    let velocity = Vec3::new(
        normal.x * EJECT_SPEED + rng.next_f32() * EJECT_JITTER,
        normal.y * EJECT_SPEED + rng.next_f32() * EJECT_JITTER,
        normal.z * EJECT_SPEED + rng.next_f32() * EJECT_JITTER,
    );
    cube.set_trajectory(velocity, Vec3::new(0.0, GRAVITY, 0.0));

    let axis = Vec3::new(
        normal.z + rng.next_f32(),
        normal.y + rng.next_f32(),
        normal.x + rng.next_f32(),
    );
    cube.set_spin(axis, std::f32::consts::PI * rng.next_f32());
}
