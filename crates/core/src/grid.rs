//! Grid module - the matrix of committed cubes
//!
//! Cells are stored column-major (`x * height + y`) so that compacting a
//! column after a line clear is a single slice rotation. `y` grows upward:
//! row 0 is the floor.
//!
//! The matrix and the list of ejected cubes sit behind one coarse
//! `parking_lot::RwLock`. The update loop takes the write lock for commits,
//! compaction and animation; collision queries and render traversals take read
//! locks. A renderer on another thread holds a [`GridHandle`].

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::cube::Cube;
use crate::geometry::BoardDims;

/// One cell of the board.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Slot {
    #[default]
    Empty,
    Occupied(Cube),
}

impl Slot {
    #[inline]
    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }

    pub fn cube(&self) -> Option<&Cube> {
        match self {
            Slot::Occupied(cube) => Some(cube),
            Slot::Empty => None,
        }
    }
}

/// Absolute board location: `x` in `[0, board_width)`, `y` in `[0, board_height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub x: usize,
    pub y: usize,
}

impl GridPos {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Everything guarded by the grid lock.
#[derive(Debug, Clone)]
pub struct GridCells {
    dims: BoardDims,
    slots: Vec<Slot>,
    ejected: Vec<Cube>,
}

impl GridCells {
    fn new(dims: BoardDims) -> Self {
        Self {
            dims,
            slots: vec![Slot::Empty; dims.board_width() * dims.board_height()],
            ejected: Vec::new(),
        }
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.dims.board_width() || y >= self.dims.board_height() {
            return None;
        }
        Some(x * self.dims.board_height() + y)
    }

    pub fn dims(&self) -> BoardDims {
        self.dims
    }

    /// Slot at `(x, y)`, or `None` outside the board.
    pub fn get(&self, x: usize, y: usize) -> Option<&Slot> {
        self.index(x, y).map(|idx| &self.slots[idx])
    }

    /// True only for an in-bounds occupied cell.
    #[inline]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        matches!(self.get(x, y), Some(Slot::Occupied(_)))
    }

    /// Store a slot. Returns false if `(x, y)` is outside the board.
    pub fn set(&mut self, x: usize, y: usize, slot: Slot) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.slots[idx] = slot;
                true
            }
            None => false,
        }
    }

    /// Store a slot and hand back what was there. `None` outside the board.
    pub fn replace(&mut self, x: usize, y: usize, slot: Slot) -> Option<Slot> {
        self.index(x, y)
            .map(|idx| std::mem::replace(&mut self.slots[idx], slot))
    }

    /// Remove and return the slot at `(x, y)`, leaving it empty.
    pub fn take(&mut self, x: usize, y: usize) -> Slot {
        match self.index(x, y) {
            Some(idx) => std::mem::take(&mut self.slots[idx]),
            None => Slot::Empty,
        }
    }

    /// Check if every column of row `y` is occupied.
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.dims.board_height() {
            return false;
        }
        (0..self.dims.board_width()).all(|x| self.is_occupied(x, y))
    }

    /// Drop every cell of column `x` above row `y` down by one, emptying the
    /// top. Whatever was at `y` is overwritten. Moved cubes are re-placed.
    pub fn shift_column_down(&mut self, x: usize, y: usize) {
        let Some(start) = self.index(x, y) else {
            return;
        };
        let height = self.dims.board_height();
        let end = x * height + height;

        self.slots[start] = Slot::Empty;
        self.slots[start..end].rotate_left(1);
        self.slots[end - 1] = Slot::Empty;

        for row in y..height {
            let position = self.dims.cube_position(x, row);
            if let Slot::Occupied(cube) = &mut self.slots[x * height + row] {
                cube.set_position(position);
            }
        }
    }

    /// Iterate occupied cells with their absolute location.
    pub fn occupied(&self) -> impl Iterator<Item = (GridPos, &Cube)> + '_ {
        let height = self.dims.board_height();
        self.slots.iter().enumerate().filter_map(move |(idx, slot)| {
            slot.cube()
                .map(|cube| (GridPos::new(idx / height, idx % height), cube))
        })
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_occupied()).count()
    }

    /// Cubes thrown off the board by line clears, still in flight.
    pub fn ejected(&self) -> &[Cube] {
        &self.ejected
    }

    pub(crate) fn push_ejected(&mut self, cube: Cube) {
        self.ejected.push(cube);
    }

    /// Advance flashes of committed cubes and the flight of ejected ones,
    /// dropping ejected cubes that have fallen out of sight.
    fn animate(&mut self, dt_ms: u32) -> usize {
        for slot in &mut self.slots {
            if let Slot::Occupied(cube) = slot {
                if cube.is_flashing() {
                    cube.advance(dt_ms);
                }
            }
        }

        for cube in &mut self.ejected {
            cube.advance(dt_ms);
        }
        let before = self.ejected.len();
        self.ejected.retain(|cube| !cube.is_dead());
        before - self.ejected.len()
    }
}

fn write_face_cell(
    cells: &mut GridCells,
    face: usize,
    face_x: i32,
    face_y: i32,
    mut cube: Cube,
) -> Option<GridPos> {
    let dims = cells.dims();
    if face_x < 0 || face_x >= dims.side_width() as i32 {
        return None;
    }
    if face_y < 0 || face_y >= dims.board_height() as i32 {
        return None;
    }

    let pos = GridPos::new(dims.true_x(face, face_x), face_y as usize);
    cube.set_position(dims.cube_position(pos.x, pos.y));
    debug!(x = pos.x, y = pos.y, "commit");

    if let Some(Slot::Occupied(old)) = cells.replace(pos.x, pos.y, Slot::Occupied(cube)) {
        debug!(x = pos.x, y = pos.y, palette = old.palette(), "commit replaced a cube");
    }
    Some(pos)
}

/// Cloneable read-only handle to the grid, for render traversals on another
/// thread.
#[derive(Debug, Clone)]
pub struct GridHandle {
    cells: Arc<RwLock<GridCells>>,
}

impl GridHandle {
    /// Shared lock over the whole matrix for a full traversal.
    pub fn read(&self) -> RwLockReadGuard<'_, GridCells> {
        self.cells.read()
    }
}

/// The committed-cell matrix plus the commit-location set of the most recent
/// commit.
#[derive(Debug)]
pub struct BoardGrid {
    dims: BoardDims,
    cells: Arc<RwLock<GridCells>>,
    commit_locations: Vec<GridPos>,
}

impl BoardGrid {
    pub fn new(dims: BoardDims) -> Self {
        Self {
            dims,
            cells: Arc::new(RwLock::new(GridCells::new(dims))),
            commit_locations: Vec::with_capacity(crate::types::PIECE_CELLS),
        }
    }

    pub fn dims(&self) -> BoardDims {
        self.dims
    }

    pub fn handle(&self) -> GridHandle {
        GridHandle {
            cells: Arc::clone(&self.cells),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, GridCells> {
        self.cells.read()
    }

    /// Exclusive lock for whole-matrix mutation.
    pub fn write(&mut self) -> RwLockWriteGuard<'_, GridCells> {
        self.cells.write()
    }

    /// Face-relative view over the grid, holding a read lock for its lifetime.
    pub fn face(&self, face: usize) -> FaceView<'_> {
        FaceView {
            cells: self.cells.read(),
            face,
        }
    }

    /// Occupancy of a face-relative cell; see [`FaceView::is_occupied`].
    pub fn is_face_occupied(&self, face: usize, face_x: i32, face_y: i32) -> bool {
        self.face(face).is_occupied(face_x, face_y)
    }

    /// Write a cube at a face-relative location, placing it in 3D and
    /// recording the location in the commit set.
    ///
    /// Returns `None` (and drops the cube) if the location is not on the face
    /// or not inside the board.
    pub fn commit(&mut self, face: usize, face_x: i32, face_y: i32, cube: Cube) -> Option<GridPos> {
        let pos = write_face_cell(&mut *self.cells.write(), face, face_x, face_y, cube)?;
        self.commit_locations.push(pos);
        Some(pos)
    }

    /// Commit a whole piece and then run `settle` on the result, all under
    /// one write lock, so readers never see a half-written piece or a full
    /// row that has not been cleared yet.
    ///
    /// Returns how many cubes fell outside the board, with `settle`'s output.
    pub fn commit_piece<R>(
        &mut self,
        face: usize,
        cubes: impl IntoIterator<Item = (i32, i32, Cube)>,
        settle: impl FnOnce(&mut GridCells) -> R,
    ) -> (usize, R) {
        let mut cells = self.cells.write();
        let mut dropped = 0;
        for (face_x, face_y, cube) in cubes {
            match write_face_cell(&mut *cells, face, face_x, face_y, cube) {
                Some(pos) => self.commit_locations.push(pos),
                None => dropped += 1,
            }
        }
        let settled = settle(&mut *cells);
        (dropped, settled)
    }

    /// Place a cube at an absolute location without recording a commit.
    /// Used to script board layouts.
    pub fn place(&mut self, x: usize, y: usize, mut cube: Cube) -> bool {
        if x >= self.dims.board_width() || y >= self.dims.board_height() {
            return false;
        }
        cube.set_position(self.dims.cube_position(x, y));
        self.cells.write().set(x, y, Slot::Occupied(cube))
    }

    /// Locations written by the most recent commit.
    pub fn commit_locations(&self) -> &[GridPos] {
        &self.commit_locations
    }

    pub fn clear_commit_locations(&mut self) {
        self.commit_locations.clear();
    }

    /// Per-frame animation step. Returns how many ejected cubes expired.
    pub fn animate(&mut self, dt_ms: u32) -> usize {
        self.cells.write().animate(dt_ms)
    }

    /// Empty the whole board and forget any ejected cubes.
    pub fn clear(&mut self) {
        *self.cells.write() = GridCells::new(self.dims);
        self.commit_locations.clear();
    }
}

/// The grid as seen from one face.
pub struct FaceView<'a> {
    cells: RwLockReadGuard<'a, GridCells>,
    face: usize,
}

impl FaceView<'_> {
    pub fn face(&self) -> usize {
        self.face
    }

    pub fn dims(&self) -> BoardDims {
        self.cells.dims()
    }

    pub fn cells(&self) -> &GridCells {
        &self.cells
    }

    #[inline]
    pub fn true_x(&self, face_x: i32) -> usize {
        self.cells.dims().true_x(self.face, face_x)
    }

    /// Whether a face-relative cell counts as occupied.
    ///
    /// Out of range resolves conservatively: above the ceiling is empty (pieces
    /// spawn there), below the floor and past either edge of the face is
    /// occupied.
    pub fn is_occupied(&self, face_x: i32, face_y: i32) -> bool {
        let dims = self.cells.dims();
        if face_y >= dims.board_height() as i32 {
            return false;
        }
        if face_y < 0 {
            return true;
        }
        if face_x < 0 || face_x > dims.side_width() as i32 - 1 {
            return true;
        }
        self.cells.is_occupied(self.true_x(face_x), face_y as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(side_width: usize, height: usize) -> BoardGrid {
        BoardGrid::new(BoardDims::new(side_width, height).unwrap())
    }

    #[test]
    fn test_index_is_column_major() {
        let g = grid(4, 5);
        let cells = g.read();
        assert_eq!(cells.index(0, 0), Some(0));
        assert_eq!(cells.index(0, 4), Some(4));
        assert_eq!(cells.index(1, 0), Some(5));
        assert_eq!(cells.index(11, 4), Some(59));
        assert_eq!(cells.index(12, 0), None);
        assert_eq!(cells.index(0, 5), None);
    }

    #[test]
    fn test_commit_records_location_and_position() {
        let mut g = grid(7, 18);
        let pos = g.commit(1, 2, 3, Cube::new(4)).unwrap();
        assert_eq!(pos, GridPos::new(8, 3));
        assert_eq!(g.commit_locations(), &[GridPos::new(8, 3)]);

        let cells = g.read();
        let cube = cells.get(8, 3).and_then(Slot::cube).unwrap();
        assert_eq!(cube.palette(), 4);
        assert_eq!(cube.position(), g.dims().cube_position(8, 3));
    }

    #[test]
    fn test_commit_out_of_range_is_dropped() {
        let mut g = grid(4, 5);
        assert_eq!(g.commit(0, 0, 5, Cube::new(0)), None);
        assert_eq!(g.commit(0, 0, -1, Cube::new(0)), None);
        assert_eq!(g.commit(0, 4, 0, Cube::new(0)), None);
        assert!(g.commit_locations().is_empty());
        assert_eq!(g.read().occupied_count(), 0);
    }

    #[test]
    fn test_face_occupancy_bounds() {
        for side_width in 2..12 {
            let g = grid(side_width, 5);
            let right = side_width as i32 - 1;
            for face in 0..4 {
                let view = g.face(face);
                assert!(!view.is_occupied(1, 5));
                assert!(!view.is_occupied(-3, 9));
                assert!(view.is_occupied(0, -1));
                assert!(view.is_occupied(-1, 0));
                assert!(view.is_occupied(right + 1, 0));
                assert!(!view.is_occupied(0, 0));
                assert!(!view.is_occupied(right, 4));
            }
        }
    }

    #[test]
    fn test_face_occupancy_wraps_through_shared_edge() {
        let mut g = grid(4, 5);
        // Absolute column 0 is face 3's right edge.
        g.place(0, 0, Cube::new(1));
        assert!(g.is_face_occupied(3, 3, 0));
        assert!(g.is_face_occupied(0, 0, 0));
        assert!(!g.is_face_occupied(1, 0, 0));
    }

    #[test]
    fn test_shift_column_down() {
        let mut g = grid(4, 4);
        for y in 0..4 {
            g.place(2, y, Cube::new(y as u8));
        }
        g.write().shift_column_down(2, 1);

        let cells = g.read();
        let palettes: Vec<Option<u8>> = (0..4)
            .map(|y| cells.get(2, y).and_then(Slot::cube).map(Cube::palette))
            .collect();
        assert_eq!(palettes, vec![Some(0), Some(2), Some(3), None]);
        let moved = cells.get(2, 1).and_then(Slot::cube).unwrap();
        assert_eq!(moved.position(), g.dims().cube_position(2, 1));
    }

    #[test]
    fn test_occupied_iteration_reports_locations() {
        let mut g = grid(4, 5);
        g.place(3, 2, Cube::new(0));
        g.place(10, 4, Cube::new(1));
        let found: Vec<GridPos> = g.read().occupied().map(|(p, _)| p).collect();
        assert_eq!(found, vec![GridPos::new(3, 2), GridPos::new(10, 4)]);
    }

    #[test]
    fn test_handle_sees_writes() {
        let mut g = grid(4, 5);
        let handle = g.handle();
        g.place(5, 0, Cube::new(3));
        assert_eq!(handle.read().occupied_count(), 1);
    }

    #[test]
    fn test_commit_over_a_cube_replaces_it() {
        let mut g = grid(4, 5);
        g.place(2, 1, Cube::new(3));
        assert!(g.commit(0, 2, 1, Cube::new(6)).is_some());

        let cells = g.read();
        assert_eq!(cells.occupied_count(), 1);
        assert_eq!(cells.get(2, 1).and_then(Slot::cube).map(Cube::palette), Some(6));
    }

    #[test]
    fn test_replace_returns_previous_slot() {
        let mut g = grid(4, 5);
        let mut cells = g.write();
        assert_eq!(cells.replace(1, 1, Slot::Occupied(Cube::new(2))).map(|s| s.is_occupied()), Some(false));
        let old = cells.replace(1, 1, Slot::Empty);
        assert_eq!(old.as_ref().and_then(Slot::cube).map(Cube::palette), Some(2));
        assert!(cells.replace(12, 0, Slot::Empty).is_none());
    }

    #[test]
    fn test_commit_piece_settles_before_unlocking() {
        let mut g = grid(4, 5);
        for x in (0..12).filter(|&x| x != 1) {
            g.place(x, 0, Cube::new(0));
        }
        let handle = g.handle();

        let cubes = [(1, 0, Cube::new(4)), (1, 1, Cube::new(4)), (1, 7, Cube::new(4))];
        let (dropped, full) = g.commit_piece(0, cubes, |cells| {
            let full = cells.is_row_full(0);
            for x in 0..12 {
                cells.take(x, 0);
            }
            full
        });

        assert_eq!(dropped, 1);
        assert!(full);
        assert_eq!(g.commit_locations(), &[GridPos::new(1, 0), GridPos::new(1, 1)]);
        let cells = handle.read();
        assert!(!cells.is_row_full(0));
        assert_eq!(cells.occupied_count(), 1);
    }

    #[test]
    fn test_row_full() {
        let mut g = grid(2, 3);
        for x in 0..3 {
            g.place(x, 1, Cube::new(0));
        }
        assert!(!g.read().is_row_full(1));
        g.place(3, 1, Cube::new(0));
        assert!(g.read().is_row_full(1));
        assert!(!g.read().is_row_full(3));
    }
}
