use std::ops::Index;

use glam::UVec2;
use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::types::CellCoord;

/// Row-major index of `(x, y)` in a grid of the given width.
#[inline]
pub fn cell_index(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

/// Index of the neighbor of `index` in `dir`, or `None` at the grid edge.
#[inline]
pub fn neighbor_index(width: u32, height: u32, index: usize, dir: Direction) -> Option<usize> {
    let w = width as usize;
    let x = index % w;
    let y = index / w;
    match dir {
        Direction::North => (y > 0).then(|| index - w),
        Direction::South => (y + 1 < height as usize).then(|| index + w),
        Direction::West => (x > 0).then(|| index - 1),
        Direction::East => (x + 1 < w).then(|| index + 1),
    }
}

/// Dense `width x height` grid stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Wrap a row-major cell vector. Returns `None` if the length does not match.
    pub fn from_vec(width: u32, height: u32, cells: Vec<T>) -> Option<Self> {
        (cells.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            cells,
        })
    }

    /// Build a grid cell by cell in row-major order, stopping at the first error.
    pub fn try_from_fn<E>(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> Result<T, E>,
    ) -> Result<Self, E> {
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y)?);
            }
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Grid with every cell set to `value`.
    pub fn filled(width: u32, height: u32, value: T) -> Self
    where
        T: Clone,
    {
        Self {
            width,
            height,
            cells: vec![value; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Option<&T> {
        self.contains(x, y)
            .then(|| &self.cells[cell_index(self.width, x, y)])
    }

    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut T> {
        if self.contains(x, y) {
            let idx = cell_index(self.width, x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Coordinate of the cell stored at `index`.
    pub fn coord_of(&self, index: usize) -> CellCoord {
        let w = self.width as usize;
        UVec2::new((index % w) as u32, (index / w) as u32)
    }

    /// Coordinate of the neighbor of `(x, y)` in `dir`, if it lies inside the grid.
    pub fn neighbor(&self, x: u32, y: u32, dir: Direction) -> Option<CellCoord> {
        if !self.contains(x, y) {
            return None;
        }
        let idx = cell_index(self.width, x, y);
        neighbor_index(self.width, self.height, idx, dir).map(|n| self.coord_of(n))
    }

    /// Row-major cell slice.
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<T> {
        self.cells
    }

    /// Iterate `(coord, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &T)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (self.coord_of(i), c))
    }

    /// Iterate rows from north to south.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        // chunks() panics on 0, and a 0-width grid has no rows anyway
        self.cells.chunks(self.width.max(1) as usize)
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(f).collect(),
        }
    }
}

impl<T> Index<(u32, u32)> for Grid<T> {
    type Output = T;

    fn index(&self, (x, y): (u32, u32)) -> &T {
        assert!(
            self.contains(x, y),
            "cell ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        &self.cells[cell_index(self.width, x, y)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_checks_length() {
        assert!(Grid::from_vec(2, 3, vec![0u8; 6]).is_some());
        assert!(Grid::from_vec(2, 3, vec![0u8; 5]).is_none());
    }

    #[test]
    fn test_try_from_fn_fills_row_major() {
        let grid = Grid::try_from_fn(3, 2, |x, y| Ok::<_, ()>(y * 10 + x)).expect("no errors");
        assert_eq!(grid.cells(), &[0, 1, 2, 10, 11, 12]);

        let mut calls = 0;
        let err = Grid::try_from_fn(3, 2, |x, y| {
            calls += 1;
            if (x, y) == (1, 1) {
                Err((x, y))
            } else {
                Ok(0u8)
            }
        });
        assert_eq!(err, Err((1, 1)));
        assert_eq!(calls, 5);
    }

    #[test]
    fn test_row_major_layout() {
        let grid = Grid::from_vec(3, 2, vec![0, 1, 2, 3, 4, 5]).expect("valid");
        assert_eq!(grid[(2, 0)], 2);
        assert_eq!(grid[(0, 1)], 3);
        assert_eq!(grid.coord_of(4), UVec2::new(1, 1));
        let rows: Vec<&[i32]> = grid.rows().collect();
        assert_eq!(rows, vec![&[0, 1, 2][..], &[3, 4, 5][..]]);
    }

    #[test]
    fn test_neighbor_index_edges() {
        // 3x2 grid, index 0 is the north-west corner
        assert_eq!(neighbor_index(3, 2, 0, Direction::North), None);
        assert_eq!(neighbor_index(3, 2, 0, Direction::West), None);
        assert_eq!(neighbor_index(3, 2, 0, Direction::East), Some(1));
        assert_eq!(neighbor_index(3, 2, 0, Direction::South), Some(3));
        assert_eq!(neighbor_index(3, 2, 5, Direction::East), None);
        assert_eq!(neighbor_index(3, 2, 5, Direction::South), None);
        assert_eq!(neighbor_index(3, 2, 5, Direction::North), Some(2));
    }

    #[test]
    fn test_neighbor_matches_direction_offset() {
        let grid = Grid::filled(4, 4, ());
        for dir in crate::direction::ALL_DIRECTIONS {
            let n = grid.neighbor(1, 1, dir).expect("interior cell");
            let off = dir.offset();
            assert_eq!(n.x as i32, 1 + off.x);
            assert_eq!(n.y as i32, 1 + off.y);
        }
    }

    #[test]
    fn test_out_of_bounds_get() {
        let grid = Grid::filled(2, 2, 7u8);
        assert_eq!(grid.get(1, 1), Some(&7));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.neighbor(5, 5, Direction::North), None);
    }

    #[test]
    fn test_empty_grid() {
        let grid: Grid<u8> = Grid::filled(0, 0, 0);
        assert!(grid.is_empty());
        assert_eq!(grid.rows().count(), 0);
    }
}
