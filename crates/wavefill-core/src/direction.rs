use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::constants::DIRECTION_COUNT;

/// One of the 4 face neighbors of a cell in a 2D grid.
///
/// Grids are row-major with row 0 on the north edge, so North is `-y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

/// All 4 directions, in the fixed order propagation visits them.
pub const ALL_DIRECTIONS: [Direction; DIRECTION_COUNT] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

impl Direction {
    /// Unit offset `(dx, dy)` for this direction.
    pub fn offset(self) -> IVec2 {
        match self {
            Direction::North => IVec2::new(0, -1),
            Direction::East => IVec2::new(1, 0),
            Direction::South => IVec2::new(0, 1),
            Direction::West => IVec2::new(-1, 0),
        }
    }

    /// The direction pointing back at the source cell.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Dense index in `0..4`, usable for per-direction tables.
    pub fn index(self) -> usize {
        self as usize
    }
}
