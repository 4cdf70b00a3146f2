//! Shared types for the wavefill workspace: directions, grids, pattern
//! tables, possibility masks and the solver error taxonomy.

pub mod constants;
pub mod direction;
pub mod error;
pub mod grid;
pub mod mask;
pub mod pattern;
pub mod types;

pub use direction::{Direction, ALL_DIRECTIONS};
pub use error::WfcError;
pub use grid::Grid;
pub use mask::PatternMask;
pub use pattern::{Pattern, PatternTable};
pub use types::{CellCoord, ChunkCoord};
