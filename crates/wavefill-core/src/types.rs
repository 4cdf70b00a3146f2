use glam::{IVec2, UVec2};

/// Cell coordinate inside one grid. `x` is the column, `y` the row.
pub type CellCoord = UVec2;

/// Chunk coordinate in chunk-space (each unit = one chunk of cells).
pub type ChunkCoord = IVec2;
