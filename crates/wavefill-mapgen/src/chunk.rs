use wavefill_core::grid::Grid;
use wavefill_core::types::ChunkCoord;
use wavefill_solver::CellConstraint;

use crate::retry::{GenerateError, Generated};

/// Outcome of generating one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkState {
    /// Solved within the attempt limit.
    Generated,
    /// Every attempt failed; the grid is the fallback fill.
    FellBack,
    /// Every attempt failed and no fallback was configured, or the request was invalid.
    Failed,
}

/// One chunk to generate, with the cells it must respect.
#[derive(Debug, Clone)]
pub struct ChunkRequest<P> {
    pub coord: ChunkCoord,
    pub constraints: Vec<CellConstraint<P>>,
}

impl<P> ChunkRequest<P> {
    /// A request with no pinned cells.
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            constraints: Vec::new(),
        }
    }

    pub fn with_constraints(mut self, constraints: Vec<CellConstraint<P>>) -> Self {
        self.constraints = constraints;
        self
    }
}

/// A generated chunk.
#[derive(Debug, Clone)]
pub struct Chunk<P> {
    pub coord: ChunkCoord,
    pub outcome: Result<Generated<P>, GenerateError>,
}

impl<P> Chunk<P> {
    pub fn state(&self) -> ChunkState {
        match &self.outcome {
            Ok(generated) if generated.fell_back => ChunkState::FellBack,
            Ok(_) => ChunkState::Generated,
            Err(_) => ChunkState::Failed,
        }
    }

    /// The chunk's cells, unless generation failed.
    pub fn grid(&self) -> Option<&Grid<P>> {
        self.outcome.as_ref().ok().map(|g| &g.grid)
    }

    /// Attempts spent on this chunk. Zero if the request was rejected outright.
    pub fn attempts(&self) -> u32 {
        match &self.outcome {
            Ok(generated) => generated.attempts,
            Err(GenerateError::Exhausted { attempts, .. }) => *attempts,
            Err(_) => 0,
        }
    }
}

/// Pin every edge cell of a `size x size` chunk to `allowed`.
///
/// With a pattern that borders itself (terrain's sand, town's yard) this
/// makes independently generated chunks line up at their seams.
pub fn edge_constraints<P: Clone>(size: u32, allowed: &[P]) -> Vec<CellConstraint<P>> {
    if size == 0 {
        return Vec::new();
    }
    let last = size - 1;
    let mut out = Vec::with_capacity(4 * size as usize);
    for y in 0..size {
        for x in 0..size {
            if x == 0 || y == 0 || x == last || y == last {
                out.push(CellConstraint::new(x, y, allowed.iter().cloned()));
            }
        }
    }
    out
}
