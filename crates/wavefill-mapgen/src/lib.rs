//! Map generation on top of the wave function collapse solver: retry with
//! fresh seeds, fallback fills, and parallel chunked generation.

pub mod chunk;
pub mod chunk_map;
pub mod config;
pub mod dispatch;
pub mod retry;

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use glam::IVec2;
use wavefill_core::mask::PatternMask;
use wavefill_core::pattern::PatternTable;
use wavefill_core::types::ChunkCoord;
use wavefill_rules::compiler::{compile, CompiledRules};
use wavefill_solver::CellConstraint;

pub use chunk::{edge_constraints, Chunk, ChunkRequest, ChunkState};
pub use chunk_map::ChunkMap;
pub use config::{Fallback, GenerationConfig};
pub use retry::{GenerateError, Generated, RetryPolicy};

/// Primary public struct for the wavefill-mapgen crate.
/// Owns one compiled rule set and a generation config, and hands out
/// single grids or whole chunk blocks.
pub struct MapGenerator<P, M: PatternMask = u32> {
    rules: Arc<CompiledRules<P, M>>,
    config: GenerationConfig<P>,
}

impl<P, M> MapGenerator<P, M>
where
    P: Clone + Eq + Hash + Ord + Debug + Send + Sync,
    M: PatternMask,
{
    /// Compile `table` and build a generator.
    pub fn new(table: &PatternTable<P>, config: GenerationConfig<P>) -> Result<Self, GenerateError> {
        let rules = compile::<P, M>(table)?;
        log::info!(
            "map generator ready: {} patterns, rule hash {:016x}, seed {}",
            rules.pattern_count(),
            rules.rule_hash(),
            config.seed
        );
        Ok(Self::from_rules(Arc::new(rules), config))
    }

    /// Build a generator on rules compiled elsewhere.
    pub fn from_rules(rules: Arc<CompiledRules<P, M>>, config: GenerationConfig<P>) -> Self {
        Self { rules, config }
    }

    pub fn rules(&self) -> &Arc<CompiledRules<P, M>> {
        &self.rules
    }

    pub fn config(&self) -> &GenerationConfig<P> {
        &self.config
    }

    /// Generate one `width x height` grid.
    pub fn generate(&self, width: u32, height: u32) -> Result<Generated<P>, GenerateError> {
        self.generate_constrained(width, height, &[])
    }

    /// Generate one grid with pinned cells. Uses the chunk-space origin for seeding.
    pub fn generate_constrained(
        &self,
        width: u32,
        height: u32,
        constraints: &[CellConstraint<P>],
    ) -> Result<Generated<P>, GenerateError> {
        retry::generate_with_retry(
            &self.rules,
            width,
            height,
            ChunkCoord::ZERO,
            constraints,
            &self.config,
        )
    }

    /// Generate the requested chunks in parallel into a [`ChunkMap`].
    pub fn generate_chunks(&self, requests: &[ChunkRequest<P>]) -> ChunkMap<P> {
        let mut map = ChunkMap::new(self.config.chunk_size);
        map.extend(dispatch::generate_chunks(&self.rules, &self.config, requests));
        let (generated, fell_back, failed) = map.chunk_counts();
        log::info!(
            "generated {} chunks: {generated} solved, {fell_back} fell back, {failed} failed",
            requests.len()
        );
        map
    }

    /// Generate a `chunks_x x chunks_y` block starting at chunk (0, 0).
    /// With `edge` set, every chunk's border cells are pinned to those
    /// patterns so the chunks line up when assembled.
    pub fn generate_block(&self, chunks_x: u32, chunks_y: u32, edge: Option<&[P]>) -> ChunkMap<P> {
        let constraints = edge
            .map(|allowed| edge_constraints(self.config.chunk_size, allowed))
            .unwrap_or_default();
        let requests: Vec<_> = (0..chunks_y as i32)
            .flat_map(|y| (0..chunks_x as i32).map(move |x| IVec2::new(x, y)))
            .map(|coord| ChunkRequest::new(coord).with_constraints(constraints.clone()))
            .collect();
        self.generate_chunks(&requests)
    }
}
