//! Runs chunk requests on the rayon pool.
//!
//! Every chunk gets its own solver and a seed derived from its coordinate,
//! so the output does not depend on scheduling: the parallel and sequential
//! paths produce identical chunks in request order.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use rayon::prelude::*;
use wavefill_core::mask::PatternMask;
use wavefill_rules::compiler::CompiledRules;

use crate::chunk::{Chunk, ChunkRequest};
use crate::config::GenerationConfig;
use crate::retry::generate_with_retry;

fn generate_one<P, M>(
    rules: &Arc<CompiledRules<P, M>>,
    config: &GenerationConfig<P>,
    request: &ChunkRequest<P>,
) -> Chunk<P>
where
    P: Clone + Eq + Hash + Ord + Debug,
    M: PatternMask,
{
    let size = config.chunk_size;
    let outcome = generate_with_retry(
        rules,
        size,
        size,
        request.coord,
        &request.constraints,
        config,
    );
    if let Err(err) = &outcome {
        log::warn!(
            "chunk ({}, {}) failed: {err}",
            request.coord.x,
            request.coord.y
        );
    }
    Chunk {
        coord: request.coord,
        outcome,
    }
}

/// Generate every requested chunk in parallel. Results keep request order.
pub fn generate_chunks<P, M>(
    rules: &Arc<CompiledRules<P, M>>,
    config: &GenerationConfig<P>,
    requests: &[ChunkRequest<P>],
) -> Vec<Chunk<P>>
where
    P: Clone + Eq + Hash + Ord + Debug + Send + Sync,
    M: PatternMask,
{
    requests
        .par_iter()
        .map(|request| generate_one(rules, config, request))
        .collect()
}

/// Same as [`generate_chunks`] on the calling thread.
pub fn generate_chunks_sequential<P, M>(
    rules: &Arc<CompiledRules<P, M>>,
    config: &GenerationConfig<P>,
    requests: &[ChunkRequest<P>],
) -> Vec<Chunk<P>>
where
    P: Clone + Eq + Hash + Ord + Debug,
    M: PatternMask,
{
    requests
        .iter()
        .map(|request| generate_one(rules, config, request))
        .collect()
}
