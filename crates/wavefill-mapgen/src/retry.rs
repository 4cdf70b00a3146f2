//! Retry-with-new-seed and fallback around single solves.
//!
//! The solver never backtracks. This layer re-runs a failed solve with a
//! seed derived from `(base seed, chunk, attempt)`, and applies the
//! configured fallback once every attempt has failed.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use thiserror::Error;
use wavefill_core::error::WfcError;
use wavefill_core::grid::Grid;
use wavefill_core::mask::PatternMask;
use wavefill_core::types::ChunkCoord;
use wavefill_rules::compiler::CompiledRules;
use wavefill_solver::{chunk_rng, CellConstraint, Solver};

use crate::config::{Fallback, GenerationConfig};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerateError {
    #[error("all {attempts} attempts failed, last error: {last}")]
    Exhausted { attempts: u32, last: WfcError },
    #[error("invalid generation config: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Solver(#[from] WfcError),
}

/// How many times a failed solve is re-run and which failures qualify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    /// Contradictions, budget overruns and timeouts are worth another seed.
    /// Configuration errors fail the same way every time.
    pub fn is_retryable(&self, err: &WfcError) -> bool {
        err.is_contradiction() || matches!(err, WfcError::Cancelled)
    }
}

impl<P> From<&GenerationConfig<P>> for RetryPolicy {
    fn from(config: &GenerationConfig<P>) -> Self {
        Self::new(config.max_attempts)
    }
}

/// A generated grid and how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated<P> {
    pub grid: Grid<P>,
    /// Attempts made, including the successful one.
    pub attempts: u32,
    /// True when every attempt failed and the fallback fill was used.
    pub fell_back: bool,
}

/// Solve a `width x height` grid for `chunk`, retrying with fresh seeds.
///
/// `constraints` are re-applied at the start of every attempt.
pub fn generate_with_retry<P, M>(
    rules: &Arc<CompiledRules<P, M>>,
    width: u32,
    height: u32,
    chunk: ChunkCoord,
    constraints: &[CellConstraint<P>],
    config: &GenerationConfig<P>,
) -> Result<Generated<P>, GenerateError>
where
    P: Clone + Eq + Hash + Ord + Debug,
    M: PatternMask,
{
    let policy = RetryPolicy::from(config);
    if policy.max_attempts == 0 {
        return Err(GenerateError::InvalidConfig(
            "max_attempts must be at least 1".into(),
        ));
    }
    if let Fallback::Fill(fill) = &config.fallback {
        if rules.bit_of(fill).is_none() {
            return Err(GenerateError::InvalidConfig(format!(
                "fallback pattern {fill:?} is not in the pattern set"
            )));
        }
    }

    let mut solver: Solver<P, StdRng, M> = Solver::with_rules(
        width,
        height,
        Arc::clone(rules),
        chunk_rng(config.seed, chunk.x, chunk.y, 0),
    )
    .with_config(config.solver.clone());

    let mut last = None;
    for attempt in 0..policy.max_attempts {
        if attempt > 0 {
            solver.reset();
            solver.set_rng(chunk_rng(config.seed, chunk.x, chunk.y, attempt));
        }

        match run_attempt(&mut solver, constraints, config.time_budget_ms) {
            Ok(grid) => {
                if attempt > 0 {
                    log::info!(
                        "chunk ({}, {}) solved on attempt {}/{}",
                        chunk.x,
                        chunk.y,
                        attempt + 1,
                        policy.max_attempts
                    );
                }
                return Ok(Generated {
                    grid,
                    attempts: attempt + 1,
                    fell_back: false,
                });
            }
            Err(err) if policy.is_retryable(&err) => {
                log::warn!(
                    "chunk ({}, {}) attempt {}/{} failed: {err}",
                    chunk.x,
                    chunk.y,
                    attempt + 1,
                    policy.max_attempts
                );
                last = Some(err);
            }
            Err(err) => return Err(GenerateError::Solver(err)),
        }
    }

    let last = last.unwrap_or(WfcError::Cancelled);
    match &config.fallback {
        Fallback::Fill(fill) => {
            log::warn!(
                "chunk ({}, {}) exhausted {} attempts, filling with {fill:?}",
                chunk.x,
                chunk.y,
                policy.max_attempts
            );
            Ok(Generated {
                grid: Grid::filled(width, height, fill.clone()),
                attempts: policy.max_attempts,
                fell_back: true,
            })
        }
        Fallback::Fail => Err(GenerateError::Exhausted {
            attempts: policy.max_attempts,
            last,
        }),
    }
}

fn run_attempt<P, M>(
    solver: &mut Solver<P, StdRng, M>,
    constraints: &[CellConstraint<P>],
    time_budget_ms: Option<u64>,
) -> Result<Grid<P>, WfcError>
where
    P: Clone + Eq + Hash + Ord + Debug,
    M: PatternMask,
{
    if !constraints.is_empty() {
        solver.constrain_cells(constraints)?;
    }
    match time_budget_ms {
        Some(ms) => {
            let deadline = Instant::now() + Duration::from_millis(ms);
            solver.solve_until(|| Instant::now() >= deadline)
        }
        None => solver.solve(),
    }
}
