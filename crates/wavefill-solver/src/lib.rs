//! Wave function collapse over a 2D grid.
//!
//! Build a [`Solver`] from a pattern table (or shared compiled rules), pin
//! cells with the seeding API, then `solve()` for a dense grid of pattern ids.

pub mod config;
pub mod rng;
pub mod seed;
pub mod solver;

mod collapse;
mod propagate;
mod wave;

#[cfg(test)]
mod test_harness;

pub use config::{SeedPolicy, SolverConfig};
pub use rng::{chunk_rng, derive_seed};
pub use seed::CellConstraint;
pub use solver::{Solver, StepOutcome};
