//! Pinning cells before the collapse loop runs.

use std::fmt::Debug;
use std::hash::Hash;

use rand::Rng;
use serde::{Deserialize, Serialize};
use wavefill_core::error::WfcError;
use wavefill_core::mask::PatternMask;

use crate::config::SeedPolicy;
use crate::solver::Solver;
use crate::wave::Restrict;

/// Restrict the cell at `(x, y)` to the patterns in `allowed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellConstraint<P> {
    pub x: u32,
    pub y: u32,
    pub allowed: Vec<P>,
}

impl<P> CellConstraint<P> {
    pub fn new(x: u32, y: u32, allowed: impl IntoIterator<Item = P>) -> Self {
        Self {
            x,
            y,
            allowed: allowed.into_iter().collect(),
        }
    }
}

impl<P, R, M> Solver<P, R, M>
where
    P: Clone + Eq + Hash + Ord + Debug,
    R: Rng,
    M: PatternMask,
{
    /// Narrow one cell to `allowed` and propagate immediately.
    pub fn constrain_cell(&mut self, x: u32, y: u32, allowed: &[P]) -> Result<(), WfcError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let index = self.index_of(x, y)?;
        let mask = self.rules.mask_of(allowed)?;

        match self.wave.restrict(index, mask) {
            Restrict::Unchanged => Ok(()),
            Restrict::Shrunk => self.propagate([index]),
            Restrict::Emptied => {
                log::debug!("constraint {allowed:?} empties ({x}, {y})");
                self.fail(WfcError::Contradiction { x, y })
            }
        }
    }

    /// Narrow many cells, then propagate once from every changed cell.
    /// Empty intersections are handled by the configured [`SeedPolicy`].
    pub fn constrain_cells(&mut self, entries: &[CellConstraint<P>]) -> Result<(), WfcError> {
        self.constrain_cells_with(entries, self.config.seed_policy)
    }

    /// Like [`Solver::constrain_cells`] with an explicit policy.
    ///
    /// Every entry is checked for bounds and unknown ids before any cell is
    /// touched. Under `BestEffort` a cell whose intersection would be empty
    /// is forced to the lowest-bit pattern of its `allowed` list; a forced
    /// pattern that clashes with a collapsed neighbor is reported by the
    /// propagation that follows.
    pub fn constrain_cells_with(
        &mut self,
        entries: &[CellConstraint<P>],
        policy: SeedPolicy,
    ) -> Result<(), WfcError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        let mut resolved = Vec::with_capacity(entries.len());
        for entry in entries {
            let index = self.index_of(entry.x, entry.y)?;
            let mask = self.rules.mask_of(&entry.allowed)?;
            resolved.push((entry, index, mask));
        }

        let mut changed = Vec::with_capacity(resolved.len());
        for (entry, index, mask) in resolved {
            match self.wave.restrict(index, mask) {
                Restrict::Unchanged => {}
                Restrict::Shrunk => changed.push(index),
                Restrict::Emptied => {
                    let forced = match policy {
                        SeedPolicy::BestEffort => mask.lowest_bit(),
                        SeedPolicy::Strict => None,
                    };
                    let Some(bit) = forced else {
                        log::debug!(
                            "constraint {:?} empties ({}, {})",
                            entry.allowed,
                            entry.x,
                            entry.y
                        );
                        return self.fail(WfcError::Contradiction {
                            x: entry.x,
                            y: entry.y,
                        });
                    };
                    log::debug!(
                        "forcing ({}, {}) to {:?}: constraint conflicts with earlier seeds",
                        entry.x,
                        entry.y,
                        self.rules.id(bit)
                    );
                    self.wave.set_mask(index, M::bit(bit));
                    changed.push(index);
                }
            }
        }

        self.propagate(changed)
    }
}
