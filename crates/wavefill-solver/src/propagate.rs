//! Constraint propagation over the wave.
//!
//! LIFO work stack plus an "already queued" flag per cell. Both buffers live
//! as long as the solver and are left empty after every call, including
//! failed ones.

use std::fmt::Debug;
use std::hash::Hash;

use wavefill_core::direction::ALL_DIRECTIONS;
use wavefill_core::error::WfcError;
use wavefill_core::grid::neighbor_index;
use wavefill_core::mask::PatternMask;
use wavefill_rules::compiler::CompiledRules;

use crate::wave::{Restrict, Wave};

pub(crate) struct Propagator {
    stack: Vec<usize>,
    queued: Vec<bool>,
}

impl Propagator {
    pub fn new(cells: usize) -> Self {
        Self {
            stack: Vec::with_capacity(cells),
            queued: vec![false; cells],
        }
    }

    /// Push the restrictions of `seeds` outwards until nothing changes.
    ///
    /// Collapsed neighbors are checked but never narrowed. A neighbor whose
    /// mask would become empty, or a collapsed neighbor whose single pattern
    /// is not allowed, raises a contradiction at that neighbor's coordinates. More
    /// than `budget` pops raises `IterationBudgetExceeded`.
    pub fn propagate<P, M>(
        &mut self,
        wave: &mut Wave<M>,
        rules: &CompiledRules<P, M>,
        seeds: impl IntoIterator<Item = usize>,
        budget: usize,
    ) -> Result<(), WfcError>
    where
        P: Clone + Eq + Hash + Ord + Debug,
        M: PatternMask,
    {
        for index in seeds {
            self.enqueue(index);
        }

        let result = self.run(wave, rules, budget);
        if result.is_err() {
            self.clear();
        }
        result
    }

    fn run<P, M>(
        &mut self,
        wave: &mut Wave<M>,
        rules: &CompiledRules<P, M>,
        budget: usize,
    ) -> Result<(), WfcError>
    where
        P: Clone + Eq + Hash + Ord + Debug,
        M: PatternMask,
    {
        let (width, height) = (wave.width(), wave.height());
        let mut pops = 0usize;

        while let Some(index) = self.stack.pop() {
            self.queued[index] = false;
            pops += 1;
            if pops > budget {
                log::debug!("propagation budget of {budget} pops exhausted");
                return Err(WfcError::IterationBudgetExceeded { budget });
            }

            let mask = wave.mask(index);
            for dir in ALL_DIRECTIONS {
                let Some(neighbor) = neighbor_index(width, height, index, dir) else {
                    continue;
                };
                let allowed = rules.allowed_neighbors(dir, mask);
                let outcome = if wave.is_collapsed(neighbor) {
                    if wave.mask(neighbor) & allowed == M::EMPTY {
                        Restrict::Emptied
                    } else {
                        Restrict::Unchanged
                    }
                } else {
                    wave.restrict(neighbor, allowed)
                };
                match outcome {
                    Restrict::Unchanged => {}
                    Restrict::Shrunk => self.enqueue(neighbor),
                    Restrict::Emptied => {
                        let (x, y) = wave.coords(neighbor);
                        log::debug!("contradiction at ({x}, {y}) propagating {dir:?} from {index}");
                        return Err(WfcError::Contradiction { x, y });
                    }
                }
            }
        }
        Ok(())
    }

    #[inline]
    fn enqueue(&mut self, index: usize) {
        if !self.queued[index] {
            self.queued[index] = true;
            self.stack.push(index);
        }
    }

    fn clear(&mut self) {
        for index in self.stack.drain(..) {
            self.queued[index] = false;
        }
    }

    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        self.stack.is_empty() && self.queued.iter().all(|q| !q)
    }
}
