use std::collections::BTreeSet;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use rand::Rng;
use wavefill_core::direction::Direction;
use wavefill_core::error::WfcError;
use wavefill_core::grid::{cell_index, neighbor_index, Grid};
use wavefill_core::mask::PatternMask;
use wavefill_core::pattern::PatternTable;
use wavefill_rules::compiler::{compile, CompiledRules};

use crate::collapse::choose_weighted;
use crate::config::SolverConfig;
use crate::propagate::Propagator;
use crate::wave::Wave;

/// Result of a single [`Solver::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The cell at `(x, y)` was collapsed and its consequences propagated.
    Collapsed { x: u32, y: u32 },
    /// Every cell is collapsed.
    Done,
}

/// Wave function collapse solver for one `width x height` grid.
///
/// Owns its wave, scratch buffers and random generator. The compiled rules
/// are shared and never mutated, so many solvers can run on one set of rules
/// from different threads.
pub struct Solver<P, R, M: PatternMask = u32> {
    pub(crate) rules: Arc<CompiledRules<P, M>>,
    pub(crate) wave: Wave<M>,
    pub(crate) propagator: Propagator,
    pub(crate) config: SolverConfig,
    rng: R,
    /// Set once a contradiction or budget overrun leaves the wave unusable.
    /// Cleared by `reset`.
    pub(crate) failure: Option<WfcError>,
    steps: usize,
}

impl<P, R> Solver<P, R, u32>
where
    P: Clone + Eq + Hash + Ord + Debug,
    R: Rng,
{
    /// Compile `table` into 32-bit masks and build a solver over it.
    pub fn new(width: u32, height: u32, table: &PatternTable<P>, rng: R) -> Result<Self, WfcError> {
        Self::with_table(width, height, table, rng)
    }
}

impl<P, R, M> Solver<P, R, M>
where
    P: Clone + Eq + Hash + Ord + Debug,
    R: Rng,
    M: PatternMask,
{
    /// Compile `table` for mask type `M` and build a solver over it.
    pub fn with_table(
        width: u32,
        height: u32,
        table: &PatternTable<P>,
        rng: R,
    ) -> Result<Self, WfcError> {
        let rules = compile::<P, M>(table)?;
        Ok(Self::with_rules(width, height, Arc::new(rules), rng))
    }

    /// Build a solver on rules compiled elsewhere.
    pub fn with_rules(width: u32, height: u32, rules: Arc<CompiledRules<P, M>>, rng: R) -> Self {
        let wave = Wave::new(width, height, rules.all_mask());
        let propagator = Propagator::new(wave.len());
        Self {
            rules,
            wave,
            propagator,
            config: SolverConfig::default(),
            rng,
            failure: None,
            steps: 0,
        }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn rules(&self) -> &CompiledRules<P, M> {
        &self.rules
    }

    /// Another handle to the compiled rules, for building sibling solvers.
    pub fn shared_rules(&self) -> Arc<CompiledRules<P, M>> {
        Arc::clone(&self.rules)
    }

    pub fn width(&self) -> u32 {
        self.wave.width()
    }

    pub fn height(&self) -> u32 {
        self.wave.height()
    }

    /// Collapses performed since construction or the last `reset`.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Replace the generator, typically together with `reset` for a fresh attempt.
    pub fn set_rng(&mut self, rng: R) {
        self.rng = rng;
    }

    /// Restore every cell to the full mask. Buffers are reused.
    pub fn reset(&mut self) {
        self.wave.reset(self.rules.all_mask());
        self.failure = None;
        self.steps = 0;
    }

    /// Patterns still possible at `(x, y)`.
    pub fn possibilities(&self, x: u32, y: u32) -> Result<BTreeSet<P>, WfcError> {
        let index = self.index_of(x, y)?;
        Ok(self.rules.patterns_of(self.wave.mask(index)))
    }

    pub fn is_collapsed(&self, x: u32, y: u32) -> Result<bool, WfcError> {
        let index = self.index_of(x, y)?;
        Ok(self.wave.is_collapsed(index))
    }

    /// Collapse the lowest-entropy cell and propagate.
    pub fn step(&mut self) -> Result<StepOutcome, WfcError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let Some(index) = self.wave.pop_min_entropy() else {
            return Ok(StepOutcome::Done);
        };

        let mask = self.wave.mask(index);
        let rules = &self.rules;
        let bit = match choose_weighted(mask, |b| rules.weight(b), &mut self.rng) {
            Ok(Some(bit)) => bit,
            // the frontier never yields an empty cell
            Ok(None) => {
                let (x, y) = self.wave.coords(index);
                return self.fail(WfcError::Contradiction { x, y });
            }
            Err(bad) => {
                let err = WfcError::InvalidWeight {
                    id: format!("{:?}", rules.id(bad.bit)),
                    weight: bad.weight,
                };
                return self.fail(err);
            }
        };
        self.wave.set_mask(index, M::bit(bit));
        self.steps += 1;

        let (x, y) = self.wave.coords(index);
        log::trace!("collapsed ({x}, {y}) to {:?}", self.rules.id(bit));

        self.propagate([index])?;
        Ok(StepOutcome::Collapsed { x, y })
    }

    /// Run the collapse loop to completion.
    pub fn solve(&mut self) -> Result<Grid<P>, WfcError> {
        self.solve_until(|| false)
    }

    /// Run the collapse loop, checking `should_stop` before every step.
    /// Returns `Cancelled` when it asks to stop; the wave is kept, so a later
    /// call continues where this one left off.
    pub fn solve_until(&mut self, mut should_stop: impl FnMut() -> bool) -> Result<Grid<P>, WfcError> {
        loop {
            if should_stop() {
                log::debug!("solve cancelled after {} collapses", self.steps);
                return Err(WfcError::Cancelled);
            }
            if self.step()? == StepOutcome::Done {
                break;
            }
        }

        if self.config.verify_output {
            if let Err(err) = self.verify() {
                return self.fail(err);
            }
        }
        log::debug!(
            "solved {}x{} grid in {} collapses",
            self.width(),
            self.height(),
            self.steps
        );
        self.output()
    }

    /// Check every adjacent pair of a fully collapsed wave against the rules.
    /// Reports the first cell, in row-major order, that disagrees with its
    /// east or south neighbor.
    pub fn verify(&self) -> Result<(), WfcError> {
        let (width, height) = (self.width(), self.height());
        for index in 0..self.wave.len() {
            let Some(a) = self.wave.mask(index).lowest_bit() else {
                let (x, y) = self.wave.coords(index);
                return Err(WfcError::Contradiction { x, y });
            };
            for dir in [Direction::East, Direction::South] {
                let Some(neighbor) = neighbor_index(width, height, index, dir) else {
                    continue;
                };
                let Some(b) = self.wave.mask(neighbor).lowest_bit() else {
                    continue;
                };
                if !self.rules.compatible(a, dir, b) {
                    let (x, y) = self.wave.coords(index);
                    log::debug!(
                        "verification failed: {:?} at ({x}, {y}) next to {:?} ({dir:?})",
                        self.rules.id(a),
                        self.rules.id(b)
                    );
                    return Err(WfcError::Contradiction { x, y });
                }
            }
        }
        Ok(())
    }

    fn output(&self) -> Result<Grid<P>, WfcError> {
        Grid::try_from_fn(self.width(), self.height(), |x, y| {
            let mask = self.wave.mask(cell_index(self.width(), x, y));
            match mask.lowest_bit() {
                Some(bit) if mask.is_collapsed() => Ok(self.rules.id(bit).clone()),
                _ => Err(WfcError::Contradiction { x, y }),
            }
        })
    }

    pub(crate) fn propagate(&mut self, seeds: impl IntoIterator<Item = usize>) -> Result<(), WfcError> {
        let budget = self
            .config
            .propagation_budget(self.wave.len(), self.rules.pattern_count());
        match self
            .propagator
            .propagate(&mut self.wave, &self.rules, seeds, budget)
        {
            Ok(()) => Ok(()),
            Err(err) => self.fail(err),
        }
    }

    pub(crate) fn fail<T>(&mut self, err: WfcError) -> Result<T, WfcError> {
        self.failure = Some(err.clone());
        Err(err)
    }

    pub(crate) fn index_of(&self, x: u32, y: u32) -> Result<usize, WfcError> {
        self.wave.index_of(x, y).ok_or(WfcError::OutOfBounds {
            x,
            y,
            width: self.width(),
            height: self.height(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_harness::{
        assert_adjacency, checker_table, coast_table, seeded, terrain_table,
    };
    use wavefill_core::pattern::Pattern;

    #[test]
    fn test_two_pattern_4x4_always_succeeds() {
        let table = PatternTable::from_patterns([
            ("a", Pattern::new(1.0).allow_all(["a", "b"])),
            ("b", Pattern::new(1.0).allow_all(["a", "b"])),
        ])
        .expect("valid table");
        for seed in 0..50 {
            let mut solver = Solver::new(4, 4, &table, seeded(seed)).expect("builds");
            let grid = solver.solve().expect("fully compatible set never fails");
            assert_eq!(grid.len(), 16);
        }
    }

    #[test]
    fn test_solved_grid_respects_adjacency() {
        let table = terrain_table();
        for seed in 0..10 {
            let mut solver = Solver::new(24, 17, &table, seeded(seed)).expect("builds");
            let grid = solver.solve().expect("terrain always solves");
            assert_adjacency(&grid, solver.rules());
        }
    }

    #[test]
    fn test_same_seed_same_output() {
        let table = terrain_table();
        let a = Solver::new(32, 32, &table, seeded(99))
            .expect("builds")
            .solve()
            .expect("solves");
        let b = Solver::new(32, 32, &table, seeded(99))
            .expect("builds")
            .solve()
            .expect("solves");
        assert_eq!(a, b);
        let c = Solver::new(32, 32, &table, seeded(100))
            .expect("builds")
            .solve()
            .expect("solves");
        assert_ne!(a, c, "different seeds should differ on a 32x32 grid");
    }

    #[test]
    fn test_empty_grid_succeeds() {
        let table = terrain_table();
        for (w, h) in [(0, 0), (0, 5), (5, 0)] {
            let mut solver = Solver::new(w, h, &table, seeded(0)).expect("builds");
            let grid = solver.solve().expect("nothing to do");
            assert!(grid.is_empty());
            assert_eq!(solver.steps(), 0);
        }
    }

    #[test]
    fn test_single_pattern_needs_no_collapse() {
        let table =
            PatternTable::from_patterns([("only", Pattern::new(1.0).allow_all(["only"]))])
                .expect("valid table");
        let mut solver = Solver::new(5, 5, &table, seeded(0)).expect("builds");
        let grid = solver.solve().expect("solves");
        assert!(grid.cells().iter().all(|&p| p == "only"));
        assert_eq!(solver.steps(), 0);
    }

    #[test]
    fn test_step_reports_cells_until_done() {
        let table = coast_table();
        let mut solver = Solver::new(3, 3, &table, seeded(5)).expect("builds");
        let first = solver.step().expect("steps");
        // every cell starts at full entropy, so row-major order picks (0, 0)
        assert_eq!(first, StepOutcome::Collapsed { x: 0, y: 0 });
        let mut steps = 1;
        while solver.step().expect("coast never contradicts") != StepOutcome::Done {
            steps += 1;
            assert!(steps <= 9);
        }
        assert_eq!(solver.steps(), steps);
        assert_eq!(solver.step(), Ok(StepOutcome::Done));
    }

    #[test]
    fn test_cancellation() {
        let table = terrain_table();
        let mut solver = Solver::new(16, 16, &table, seeded(3)).expect("builds");
        let mut polls = 0;
        let result = solver.solve_until(|| {
            polls += 1;
            polls > 5
        });
        assert_eq!(result, Err(WfcError::Cancelled));
        assert_eq!(solver.steps(), 5);
        // cancellation does not poison the solver
        let grid = solver.solve().expect("continues to completion");
        assert_eq!(grid.len(), 256);
    }

    #[test]
    fn test_reset_allows_resolve() {
        let table = terrain_table();
        let mut solver = Solver::new(12, 12, &table, seeded(8)).expect("builds");
        let first = solver.solve().expect("solves");
        solver.reset();
        assert!(!solver.is_collapsed(0, 0).expect("in bounds"));
        assert_eq!(solver.possibilities(3, 3).expect("in bounds").len(), 6);
        solver.set_rng(seeded(8));
        let second = solver.solve().expect("solves");
        assert_eq!(first, second);
    }

    #[test]
    fn test_inspection_out_of_bounds() {
        let solver = Solver::new(4, 3, &coast_table(), seeded(0)).expect("builds");
        assert_eq!(
            solver.possibilities(4, 0),
            Err(WfcError::OutOfBounds {
                x: 4,
                y: 0,
                width: 4,
                height: 3
            })
        );
        assert!(solver.is_collapsed(0, 3).is_err());
    }

    #[test]
    fn test_construction_fails_fast() {
        let table: PatternTable<u8> = PatternTable::new();
        assert!(matches!(
            Solver::new(4, 4, &table, seeded(0)),
            Err(WfcError::EmptyPatternSet)
        ));

        let wide = PatternTable::from_patterns((0..9u8).map(|i| (i, Pattern::new(1.0))))
            .expect("valid table");
        assert!(matches!(
            Solver::<_, _, u8>::with_table(4, 4, &wide, seeded(0)),
            Err(WfcError::TooManyPatterns {
                count: 9,
                capacity: 8
            })
        ));
    }

    #[test]
    fn test_failure_is_sticky_until_reset() {
        let table = checker_table();
        let mut solver = Solver::new(2, 1, &table, seeded(0)).expect("builds");
        solver.constrain_cell(0, 0, &["black"]).expect("seeds");
        let err = solver.constrain_cell(1, 0, &["black"]).unwrap_err();
        assert_eq!(err, WfcError::Contradiction { x: 1, y: 0 });
        assert_eq!(solver.solve(), Err(err.clone()));
        assert_eq!(solver.step(), Err(err));
        solver.reset();
        assert!(solver.solve().is_ok());
    }

    #[test]
    fn test_huge_weights_solve() {
        let table = PatternTable::from_patterns([
            ("a", Pattern::new(1e308).allow_all(["a", "b"])),
            ("b", Pattern::new(1e308).allow_all(["a", "b"])),
        ])
        .expect("each weight is finite");
        let mut solver = Solver::new(2, 2, &table, seeded(0)).expect("builds");
        let grid = solver.solve().expect("weights sum past f64::MAX but still draw");
        assert_eq!(grid.len(), 4);
    }
}
