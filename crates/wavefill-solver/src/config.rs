use serde::{Deserialize, Serialize};
use wavefill_core::constants::DEFAULT_ITERATION_BUDGET_FACTOR;

/// What a batched seed does when a constraint would leave a cell with no
/// possible pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SeedPolicy {
    /// Force the cell to the lowest-bit pattern of the requested set and keep going.
    #[default]
    BestEffort,
    /// Fail with a contradiction at the offending cell.
    Strict,
}

/// Solver tuning knobs. Every field has a default, so a RON file only needs
/// to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Propagation pops allowed per call, per cell. The effective factor is
    /// never below the pattern count.
    pub iteration_budget_factor: usize,
    /// Default policy for `constrain_cells`.
    pub seed_policy: SeedPolicy,
    /// Check every adjacent pair before returning a solved grid.
    pub verify_output: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            iteration_budget_factor: DEFAULT_ITERATION_BUDGET_FACTOR as usize,
            seed_policy: SeedPolicy::BestEffort,
            verify_output: true,
        }
    }
}

impl SolverConfig {
    /// Pop budget for one propagation call over `cells` cells and `patterns` patterns.
    pub fn propagation_budget(&self, cells: usize, patterns: u32) -> usize {
        cells.saturating_mul(self.iteration_budget_factor.max(patterns as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.iteration_budget_factor, 10);
        assert_eq!(config.seed_policy, SeedPolicy::BestEffort);
        assert!(config.verify_output);
    }

    #[test]
    fn test_budget_never_below_pattern_count() {
        let config = SolverConfig::default();
        assert_eq!(config.propagation_budget(100, 4), 1000);
        assert_eq!(config.propagation_budget(100, 40), 4000);
        assert_eq!(config.propagation_budget(0, 40), 0);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config: SolverConfig =
            ron::from_str("(seed_policy: Strict)").expect("should parse");
        assert_eq!(config.seed_policy, SeedPolicy::Strict);
        assert_eq!(config.iteration_budget_factor, 10);
        assert!(config.verify_output);
    }
}
