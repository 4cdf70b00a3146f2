use serde::{Deserialize, Serialize};
use wavefill_core::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_ATTEMPTS};
use wavefill_rules::loader::{load_config_from_str, LoadError};
use wavefill_solver::SolverConfig;

/// What to produce once every attempt has failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fallback<P> {
    /// Report the last error.
    Fail,
    /// Fill the whole grid with one pattern.
    Fill(P),
}

/// Settings for map generation. Loadable from RON; missing fields take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig<P> {
    /// Base seed. Each chunk and attempt derives its own seed from it.
    pub seed: u64,
    /// Solve attempts per chunk before the fallback applies. At least 1.
    pub max_attempts: u32,
    pub fallback: Fallback<P>,
    /// Edge length of a square chunk in cells.
    pub chunk_size: u32,
    /// Optional wall-clock limit per attempt. An attempt that runs out is
    /// cancelled and counts as failed.
    pub time_budget_ms: Option<u64>,
    pub solver: SolverConfig,
}

impl<P> Default for GenerationConfig<P> {
    fn default() -> Self {
        Self {
            seed: 0,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            fallback: Fallback::Fail,
            chunk_size: DEFAULT_CHUNK_SIZE,
            time_budget_ms: None,
            solver: SolverConfig::default(),
        }
    }
}

impl<P: serde::de::DeserializeOwned> GenerationConfig<P> {
    /// Parse a generation config from RON.
    pub fn from_ron(source: &str) -> Result<Self, LoadError> {
        load_config_from_str(source)
    }
}

impl<P> GenerationConfig<P> {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
