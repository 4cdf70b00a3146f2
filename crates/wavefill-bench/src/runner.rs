use std::error::Error;
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use wavefill_rules::compiler::{compile, CompiledRules};
use wavefill_rules::defaults;
use wavefill_solver::Solver;

use crate::scenes::SceneConfig;

/// Timing data for a single benchmark run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub width: u32,
    pub height: u32,
    pub pattern_count: usize,
    pub solve_count: u32,
    /// Solves that ended in a contradiction. Their time is still counted.
    pub contradictions: u32,
    pub timings: TimingSeries,
}

/// Times repeated full solves of each scene on the calling thread.
pub struct BenchmarkRunner {
    solve_count: u32,
    base_seed: u64,
}

impl BenchmarkRunner {
    pub fn new(solve_count: u32) -> Self {
        Self {
            solve_count,
            base_seed: 0,
        }
    }

    pub fn with_seed(mut self, base_seed: u64) -> Self {
        self.base_seed = base_seed;
        self
    }

    /// Run a single benchmark scene and return timing results.
    ///
    /// Rules are compiled once per scene, outside the timed region. Each
    /// solve reuses the same solver after a reset with a fresh seed.
    pub fn run_scene(&self, config: &SceneConfig) -> Result<BenchmarkResult, Box<dyn Error>> {
        log::info!(
            "Running scene '{}' ({}x{}, {} set)...",
            config.name,
            config.width,
            config.height,
            config.pattern_set
        );

        let rules = Self::load_rules(config.pattern_set)?;
        let pattern_count = rules.pattern_count();
        let mut solver: Solver<String, StdRng> = Solver::with_rules(
            config.width,
            config.height,
            rules,
            StdRng::seed_from_u64(self.base_seed),
        );

        let mut solve_times = Vec::with_capacity(self.solve_count as usize);
        let mut contradictions = 0u32;

        for i in 0..self.solve_count {
            solver.reset();
            solver.set_rng(StdRng::seed_from_u64(self.base_seed.wrapping_add(i as u64)));

            let start = Instant::now();
            let outcome = solver.solve();
            solve_times.push(start.elapsed().as_secs_f64() * 1000.0);

            if let Err(err) = outcome {
                if !err.is_contradiction() {
                    return Err(err.into());
                }
                log::debug!("  solve {i}: {err}");
                contradictions += 1;
            }
        }

        let timings = compute_timings(&solve_times);
        log::info!(
            "  Done: mean={:.2}ms, p95={:.2}ms, p99={:.2}ms, {} contradictions",
            timings.mean_ms,
            timings.p95_ms,
            timings.p99_ms,
            contradictions
        );

        Ok(BenchmarkResult {
            scene_name: config.name.to_string(),
            width: config.width,
            height: config.height,
            pattern_count: pattern_count as usize,
            solve_count: self.solve_count,
            contradictions,
            timings,
        })
    }

    fn load_rules(name: &str) -> Result<Arc<CompiledRules<String, u32>>, Box<dyn Error>> {
        let set = defaults::builtin(name).ok_or_else(|| format!("unknown pattern set '{name}'"))??;
        let table = set.to_table()?;
        Ok(Arc::new(compile(&table)?))
    }
}

/// Compute timing statistics from a list of solve times in milliseconds.
pub fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}
