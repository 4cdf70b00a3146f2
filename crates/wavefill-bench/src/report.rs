use std::fmt::Write as _;
use std::io;
use std::path::Path;

use crate::runner::BenchmarkResult;

/// Saved results of one bench run, compared against by later runs.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Baseline {
    pub timestamp: String,
    pub results: Vec<BenchmarkResult>,
}

impl Baseline {
    fn find(&self, scene_name: &str) -> Option<&BenchmarkResult> {
        self.results.iter().find(|r| r.scene_name == scene_name)
    }
}

/// Mean solve time of one scene against its baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDelta {
    pub scene_name: String,
    pub baseline_ms: f64,
    pub current_ms: f64,
}

impl SceneDelta {
    /// Percent change from the baseline; positive is slower.
    pub fn pct_change(&self) -> f64 {
        (self.current_ms - self.baseline_ms) / self.baseline_ms * 100.0
    }

    pub fn is_regression(&self, threshold_pct: f64) -> bool {
        self.pct_change() > threshold_pct
    }
}

/// Read a baseline JSON file. A malformed file is an `InvalidData` error.
pub fn load_baseline(path: &Path) -> io::Result<Baseline> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Write a baseline as pretty JSON, creating parent directories.
pub fn save_baseline(path: &Path, baseline: &Baseline) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(baseline)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    std::fs::write(path, json)
}

/// Pair every current scene with its baseline entry.
/// Scenes new since the baseline, or with a zero baseline mean, are skipped.
pub fn compare(current: &[BenchmarkResult], baseline: &Baseline) -> Vec<SceneDelta> {
    current
        .iter()
        .filter_map(|result| {
            let base = baseline.find(&result.scene_name)?;
            (base.timings.mean_ms > 0.0).then(|| SceneDelta {
                scene_name: result.scene_name.clone(),
                baseline_ms: base.timings.mean_ms,
                current_ms: result.timings.mean_ms,
            })
        })
        .collect()
}

/// Markdown table with one row per scene.
pub fn format_markdown(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    out.push_str("| Scene | Cells | Patterns | Solves | Contradictions | Mean (ms) | Median (ms) | P95 (ms) | P99 (ms) | Min (ms) | Max (ms) |\n");
    out.push_str("|-------|-------|----------|--------|----------------|-----------|-------------|----------|----------|----------|----------|\n");

    for r in results {
        let t = &r.timings;
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} |",
            r.scene_name,
            r.width * r.height,
            r.pattern_count,
            r.solve_count,
            r.contradictions,
            t.mean_ms,
            t.median_ms,
            t.p95_ms,
            t.p99_ms,
            t.min_ms,
            t.max_ms,
        );
    }

    out
}

/// Markdown comparison table, with regressions flagged and summarized.
pub fn format_comparison(deltas: &[SceneDelta], threshold_pct: f64) -> String {
    let mut out = String::new();
    out.push_str("| Scene | Baseline (ms) | Current (ms) | Change |\n");
    out.push_str("|-------|---------------|--------------|--------|\n");
    for d in deltas {
        let flag = if d.is_regression(threshold_pct) { " REGRESSION" } else { "" };
        let _ = writeln!(
            out,
            "| {} | {:.2} | {:.2} | {:+.1}%{} |",
            d.scene_name,
            d.baseline_ms,
            d.current_ms,
            d.pct_change(),
            flag
        );
    }

    let regressions = deltas.iter().filter(|d| d.is_regression(threshold_pct)).count();
    out.push('\n');
    if regressions == 0 {
        let _ = writeln!(out, "All scenes within {threshold_pct:.0}% of baseline.");
    } else {
        let _ = writeln!(
            out,
            "{regressions} scene(s) slower than baseline by more than {threshold_pct:.0}%."
        );
    }
    out
}
