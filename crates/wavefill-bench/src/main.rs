use std::path::PathBuf;
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use wavefill_bench::report;
use wavefill_bench::runner::BenchmarkRunner;
use wavefill_bench::scenes;

fn usage() {
    eprintln!("Usage: bench-runner [OPTIONS]");
    eprintln!("  --baseline <path>              Load baseline JSON for comparison");
    eprintln!("  --output <path>                Save current results as JSON baseline");
    eprintln!("  --regression-threshold <pct>   Regression threshold percentage (default: 10)");
    eprintln!("  --solves <n>                   Solves per scene (default: 50)");
    eprintln!("  --seed <n>                     Base seed (default: 0)");
}

fn value_of<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i) {
        Some(v) => v,
        None => {
            eprintln!("Missing value for {flag}");
            process::exit(1);
        }
    }
}

fn parse_or_exit<T: std::str::FromStr>(raw: &str, flag: &str) -> T {
    raw.parse().unwrap_or_else(|_| {
        eprintln!("Invalid {flag} value: {raw}");
        process::exit(1);
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut baseline_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut regression_threshold = 10.0f64;
    let mut solve_count = 50u32;
    let mut base_seed = 0u64;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--baseline" => {
                i += 1;
                baseline_path = Some(PathBuf::from(value_of(&args, i, flag)));
            }
            "--output" => {
                i += 1;
                output_path = Some(PathBuf::from(value_of(&args, i, flag)));
            }
            "--regression-threshold" => {
                i += 1;
                regression_threshold = parse_or_exit(value_of(&args, i, flag), flag);
            }
            "--solves" => {
                i += 1;
                solve_count = parse_or_exit(value_of(&args, i, flag), flag);
            }
            "--seed" => {
                i += 1;
                base_seed = parse_or_exit(value_of(&args, i, flag), flag);
            }
            "--help" | "-h" => {
                usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let runner = BenchmarkRunner::new(solve_count).with_seed(base_seed);
    let mut results = Vec::new();

    for config in &scenes::standard_scenes() {
        match runner.run_scene(config) {
            Ok(result) => results.push(result),
            Err(err) => {
                log::error!("Scene '{}' failed: {err}", config.name);
                process::exit(1);
            }
        }
    }

    println!("\n## Benchmark Results\n");
    println!("{}", report::format_markdown(&results));

    if let Some(ref path) = output_path {
        let baseline = report::Baseline {
            timestamp: timestamp(),
            results: results.clone(),
        };
        if let Err(err) = report::save_baseline(path, &baseline) {
            log::error!("Failed to save baseline to {}: {err}", path.display());
            process::exit(1);
        }
        log::info!("Saved baseline to {}", path.display());
    }

    if let Some(ref path) = baseline_path {
        match report::load_baseline(path) {
            Ok(baseline) => {
                let deltas = report::compare(&results, &baseline);
                println!("\n## Against baseline {}\n", baseline.timestamp);
                println!("{}", report::format_comparison(&deltas, regression_threshold));
                let regressions = deltas
                    .iter()
                    .filter(|d| d.is_regression(regression_threshold))
                    .count();
                if regressions > 0 {
                    log::error!("{regressions} regressions detected");
                    process::exit(1);
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("Baseline file not found: {}", path.display());
            }
            Err(err) => {
                log::error!("Failed to read baseline {}: {err}", path.display());
                process::exit(1);
            }
        }
    }

    log::info!("Benchmark complete.");
}

/// Seconds since the Unix epoch; avoids pulling in a date crate.
fn timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("unix-{secs}")
}
