//! Deterministic test infrastructure for solver tests.
//!
//! Shared pattern tables, seeded generators and the adjacency check used by
//! the unit tests of every solver module. The properties at the bottom run
//! whole solves and hold for any seed.

use std::fmt::Debug;
use std::hash::Hash;

use rand::rngs::StdRng;
use rand::SeedableRng;
use wavefill_core::direction::Direction;
use wavefill_core::grid::Grid;
use wavefill_core::mask::PatternMask;
use wavefill_core::pattern::{Pattern, PatternTable};
use wavefill_rules::compiler::{compile, CompiledRules};
use wavefill_rules::defaults;

pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// grass, sand, water: sand borders everything, grass and water never touch.
pub fn coast_table() -> PatternTable<&'static str> {
    PatternTable::from_patterns([
        ("grass", Pattern::new(2.0).allow_all(["grass", "sand"])),
        ("sand", Pattern::new(1.0).allow_all(["grass", "sand", "water"])),
        ("water", Pattern::new(2.0).allow_all(["sand", "water"])),
    ])
    .expect("valid table")
}

/// black, white: neighbors always differ.
pub fn checker_table() -> PatternTable<&'static str> {
    PatternTable::from_patterns([
        ("black", Pattern::new(1.0).allow_all(["white"])),
        ("white", Pattern::new(1.0).allow_all(["black"])),
    ])
    .expect("valid table")
}

pub fn terrain_table() -> PatternTable<String> {
    defaults::terrain()
        .expect("built-in terrain loads")
        .to_table()
        .expect("built-in terrain is a valid table")
}

pub fn coast_rules<M: PatternMask>() -> CompiledRules<&'static str, M> {
    compile(&coast_table()).expect("coast compiles")
}

pub fn checker_rules<M: PatternMask>() -> CompiledRules<&'static str, M> {
    compile(&checker_table()).expect("checker compiles")
}

/// Panic if any horizontally or vertically adjacent pair of `grid` is not
/// allowed by `rules`.
pub fn assert_adjacency<P, M>(grid: &Grid<P>, rules: &CompiledRules<P, M>)
where
    P: Clone + Eq + Hash + Ord + Debug,
    M: PatternMask,
{
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let a = &grid[(x, y)];
            let bit_a = rules.bit_of(a).expect("grid holds registered ids");
            for dir in [Direction::East, Direction::South] {
                let Some(n) = grid.neighbor(x, y, dir) else {
                    continue;
                };
                let b = &grid[(n.x, n.y)];
                let bit_b = rules.bit_of(b).expect("grid holds registered ids");
                assert!(
                    rules.compatible(bit_a, dir, bit_b),
                    "{a:?} at ({x}, {y}) next to {b:?} ({dir:?})"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::solver::Solver;
    use rand::Rng;
    use std::sync::Arc;
    use wavefill_core::error::WfcError;

    #[test]
    fn test_weight_bias_single_cell() {
        let table = PatternTable::from_patterns([
            ("heavy", Pattern::new(3.0)),
            ("light", Pattern::new(1.0)),
        ])
        .expect("valid table");
        let mut solver = Solver::new(1, 1, &table, seeded(2024)).expect("builds");
        let trials = 4000;
        let mut heavy = 0;
        for _ in 0..trials {
            solver.reset();
            let grid = solver.solve().expect("a single cell cannot contradict");
            if grid[(0, 0)] == "heavy" {
                heavy += 1;
            }
        }
        let share = heavy as f64 / trials as f64;
        assert!((share - 0.75).abs() < 0.05, "heavy share {share}");
    }

    #[test]
    fn test_full_coverage_terrain() {
        let rules = Arc::new(compile::<_, u32>(&terrain_table()).expect("compiles"));
        let sizes = [1u32, 2, 3, 7, 16, 31, 64];
        for (i, &w) in sizes.iter().enumerate() {
            for &h in &sizes[i..] {
                let mut solver = Solver::with_rules(w, h, Arc::clone(&rules), seeded(w as u64 * 97 + h as u64));
                let grid = solver
                    .solve()
                    .unwrap_or_else(|e| panic!("{w}x{h} failed: {e}"));
                assert_eq!(grid.len(), (w * h) as usize);
                assert_adjacency(&grid, rules.as_ref());
            }
        }
    }

    #[test]
    fn test_mask_widths_agree() {
        let table = terrain_table();
        let solve_with = |seed| {
            let narrow = Solver::<_, _, u8>::with_table(20, 20, &table, seeded(seed))
                .expect("builds")
                .solve()
                .expect("solves");
            let mid = Solver::<_, _, u16>::with_table(20, 20, &table, seeded(seed))
                .expect("builds")
                .solve()
                .expect("solves");
            let default = Solver::new(20, 20, &table, seeded(seed))
                .expect("builds")
                .solve()
                .expect("solves");
            let wide = Solver::<_, _, u64>::with_table(20, 20, &table, seeded(seed))
                .expect("builds")
                .solve()
                .expect("solves");
            assert_eq!(narrow, mid);
            assert_eq!(mid, default);
            assert_eq!(default, wide);
        };
        for seed in [0, 1, 77] {
            solve_with(seed);
        }
    }

    #[test]
    fn test_table_and_runtime_union_agree() {
        let compiled = compile::<_, u32>(&terrain_table()).expect("compiles");
        assert!(compiled.matrix().is_some());
        let with_table = Arc::new(compiled.clone());
        let runtime = Arc::new(compiled.without_matrix());
        for seed in 0..5 {
            let a = Solver::with_rules(25, 25, Arc::clone(&with_table), seeded(seed))
                .solve()
                .expect("solves");
            let b = Solver::with_rules(25, 25, Arc::clone(&runtime), seeded(seed))
                .solve()
                .expect("solves");
            assert_eq!(a, b, "seed {seed}");
        }
    }

    #[test]
    fn test_large_pattern_set_solves_without_matrix() {
        // 20 bands; each band borders itself and the bands next to it
        let ids: Vec<u8> = (0..20).collect();
        let table = PatternTable::from_patterns(ids.iter().map(|&i| {
            let near: Vec<u8> = ids
                .iter()
                .copied()
                .filter(|&j| (i as i32 - j as i32).abs() <= 1)
                .collect();
            (i, Pattern::new(1.0 + i as f64).allow_all(near))
        }))
        .expect("valid table");
        let mut solver = Solver::new(10, 10, &table, seeded(4)).expect("builds");
        assert!(solver.rules().matrix().is_none());
        match solver.solve() {
            Ok(grid) => assert_adjacency(&grid, solver.rules()),
            // band constraints can dead-end; a failure must still be a contradiction
            Err(err) => assert!(err.is_contradiction(), "unexpected {err}"),
        }
    }

    #[test]
    fn test_checker_contradiction_then_recovery() {
        let mut solver = Solver::new(6, 6, &checker_table(), seeded(0)).expect("builds");
        solver.constrain_cell(2, 2, &["white"]).expect("seeds");
        let err = solver.constrain_cell(3, 2, &["white"]).unwrap_err();
        assert!(matches!(err, WfcError::Contradiction { x: 3, y: 2 }));
        assert!(err.is_contradiction());
        solver.reset();
        let grid = solver.solve().expect("unseeded checker always solves");
        assert_adjacency(&grid, solver.rules());
    }

    /// Symmetric table of `n` patterns where each pair may border with
    /// probability one half. Every pattern borders itself.
    fn random_table(n: u8, rng: &mut StdRng) -> PatternTable<u8> {
        let mut near: Vec<Vec<u8>> = (0..n).map(|i| vec![i]).collect();
        for i in 0..n {
            for j in i + 1..n {
                if rng.gen_bool(0.5) {
                    near[i as usize].push(j);
                    near[j as usize].push(i);
                }
            }
        }
        PatternTable::from_patterns(near.into_iter().enumerate().map(|(i, ids)| {
            (i as u8, Pattern::new(rng.gen_range(0.5..4.0)).allow_all(ids))
        }))
        .expect("valid table")
    }

    #[test]
    fn test_unverified_solves_respect_adjacency() {
        let mut tables = seeded(31);
        let config = SolverConfig {
            verify_output: false,
            ..SolverConfig::default()
        };
        for round in 0..60 {
            let n = tables.gen_range(2..=7);
            let table = random_table(n, &mut tables);
            let rules = Arc::new(compile::<_, u32>(&table).expect("compiles"));
            for seed in 0..4 {
                let mut solver = Solver::with_rules(8, 8, Arc::clone(&rules), seeded(seed))
                    .with_config(config.clone());
                match solver.solve() {
                    Ok(grid) => assert_adjacency(&grid, rules.as_ref()),
                    Err(err) => assert!(err.is_contradiction(), "round {round}: {err}"),
                }
            }
        }
    }
}
