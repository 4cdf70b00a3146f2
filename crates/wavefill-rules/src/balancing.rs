//! Data checks for the shipped pattern sets.
//! These load every built-in set and check the adjacency graph for problems
//! that only show up at solve time: one-sided declarations, missing fallback
//! patterns, unreachable patterns and skewed weights.

#[cfg(test)]
mod tests {
    use crate::compiler::compile;
    use crate::defaults;
    use crate::loader::PatternSetDef;
    use crate::validator;
    use std::collections::HashSet;
    use wavefill_core::direction::ALL_DIRECTIONS;

    fn load_all() -> Vec<PatternSetDef> {
        defaults::BUILTIN_NAMES
            .iter()
            .map(|name| {
                defaults::builtin(name)
                    .expect("listed name")
                    .expect("built-in set should load")
            })
            .collect()
    }

    /// A pattern that allows every pattern on every side, and is allowed back.
    fn universal_patterns(set: &PatternSetDef) -> Vec<String> {
        let all: HashSet<&str> = set.patterns.iter().map(|p| p.id.as_str()).collect();
        set.patterns
            .iter()
            .filter(|p| {
                ALL_DIRECTIONS.iter().all(|&dir| {
                    let allowed: HashSet<&str> = p.allowed(dir).map(String::as_str).collect();
                    allowed == all
                })
            })
            .map(|p| p.id.clone())
            .collect()
    }

    #[test]
    fn test_builtins_validate() {
        for set in load_all() {
            if let Err(errors) = validator::validate_pattern_set(&set, u32::BITS) {
                panic!("{} failed validation: {errors:?}", set.name);
            }
        }
    }

    /// Shipped data never relies on the compiler dropping one-sided pairs.
    #[test]
    fn test_builtins_symmetric() {
        for set in load_all() {
            let found = validator::find_asymmetries(&set);
            assert!(found.is_empty(), "{}: {found:?}", set.name);
        }
    }

    /// Terrain and town promise that every solve succeeds, which holds as
    /// long as one pattern borders everything.
    #[test]
    fn test_solvable_sets_have_fallback() {
        for set in load_all() {
            if set.name == "checker" {
                continue;
            }
            let universal = universal_patterns(&set);
            assert!(!universal.is_empty(), "{} has no universal pattern", set.name);
        }
    }

    #[test]
    fn test_checker_has_no_fallback() {
        let set = defaults::checker().expect("loads");
        assert!(universal_patterns(&set).is_empty());
    }

    /// Every pattern can appear next to at least one other in every direction,
    /// otherwise it can only ever be placed on a 1x1 grid.
    #[test]
    fn test_no_isolated_patterns() {
        for set in load_all() {
            let table = set.to_table().expect("valid table");
            let rules = compile::<_, u32>(&table).expect("compiles");
            for bit in 0..rules.pattern_count() {
                for dir in ALL_DIRECTIONS {
                    let mask = wavefill_core::mask::PatternMask::bit(bit);
                    assert_ne!(
                        rules.allowed_neighbors(dir, mask),
                        0,
                        "{}: pattern {} has no neighbor {dir:?}",
                        set.name,
                        rules.id(bit)
                    );
                }
            }
        }
    }

    /// No single pattern dominates its set.
    #[test]
    fn test_weight_spread() {
        for set in load_all() {
            let total: f64 = set.patterns.iter().map(|p| p.weight).sum();
            for p in &set.patterns {
                let share = p.weight / total;
                assert!(
                    share < 0.6,
                    "{}: {} takes {:.0}% of the weight",
                    set.name,
                    p.id,
                    share * 100.0
                );
            }
        }
    }
}
