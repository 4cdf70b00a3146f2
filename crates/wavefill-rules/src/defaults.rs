//! Built-in pattern sets shipped with the crate.

use crate::loader::{load_pattern_set_from_str, LoadError, PatternSetDef};

pub const TERRAIN_RON: &str = include_str!("../../../data/patterns/terrain.ron");
pub const CHECKER_RON: &str = include_str!("../../../data/patterns/checker.ron");
pub const TOWN_RON: &str = include_str!("../../../data/patterns/town.ron");

/// Names accepted by [`builtin`].
pub const BUILTIN_NAMES: [&str; 3] = ["terrain", "checker", "town"];

/// RON source of a built-in set by name.
pub fn builtin_source(name: &str) -> Option<&'static str> {
    match name {
        "terrain" => Some(TERRAIN_RON),
        "checker" => Some(CHECKER_RON),
        "town" => Some(TOWN_RON),
        _ => None,
    }
}

/// Parse a built-in set by name. `None` for unknown names.
pub fn builtin(name: &str) -> Option<Result<PatternSetDef, LoadError>> {
    builtin_source(name).map(load_pattern_set_from_str)
}

/// Terrain set: grass, forest, sand, water, deep water, cobblestone.
/// Sand borders everything, which makes every solve succeed.
pub fn terrain() -> Result<PatternSetDef, LoadError> {
    load_pattern_set_from_str(TERRAIN_RON)
}

/// Two-color alternating set.
pub fn checker() -> Result<PatternSetDef, LoadError> {
    load_pattern_set_from_str(CHECKER_RON)
}

/// Roads, crossings, houses and yards with directional rules.
pub fn town() -> Result<PatternSetDef, LoadError> {
    load_pattern_set_from_str(TOWN_RON)
}
