use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wavefill_core::direction::Direction;
use wavefill_core::error::WfcError;
use wavefill_core::pattern::{Pattern, PatternTable};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to parse pattern set RON: {0}")]
    PatternSetParseError(String),
    #[error("Failed to parse config RON: {0}")]
    ConfigParseError(String),
    #[error("Pattern set '{name}' cannot be built: {source}")]
    InvalidTable { name: String, source: WfcError },
}

/// A single pattern definition as written in RON data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternDef {
    /// Stable pattern id, referenced by neighbor lists.
    pub id: String,
    /// Relative selection weight.
    pub weight: f64,
    /// Neighbors allowed only in specific directions.
    #[serde(default)]
    pub neighbors: BTreeMap<Direction, Vec<String>>,
    /// Neighbors allowed in every direction.
    #[serde(default)]
    pub any_direction: Vec<String>,
}

impl PatternDef {
    /// Every neighbor id allowed in `dir`, from both lists.
    pub fn allowed(&self, dir: Direction) -> impl Iterator<Item = &String> + '_ {
        self.any_direction
            .iter()
            .chain(self.neighbors.get(&dir).into_iter().flatten())
    }

    pub fn to_pattern(&self) -> Pattern<String> {
        let mut pattern = Pattern::new(self.weight).allow_all(self.any_direction.iter().cloned());
        for (dir, ids) in &self.neighbors {
            pattern = pattern.allow(*dir, ids.iter().cloned());
        }
        pattern
    }
}

/// A named pattern set, the top-level object of a pattern RON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternSetDef {
    pub name: String,
    pub patterns: Vec<PatternDef>,
}

impl PatternSetDef {
    /// Number of patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Build a pattern table in file order.
    pub fn to_table(&self) -> Result<PatternTable<String>, LoadError> {
        PatternTable::from_patterns(self.patterns.iter().map(|d| (d.id.clone(), d.to_pattern())))
            .map_err(|source| LoadError::InvalidTable {
                name: self.name.clone(),
                source,
            })
    }
}

/// Parse a single pattern set RON string.
pub fn load_pattern_set_from_str(ron_str: &str) -> Result<PatternSetDef, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::PatternSetParseError(e.to_string()))
}

/// Load and merge several pattern set sources into one set.
/// The merged set takes the first source's name.
pub fn load_all_pattern_sets(sources: &[&str]) -> Result<PatternSetDef, LoadError> {
    let mut merged = PatternSetDef {
        name: String::new(),
        patterns: Vec::new(),
    };
    for source in sources {
        let set = load_pattern_set_from_str(source)?;
        if merged.name.is_empty() {
            merged.name = set.name;
        }
        merged.patterns.extend(set.patterns);
    }
    Ok(merged)
}

/// Parse any RON config struct (solver or generation settings).
pub fn load_config_from_str<T: DeserializeOwned>(ron_str: &str) -> Result<T, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::ConfigParseError(e.to_string()))
}
