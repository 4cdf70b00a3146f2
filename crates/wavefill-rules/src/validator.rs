use std::collections::HashSet;

use thiserror::Error;
use wavefill_core::direction::{Direction, ALL_DIRECTIONS};

use crate::loader::PatternSetDef;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Pattern set '{0}' is empty")]
    EmptySet(String),
    #[error("Duplicate pattern id '{0}'")]
    DuplicateId(String),
    #[error("Pattern '{id}' has weight {weight} (must be finite and > 0)")]
    InvalidWeight { id: String, weight: f64 },
    #[error("Pattern '{id}' references unknown neighbor '{neighbor}' ({dir:?})")]
    UnknownNeighbor {
        id: String,
        neighbor: String,
        dir: Direction,
    },
    #[error("Pattern set has {count} patterns, more than the {capacity}-bit mask can hold")]
    TooManyPatterns { count: usize, capacity: u32 },
}

/// A neighbor declared by one side only: `from` allows `to` in `dir`,
/// but `to` does not allow `from` in the opposite direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asymmetry {
    pub from: String,
    pub dir: Direction,
    pub to: String,
}

/// Validate a pattern set definition against a mask capacity.
pub fn validate_pattern_set(set: &PatternSetDef, capacity: u32) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if set.patterns.is_empty() {
        errors.push(ValidationError::EmptySet(set.name.clone()));
    }

    let mut seen = HashSet::new();
    for def in &set.patterns {
        if !seen.insert(def.id.as_str()) {
            errors.push(ValidationError::DuplicateId(def.id.clone()));
        }
    }

    for def in &set.patterns {
        if !def.weight.is_finite() || def.weight <= 0.0 {
            errors.push(ValidationError::InvalidWeight {
                id: def.id.clone(),
                weight: def.weight,
            });
        }
        for dir in ALL_DIRECTIONS {
            for neighbor in def.allowed(dir) {
                if !seen.contains(neighbor.as_str()) {
                    errors.push(ValidationError::UnknownNeighbor {
                        id: def.id.clone(),
                        neighbor: neighbor.clone(),
                        dir,
                    });
                }
            }
        }
    }

    if set.patterns.len() > capacity as usize {
        errors.push(ValidationError::TooManyPatterns {
            count: set.patterns.len(),
            capacity,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// List every one-sided neighbor declaration. The compiler drops these,
/// so a non-empty result usually means a typo in the data.
pub fn find_asymmetries(set: &PatternSetDef) -> Vec<Asymmetry> {
    let mut out = Vec::new();
    for from in &set.patterns {
        for dir in ALL_DIRECTIONS {
            for to_id in from.allowed(dir) {
                let Some(to) = set.patterns.iter().find(|p| &p.id == to_id) else {
                    // reported by validate_pattern_set
                    continue;
                };
                if !to.allowed(dir.opposite()).any(|back| back == &from.id) {
                    out.push(Asymmetry {
                        from: from.id.clone(),
                        dir,
                        to: to_id.clone(),
                    });
                }
            }
        }
    }
    out
}
