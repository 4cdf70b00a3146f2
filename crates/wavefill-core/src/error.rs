use thiserror::Error;

/// Errors raised while building rules, seeding a wave, or solving it.
///
/// Nothing here is recovered inside the solver. Callers that want another
/// try re-run with a different seed or different constraints.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WfcError {
    #[error("pattern set is empty")]
    EmptyPatternSet,

    #[error("pattern set has {count} patterns but the mask holds at most {capacity}")]
    TooManyPatterns { count: usize, capacity: u32 },

    #[error("pattern {0} is registered twice")]
    DuplicatePattern(String),

    #[error("pattern {id} has invalid weight {weight} (must be finite and > 0)")]
    InvalidWeight { id: String, weight: f64 },

    #[error("pattern {0} is not registered")]
    UnknownPattern(String),

    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("contradiction at cell ({x}, {y}): no pattern remains possible")]
    Contradiction { x: u32, y: u32 },

    #[error("propagation exceeded its budget of {budget} iterations")]
    IterationBudgetExceeded { budget: usize },

    #[error("solve cancelled before completion")]
    Cancelled,
}

impl WfcError {
    /// True for failures that mean "no valid solution along this random path".
    /// A retry with a different seed may succeed.
    pub fn is_contradiction(&self) -> bool {
        matches!(
            self,
            WfcError::Contradiction { .. } | WfcError::IterationBudgetExceeded { .. }
        )
    }

    /// True for errors caused by the pattern table or by caller input.
    /// Retrying cannot fix these.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            WfcError::EmptyPatternSet
                | WfcError::TooManyPatterns { .. }
                | WfcError::DuplicatePattern(_)
                | WfcError::InvalidWeight { .. }
                | WfcError::UnknownPattern(_)
                | WfcError::OutOfBounds { .. }
        )
    }
}
