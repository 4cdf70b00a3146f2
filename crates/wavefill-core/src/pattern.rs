use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

use crate::direction::{Direction, ALL_DIRECTIONS};
use crate::error::WfcError;

/// A single pattern definition: its selection weight and, per direction,
/// which patterns may sit next to it.
///
/// A direction with no entry allows no neighbor at all on that side.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern<P> {
    /// Relative selection weight. Must be finite and > 0.
    pub weight: f64,
    /// Allowed neighbor ids keyed by the direction from this pattern to the neighbor.
    pub neighbors: BTreeMap<Direction, BTreeSet<P>>,
}

impl<P: Ord> Pattern<P> {
    /// Pattern with the given weight and no allowed neighbors yet.
    pub fn new(weight: f64) -> Self {
        Self {
            weight,
            neighbors: BTreeMap::new(),
        }
    }

    /// Allow `ids` as neighbors in `dir` (added to any already allowed).
    pub fn allow(mut self, dir: Direction, ids: impl IntoIterator<Item = P>) -> Self {
        self.neighbors.entry(dir).or_default().extend(ids);
        self
    }

    /// Allow `ids` as neighbors in every direction.
    pub fn allow_all(mut self, ids: impl IntoIterator<Item = P>) -> Self
    where
        P: Clone,
    {
        let ids: Vec<P> = ids.into_iter().collect();
        for dir in ALL_DIRECTIONS {
            self.neighbors
                .entry(dir)
                .or_default()
                .extend(ids.iter().cloned());
        }
        self
    }

    /// Whether `other` may sit in `dir` of this pattern.
    pub fn allows(&self, dir: Direction, other: &P) -> bool {
        self.neighbors
            .get(&dir)
            .is_some_and(|set| set.contains(other))
    }

    /// Allowed neighbors in `dir`, empty if none were declared.
    pub fn allowed(&self, dir: Direction) -> impl Iterator<Item = &P> + '_ {
        self.neighbors.get(&dir).into_iter().flatten()
    }
}

/// Ordered collection of patterns. Registration order fixes each pattern's
/// bit index, so the same table always compiles to the same masks.
#[derive(Debug, Clone)]
pub struct PatternTable<P> {
    entries: Vec<(P, Pattern<P>)>,
}

impl<P> Default for PatternTable<P> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<P: Clone + Ord + Debug> PatternTable<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(id, pattern)` pairs in order.
    pub fn from_patterns(
        patterns: impl IntoIterator<Item = (P, Pattern<P>)>,
    ) -> Result<Self, WfcError> {
        let mut table = Self::new();
        for (id, pattern) in patterns {
            table.register(id, pattern)?;
        }
        Ok(table)
    }

    /// Build a table from a map. Bits follow the map's key order.
    pub fn from_map(patterns: BTreeMap<P, Pattern<P>>) -> Result<Self, WfcError> {
        Self::from_patterns(patterns)
    }

    /// Register a pattern and return its bit index.
    pub fn register(&mut self, id: P, pattern: Pattern<P>) -> Result<u32, WfcError> {
        if self.bit_of(&id).is_some() {
            return Err(WfcError::DuplicatePattern(format!("{id:?}")));
        }
        if !pattern.weight.is_finite() || pattern.weight <= 0.0 {
            return Err(WfcError::InvalidWeight {
                id: format!("{id:?}"),
                weight: pattern.weight,
            });
        }
        self.entries.push((id, pattern));
        Ok((self.entries.len() - 1) as u32)
    }

    /// Number of patterns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a pattern by id.
    pub fn get(&self, id: &P) -> Option<&Pattern<P>> {
        self.entries.iter().find(|(p, _)| p == id).map(|(_, pat)| pat)
    }

    /// Bit index assigned to `id`.
    pub fn bit_of(&self, id: &P) -> Option<u32> {
        self.entries.iter().position(|(p, _)| p == id).map(|i| i as u32)
    }

    /// Iterate `(id, pattern)` in bit order.
    pub fn iter(&self) -> impl Iterator<Item = (&P, &Pattern<P>)> + '_ {
        self.entries.iter().map(|(id, pat)| (id, pat))
    }

    /// Pattern ids in bit order.
    pub fn ids(&self) -> impl Iterator<Item = &P> + '_ {
        self.entries.iter().map(|(id, _)| id)
    }
}
