use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeSet, HashMap};
use std::fmt::Debug;
use std::hash::{Hash, Hasher};

use wavefill_core::constants::{DIRECTION_COUNT, TABLE_MAX_PATTERNS};
use wavefill_core::direction::{Direction, ALL_DIRECTIONS};
use wavefill_core::error::WfcError;
use wavefill_core::mask::PatternMask;
use wavefill_core::pattern::PatternTable;

/// Precomputed transition tables: for each direction, `table[mask]` is the
/// union of the neighbors allowed in that direction by every pattern in `mask`.
///
/// Built once per pattern table and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct PropagationMatrix<M> {
    tables: [Vec<M>; DIRECTION_COUNT],
}

impl<M: PatternMask> PropagationMatrix<M> {
    /// Build the exhaustive `2^N`-entry table for every direction.
    /// `neighbor_masks[b][d]` is the neighbor mask of the pattern at bit `b`.
    pub fn build(neighbor_masks: &[[M; DIRECTION_COUNT]]) -> Self {
        let size = 1usize << neighbor_masks.len();
        let tables = ALL_DIRECTIONS.map(|dir| {
            let mut table = vec![M::EMPTY; size];
            for (input, slot) in table.iter_mut().enumerate() {
                for (bit, masks) in neighbor_masks.iter().enumerate() {
                    if input & (1 << bit) != 0 {
                        *slot |= masks[dir.index()];
                    }
                }
            }
            table
        });
        Self { tables }
    }

    /// Neighbor mask allowed in `dir` of a cell holding `mask`.
    #[inline]
    pub fn allowed(&self, dir: Direction, mask: M) -> M {
        self.tables[dir.index()][mask.as_index()]
    }

    /// Entries per direction (`2^N`).
    pub fn len(&self) -> usize {
        self.tables[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables[0].is_empty()
    }
}

/// A pattern table compiled into bit form for one mask width.
///
/// Read-only after `compile`, so one instance can back any number of
/// concurrent solves behind an `Arc`.
#[derive(Debug, Clone)]
pub struct CompiledRules<P, M> {
    ids: Vec<P>,
    bits: HashMap<P, u32>,
    weights: Vec<f64>,
    /// `neighbor_masks[b][d]`: mutually agreed neighbors of pattern `b` in direction `d`.
    neighbor_masks: Vec<[M; DIRECTION_COUNT]>,
    matrix: Option<PropagationMatrix<M>>,
    all_mask: M,
    rule_hash: u64,
}

impl<P, M> CompiledRules<P, M>
where
    P: Clone + Eq + Hash + Ord + Debug,
    M: PatternMask,
{
    /// Number of patterns (`N`).
    pub fn pattern_count(&self) -> u32 {
        self.ids.len() as u32
    }

    /// Mask with every registered pattern set.
    pub fn all_mask(&self) -> M {
        self.all_mask
    }

    /// The exhaustive matrix, if the pattern count was small enough to build it.
    pub fn matrix(&self) -> Option<&PropagationMatrix<M>> {
        self.matrix.as_ref()
    }

    /// Drop the exhaustive matrix so every query takes the runtime-union path.
    pub fn without_matrix(mut self) -> Self {
        self.matrix = None;
        self
    }

    /// Deterministic hash of the source table (see [`compute_rule_hash`]).
    pub fn rule_hash(&self) -> u64 {
        self.rule_hash
    }

    /// Patterns the neighbor in `dir` may still hold, given this cell's `mask`.
    #[inline]
    pub fn allowed_neighbors(&self, dir: Direction, mask: M) -> M {
        match &self.matrix {
            Some(matrix) => matrix.allowed(dir, mask),
            None => mask.iter_bits().fold(M::EMPTY, |acc, bit| {
                acc | self.neighbor_masks[bit as usize][dir.index()]
            }),
        }
    }

    /// Whether the pattern at bit `b` may sit in `dir` of the pattern at bit `a`.
    pub fn compatible(&self, a: u32, dir: Direction, b: u32) -> bool {
        self.neighbor_masks[a as usize][dir.index()].contains(b)
    }

    /// Selection weight of the pattern at `bit`.
    #[inline]
    pub fn weight(&self, bit: u32) -> f64 {
        self.weights[bit as usize]
    }

    /// Id of the pattern at `bit`.
    pub fn id(&self, bit: u32) -> &P {
        &self.ids[bit as usize]
    }

    pub fn bit_of(&self, id: &P) -> Option<u32> {
        self.bits.get(id).copied()
    }

    /// Convert a set of ids to a mask. Unknown ids are an error, not ignored.
    pub fn mask_of<'a>(&self, ids: impl IntoIterator<Item = &'a P>) -> Result<M, WfcError>
    where
        P: 'a,
    {
        let mut mask = M::EMPTY;
        for id in ids {
            let bit = self
                .bit_of(id)
                .ok_or_else(|| WfcError::UnknownPattern(format!("{id:?}")))?;
            mask |= M::bit(bit);
        }
        Ok(mask)
    }

    /// Expand a mask back into pattern ids. Inspection only.
    pub fn patterns_of(&self, mask: M) -> BTreeSet<P> {
        mask.iter_bits()
            .filter_map(|bit| self.ids.get(bit as usize).cloned())
            .collect()
    }
}

/// Compute a deterministic hash of a pattern table.
///
/// Ids are hashed in bit order (order changes the compiled masks), neighbor
/// sets in sorted order, weights by their bit pattern.
pub fn compute_rule_hash<P: Hash + Ord + Clone + Debug>(table: &PatternTable<P>) -> u64 {
    let mut hasher = DefaultHasher::new();
    table.len().hash(&mut hasher);
    for (id, pattern) in table.iter() {
        id.hash(&mut hasher);
        pattern.weight.to_bits().hash(&mut hasher);
        for dir in ALL_DIRECTIONS {
            (dir as u8).hash(&mut hasher);
            for neighbor in pattern.allowed(dir) {
                neighbor.hash(&mut hasher);
            }
            // separator so {a}{b} and {a,b}{} differ
            u8::MAX.hash(&mut hasher);
        }
    }
    hasher.finish()
}

/// Compile a pattern table for mask type `M`.
///
/// Fails fast on an empty table, a table wider than `M::BITS`, or a neighbor
/// reference to an unregistered id. A pair declared in only one direction is
/// dropped (both sides must agree) and logged.
pub fn compile<P, M>(table: &PatternTable<P>) -> Result<CompiledRules<P, M>, WfcError>
where
    P: Clone + Eq + Hash + Ord + Debug,
    M: PatternMask,
{
    if table.is_empty() {
        return Err(WfcError::EmptyPatternSet);
    }
    if table.len() > M::BITS as usize {
        return Err(WfcError::TooManyPatterns {
            count: table.len(),
            capacity: M::BITS,
        });
    }

    let ids: Vec<P> = table.ids().cloned().collect();
    let bits: HashMap<P, u32> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.clone(), i as u32))
        .collect();

    for (id, pattern) in table.iter() {
        for dir in ALL_DIRECTIONS {
            for neighbor in pattern.allowed(dir) {
                if !bits.contains_key(neighbor) {
                    log::debug!("pattern {id:?} allows unknown neighbor {neighbor:?} ({dir:?})");
                    return Err(WfcError::UnknownPattern(format!("{neighbor:?}")));
                }
            }
        }
    }

    let patterns: Vec<_> = table.iter().map(|(_, p)| p).collect();
    let mut neighbor_masks = vec![[M::EMPTY; DIRECTION_COUNT]; ids.len()];
    let mut one_sided = 0usize;
    for (a, pattern) in patterns.iter().enumerate() {
        for dir in ALL_DIRECTIONS {
            for neighbor in pattern.allowed(dir) {
                let b = bits[neighbor];
                if patterns[b as usize].allows(dir.opposite(), &ids[a]) {
                    neighbor_masks[a][dir.index()] |= M::bit(b);
                } else {
                    one_sided += 1;
                }
            }
        }
    }
    if one_sided > 0 {
        log::warn!(
            "{one_sided} neighbor declarations are one-sided and were dropped; \
             run the validator for the list"
        );
    }

    let matrix = (ids.len() as u32 <= TABLE_MAX_PATTERNS)
        .then(|| PropagationMatrix::build(&neighbor_masks));

    let weights = table.iter().map(|(_, p)| p.weight).collect();
    let rule_hash = compute_rule_hash(table);

    log::debug!(
        "compiled {} patterns into {}-bit masks ({})",
        ids.len(),
        M::BITS,
        if matrix.is_some() {
            "exhaustive matrix"
        } else {
            "runtime neighbor unions"
        }
    );

    Ok(CompiledRules {
        all_mask: M::full(ids.len() as u32),
        ids,
        bits,
        weights,
        neighbor_masks,
        matrix,
        rule_hash,
    })
}
