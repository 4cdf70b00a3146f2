//! Per-cell possibility masks and the entropy frontier.
//!
//! Every mask write goes through [`Wave::set_mask`], which keeps the
//! `collapsed` flags and the frontier heap in step with the masks.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use wavefill_core::grid::cell_index;
use wavefill_core::mask::PatternMask;

/// Result of narrowing a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Restrict {
    Unchanged,
    Shrunk,
    /// The intersection was empty. The cell was left untouched.
    Emptied,
}

pub(crate) struct Wave<M> {
    width: u32,
    height: u32,
    masks: Vec<M>,
    collapsed: Vec<bool>,
    /// Lazy min-heap of `(popcount, index)`. An entry is stale once the
    /// cell's popcount no longer matches or the cell has collapsed.
    frontier: BinaryHeap<Reverse<(u32, usize)>>,
}

impl<M: PatternMask> Wave<M> {
    pub fn new(width: u32, height: u32, all: M) -> Self {
        let cells = width as usize * height as usize;
        let mut wave = Self {
            width,
            height,
            masks: vec![all; cells],
            collapsed: vec![false; cells],
            frontier: BinaryHeap::with_capacity(cells),
        };
        wave.reset(all);
        wave
    }

    /// Every cell back to `all`. Buffers are kept.
    pub fn reset(&mut self, all: M) {
        let collapsed = all.is_collapsed();
        self.masks.fill(all);
        self.collapsed.fill(collapsed);
        self.frontier.clear();
        if !collapsed {
            let count = all.popcount();
            self.frontier
                .extend((0..self.masks.len()).map(|i| Reverse((count, i))));
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| cell_index(self.width, x, y))
    }

    pub fn coords(&self, index: usize) -> (u32, u32) {
        let w = self.width as usize;
        ((index % w) as u32, (index / w) as u32)
    }

    #[inline]
    pub fn mask(&self, index: usize) -> M {
        self.masks[index]
    }

    #[inline]
    pub fn is_collapsed(&self, index: usize) -> bool {
        self.collapsed[index]
    }

    pub fn masks(&self) -> &[M] {
        &self.masks
    }

    /// Overwrite a cell's mask.
    #[inline]
    pub fn set_mask(&mut self, index: usize, mask: M) {
        self.masks[index] = mask;
        let count = mask.popcount();
        self.collapsed[index] = count == 1;
        if count > 1 {
            self.frontier.push(Reverse((count, index)));
        }
    }

    /// AND `allowed` into a cell.
    #[inline]
    pub fn restrict(&mut self, index: usize, allowed: M) -> Restrict {
        let old = self.masks[index];
        let new = old & allowed;
        if new == old {
            Restrict::Unchanged
        } else if new.is_empty() {
            Restrict::Emptied
        } else {
            self.set_mask(index, new);
            Restrict::Shrunk
        }
    }

    /// Pop the uncollapsed cell with the fewest possibilities, lowest
    /// row-major index first. `None` once every cell has collapsed.
    pub fn pop_min_entropy(&mut self) -> Option<usize> {
        while let Some(Reverse((count, index))) = self.frontier.pop() {
            if !self.collapsed[index] && self.masks[index].popcount() == count {
                return Some(index);
            }
        }
        None
    }
}
