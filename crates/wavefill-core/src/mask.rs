//! Fixed-width possibility masks.
//!
//! Bit `b` of a mask is set while the pattern registered at bit `b` is still
//! possible. The mask width bounds how many patterns one solve can hold, and
//! is chosen at compile time by picking the mask type.

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

/// Population count of every byte value, computed at compile time.
pub const BYTE_POPCOUNT: [u8; 256] = build_byte_popcount();

const fn build_byte_popcount() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 1;
    while i < 256 {
        table[i] = (i & 1) as u8 + table[i >> 1];
        i += 1;
    }
    table
}

/// An unsigned integer used as a set of pattern bits.
pub trait PatternMask:
    Copy
    + Eq
    + Hash
    + Default
    + Debug
    + Send
    + Sync
    + 'static
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitAndAssign
    + BitOrAssign
    + Not<Output = Self>
{
    /// Number of patterns this mask can represent.
    const BITS: u32;
    /// The mask with no bits set (a contradiction when stored in a cell).
    const EMPTY: Self;

    /// Mask with only `index` set.
    fn bit(index: u32) -> Self;
    /// Mask with the low `count` bits set.
    fn full(count: u32) -> Self;
    /// Number of set bits, summed from `BYTE_POPCOUNT`.
    fn popcount(self) -> u32;
    /// Position of the lowest set bit.
    fn lowest_bit(self) -> Option<u32>;
    /// The mask as a table index. Only meaningful for masks below `2^usize::BITS`.
    fn as_index(self) -> usize;
    /// The mask with its lowest set bit cleared.
    fn without_lowest(self) -> Self;

    fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    /// Exactly one pattern remains.
    fn is_collapsed(self) -> bool {
        self.popcount() == 1
    }

    fn contains(self, index: u32) -> bool {
        self & Self::bit(index) != Self::EMPTY
    }

    /// Iterate set bit positions from lowest to highest.
    fn iter_bits(self) -> BitIter<Self> {
        BitIter { remaining: self }
    }
}

/// Iterator over the set bit positions of a mask, ascending.
#[derive(Debug, Clone)]
pub struct BitIter<M> {
    remaining: M,
}

impl<M: PatternMask> Iterator for BitIter<M> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let bit = self.remaining.lowest_bit()?;
        self.remaining = self.remaining.without_lowest();
        Some(bit)
    }
}

macro_rules! impl_pattern_mask {
    ($($ty:ty),* $(,)?) => {$(
        impl PatternMask for $ty {
            const BITS: u32 = <$ty>::BITS;
            const EMPTY: Self = 0;

            #[inline]
            fn bit(index: u32) -> Self {
                1 << index
            }

            #[inline]
            fn full(count: u32) -> Self {
                if count >= <$ty>::BITS {
                    <$ty>::MAX
                } else {
                    (1 << count) - 1
                }
            }

            #[inline]
            fn popcount(self) -> u32 {
                self.to_le_bytes()
                    .iter()
                    .map(|&b| BYTE_POPCOUNT[b as usize] as u32)
                    .sum()
            }

            #[inline]
            fn lowest_bit(self) -> Option<u32> {
                if self == 0 {
                    None
                } else {
                    Some(self.trailing_zeros())
                }
            }

            #[inline]
            fn as_index(self) -> usize {
                self as usize
            }

            #[inline]
            fn without_lowest(self) -> Self {
                self & self.wrapping_sub(1)
            }
        }
    )*};
}

impl_pattern_mask!(u8, u16, u32, u64);
