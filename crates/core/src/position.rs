//! Bit position identifiers
//!
//! A [`BitPosition`] names one slot in a column's value domain. Positions
//! are handed out by [`BitPositionRegistry`](crate::BitPositionRegistry)
//! and are only unique among the positions a registry currently holds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of bits stored per [`BitField`](crate::BitField) word
pub(crate) const WORD_BITS: usize = u64::BITS as usize;

/// Slot identifier within a single column's domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BitPosition(u32);

impl BitPosition {
    /// Create a position from its raw index
    pub const fn new(raw: u32) -> Self {
        BitPosition(raw)
    }

    /// Raw index
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Raw index as `usize`, for buffer and word addressing
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Index of the word holding this position
    pub(crate) const fn word(self) -> usize {
        self.as_usize() / WORD_BITS
    }

    /// Mask selecting this position within its word
    pub(crate) const fn mask(self) -> u64 {
        1u64 << (self.as_usize() % WORD_BITS)
    }
}

impl From<u32> for BitPosition {
    fn from(raw: u32) -> Self {
        BitPosition(raw)
    }
}

impl fmt::Display for BitPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
