//! Bit position allocation
//!
//! [`BitPositionRegistry`] hands out [`BitPosition`]s for one column's
//! domain and recycles relinquished ones so field widths stay compact under
//! insert/delete churn.
//!
//! # Invariants
//!
//! - A position is never held by two live claims at the same time
//! - Freed positions are reused (most recently relinquished first) before
//!   the high-water mark grows
//! - Relinquishing a position that is not held panics: it means the owning
//!   column lost track of its keys

use crate::position::BitPosition;

/// Allocator of bit positions for a single column
#[derive(Debug, Clone, Default)]
pub struct BitPositionRegistry {
    /// Relinquished positions, reused LIFO
    free: Vec<BitPosition>,

    /// Next never-issued position
    next: u32,

    /// held[p] is true while position p is claimed
    held: Vec<bool>,
}

impl BitPositionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a position not currently held by anyone else
    pub fn claim(&mut self) -> BitPosition {
        let position = match self.free.pop() {
            Some(position) => position,
            None => {
                assert!(self.next < u32::MAX, "bit position registry exhausted");
                let position = BitPosition::new(self.next);
                self.next += 1;
                self.held.push(false);
                position
            }
        };
        self.held[position.as_usize()] = true;
        position
    }

    /// Return a claimed position to the pool
    ///
    /// # Panics
    ///
    /// Panics if `position` is not currently claimed.
    pub fn relinquish(&mut self, position: BitPosition) {
        assert!(
            self.is_claimed(position),
            "relinquished bit position {} that is not claimed",
            position
        );
        self.held[position.as_usize()] = false;
        self.free.push(position);
    }

    /// Check whether a position is currently claimed
    pub fn is_claimed(&self, position: BitPosition) -> bool {
        self.held
            .get(position.as_usize())
            .copied()
            .unwrap_or(false)
    }

    /// Number of positions ever issued; every live position is below this
    pub fn high_water_mark(&self) -> usize {
        self.next as usize
    }

    /// Number of positions currently claimed
    pub fn live(&self) -> usize {
        self.high_water_mark() - self.free.len()
    }

    /// Number of positions waiting for reuse
    pub fn free(&self) -> usize {
        self.free.len()
    }
}
