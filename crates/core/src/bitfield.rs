//! Arbitrary-width bit sets
//!
//! [`BitField`] is a set of [`BitPosition`]s stored as a growable word
//! array. Column domains are unbounded, so positions beyond 63 must not be
//! truncated into a single machine word.
//!
//! # Invariants
//!
//! - The word array never ends with a zero word, so the empty set has no
//!   words and structural equality is set equality.

use crate::position::{BitPosition, WORD_BITS};
use smallvec::SmallVec;
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Inline capacity covers the first 128 positions without allocating
type Words = SmallVec<[u64; 2]>;

/// Set of bit positions with union and intersection
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BitField {
    words: Words,
}

impl BitField {
    /// The empty set
    pub fn empty() -> Self {
        BitField::default()
    }

    /// Field with only `position` set
    pub fn from_position(position: BitPosition) -> Self {
        let mut words = Words::from_elem(0, position.word() + 1);
        words[position.word()] = position.mask();
        BitField { words }
    }

    /// Union of two fields
    pub fn or(a: &BitField, b: &BitField) -> BitField {
        let (long, short) = if a.words.len() >= b.words.len() {
            (a, b)
        } else {
            (b, a)
        };
        let mut out = long.clone();
        for (dst, src) in out.words.iter_mut().zip(short.words.iter()) {
            *dst |= *src;
        }
        out
    }

    /// Intersection of two fields
    pub fn and(a: &BitField, b: &BitField) -> BitField {
        let mut words: Words = a
            .words
            .iter()
            .zip(b.words.iter())
            .map(|(x, y)| x & y)
            .collect();
        trim(&mut words);
        BitField { words }
    }

    /// In-place union
    pub fn union_with(&mut self, other: &BitField) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (dst, src) in self.words.iter_mut().zip(other.words.iter()) {
            *dst |= *src;
        }
    }

    /// Insert a single position
    pub fn insert(&mut self, position: BitPosition) {
        let word = position.word();
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= position.mask();
    }

    /// Check membership of a position
    pub fn contains(&self, position: BitPosition) -> bool {
        self.words
            .get(position.word())
            .map(|w| w & position.mask() != 0)
            .unwrap_or(false)
    }

    /// Check whether the two fields share any position
    pub fn intersects(&self, other: &BitField) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .any(|(x, y)| x & y != 0)
    }

    /// Check if the field is the empty set
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of positions in the set
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterate member positions in ascending order
    pub fn positions(&self) -> Positions<'_> {
        Positions {
            words: &self.words,
            index: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }
}

fn trim(words: &mut Words) {
    while words.last() == Some(&0) {
        words.pop();
    }
}

impl BitOr for &BitField {
    type Output = BitField;

    fn bitor(self, rhs: &BitField) -> BitField {
        BitField::or(self, rhs)
    }
}

impl BitOrAssign<&BitField> for BitField {
    fn bitor_assign(&mut self, rhs: &BitField) {
        self.union_with(rhs);
    }
}

impl BitAnd for &BitField {
    type Output = BitField;

    fn bitand(self, rhs: &BitField) -> BitField {
        BitField::and(self, rhs)
    }
}

impl FromIterator<BitPosition> for BitField {
    fn from_iter<I: IntoIterator<Item = BitPosition>>(iter: I) -> Self {
        let mut field = BitField::empty();
        for position in iter {
            field.insert(position);
        }
        field
    }
}

impl fmt::Debug for BitField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.positions().map(BitPosition::as_u32))
            .finish()
    }
}

/// Ascending iterator over the positions of a [`BitField`]
pub struct Positions<'a> {
    words: &'a [u64],
    index: usize,
    current: u64,
}

impl Iterator for Positions<'_> {
    type Item = BitPosition;

    fn next(&mut self) -> Option<BitPosition> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(BitPosition::new((self.index * WORD_BITS + bit) as u32));
            }
            self.index += 1;
            self.current = *self.words.get(self.index)?;
        }
    }
}
