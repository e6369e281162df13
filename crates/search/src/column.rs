//! Searchable columns
//!
//! A [`SearchIndexColumn`] maps the distinct, normalized values of one
//! record field to bit positions drawn from the column's own
//! [`BitPositionRegistry`].
//!
//! # Invariants
//!
//! - Each live key maps to exactly one claimed position and back
//! - `len()` equals the number of live keys
//! - Iteration yields live `(key, position)` pairs in insertion order; a
//!   deleted and re-added key appears in its new slot
//! - Every public method normalizes its argument first

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use sift_core::{BitField, BitPosition, BitPositionRegistry, Normalizer};

/// Normalized key to bit position mapping for one field
#[derive(Debug, Clone, Default)]
pub struct SearchIndexColumn {
    /// Key -> position, in insertion order
    keys: IndexMap<String, BitPosition>,

    /// Position -> key, for resolving fields back to values
    positions: FxHashMap<BitPosition, String>,

    /// Position allocator for this column's domain
    registry: BitPositionRegistry,

    /// Applied to every key and query
    normalizer: Normalizer,
}

impl SearchIndexColumn {
    /// Create an empty column with identity normalization
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty column with the given normalization
    pub fn with_normalizer(normalizer: Normalizer) -> Self {
        SearchIndexColumn {
            normalizer,
            ..Self::default()
        }
    }

    /// Normalize a raw key the way this column stores it
    pub fn normalize(&self, raw: &str) -> String {
        self.normalizer.apply(raw).into_owned()
    }

    /// The column's normalizer
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Add a key, claiming a position if it is new
    ///
    /// Returns the key's position either way.
    pub fn add(&mut self, raw: &str) -> BitPosition {
        let key = self.normalizer.apply(raw);
        if let Some(&position) = self.keys.get(key.as_ref()) {
            return position;
        }

        let key = key.into_owned();
        let position = self.registry.claim();
        self.positions.insert(position, key.clone());
        self.keys.insert(key, position);
        position
    }

    /// Delete a key, relinquishing its position
    ///
    /// Returns the released position, or None if the key was absent.
    pub fn delete(&mut self, raw: &str) -> Option<BitPosition> {
        let key = self.normalizer.apply(raw);
        let position = self.keys.shift_remove(key.as_ref())?;
        let stored = self.positions.remove(&position);
        assert!(
            stored.is_some(),
            "column key {:?} mapped to {} without a reverse entry",
            key,
            position
        );
        self.registry.relinquish(position);
        Some(position)
    }

    /// Delete the key stored at `position`, returning it
    ///
    /// Used when releasing record membership: the stored key is already
    /// normalized and must not be normalized again.
    pub(crate) fn release(&mut self, position: BitPosition) -> Option<String> {
        let key = self.positions.remove(&position)?;
        let removed = self.keys.shift_remove(&key);
        assert_eq!(
            removed,
            Some(position),
            "column key {:?} and {} disagree",
            key,
            position
        );
        self.registry.relinquish(position);
        Some(key)
    }

    /// Look up the position of a key
    pub fn get(&self, raw: &str) -> Option<BitPosition> {
        let key = self.normalizer.apply(raw);
        self.keys.get(key.as_ref()).copied()
    }

    /// Check whether a key is present
    pub fn contains(&self, raw: &str) -> bool {
        self.get(raw).is_some()
    }

    /// Resolve a position back to its stored key
    pub fn key_at(&self, position: BitPosition) -> Option<&str> {
        self.positions.get(&position).map(String::as_str)
    }

    /// Field of the position holding a key, or empty
    pub fn field_of(&self, raw: &str) -> BitField {
        self.get(raw)
            .map(BitField::from_position)
            .unwrap_or_default()
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if the column has no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Upper bound (exclusive) of every live position
    ///
    /// Score buffers sized to this can be indexed by any live position.
    pub fn domain_size(&self) -> usize {
        self.registry.high_water_mark()
    }

    /// Iterate live `(key, position)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, BitPosition)> + '_ {
        self.keys.iter().map(|(k, &p)| (k.as_str(), p))
    }

    /// The column's registry (read-only)
    pub fn registry(&self) -> &BitPositionRegistry {
        &self.registry
    }
}

impl<'a> IntoIterator for &'a SearchIndexColumn {
    type Item = (&'a str, BitPosition);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, BitPosition)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
