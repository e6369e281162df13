//! Column set and record membership
//!
//! This module provides:
//! - SearchIndex owning the named columns of one search
//! - ItemFingerprint, the per-column membership of one record
//! - Holder counting so values shared by several records survive the
//!   removal of any one of them
//!
//! # Membership
//!
//! Positions are allocated per column, so a record's membership is one
//! [`BitField`] per declared column (in declaration order) rather than a
//! single field: the same position number means different values in
//! different columns.

use crate::column::SearchIndexColumn;
use crate::source::{ColumnSource, Getter};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use sift_core::{BitField, BitPosition, Normalizer, Result, SiftError};
use std::fmt;

// ============================================================================
// ItemFingerprint
// ============================================================================

/// Per-column membership of one record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFingerprint {
    fields: Vec<BitField>,
}

impl ItemFingerprint {
    /// Field for the column at `ordinal`
    pub fn field(&self, ordinal: usize) -> Option<&BitField> {
        self.fields.get(ordinal)
    }

    /// Check whether the record carries the value at `position` in a column
    pub fn contains(&self, ordinal: usize, position: BitPosition) -> bool {
        self.field(ordinal)
            .map(|f| f.contains(position))
            .unwrap_or(false)
    }

    /// Total number of distinct values across all columns
    pub fn combined_len(&self) -> usize {
        self.fields.iter().map(BitField::len).sum()
    }

    /// Iterate per-column fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &BitField> + '_ {
        self.fields.iter()
    }
}

// ============================================================================
// SearchIndex
// ============================================================================

struct IndexedColumn<T> {
    column: SearchIndexColumn,
    getter: Getter<T>,
    /// Position -> number of indexed records carrying it
    holders: FxHashMap<BitPosition, u32>,
}

/// Named columns plus the record indexing function
pub struct SearchIndex<T> {
    columns: IndexMap<String, IndexedColumn<T>>,
}

impl<T> Default for SearchIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SearchIndex<T> {
    /// Create an index with no columns
    pub fn new() -> Self {
        SearchIndex {
            columns: IndexMap::new(),
        }
    }

    /// Declare a column fed by `source`
    ///
    /// Fails if `name` is already declared.
    pub fn declare(
        &mut self,
        name: &str,
        source: ColumnSource<T>,
        normalizer: Normalizer,
    ) -> Result<&mut SearchIndexColumn> {
        if self.columns.contains_key(name) {
            return Err(SiftError::DuplicateColumn {
                name: name.to_string(),
            });
        }
        let entry = self.columns.entry(name.to_string()).or_insert(IndexedColumn {
            column: SearchIndexColumn::with_normalizer(normalizer),
            getter: source.into_getter(),
            holders: FxHashMap::default(),
        });
        Ok(&mut entry.column)
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&SearchIndexColumn> {
        self.columns.get(name).map(|c| &c.column)
    }

    /// Declaration ordinal of a column
    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.columns.get_index_of(name)
    }

    /// Look up a column and its ordinal, failing on unknown names
    pub fn resolve(&self, name: &str) -> Result<(usize, &SearchIndexColumn)> {
        self.columns
            .get_full(name)
            .map(|(ordinal, _, c)| (ordinal, &c.column))
            .ok_or_else(|| SiftError::UnknownColumn {
                name: name.to_string(),
            })
    }

    /// Column names in declaration order
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.keys().map(String::as_str)
    }

    /// Number of declared columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Add a record's values to every column and return its membership
    pub fn index_item(&mut self, record: &T) -> ItemFingerprint {
        let mut fields = Vec::with_capacity(self.columns.len());
        for indexed in self.columns.values_mut() {
            let mut field = BitField::empty();
            for value in (indexed.getter)(record) {
                let position = indexed.column.add(&value);
                if !field.contains(position) {
                    field.insert(position);
                    *indexed.holders.entry(position).or_insert(0) += 1;
                }
            }
            fields.push(field);
        }
        ItemFingerprint { fields }
    }

    /// Release a record's membership
    ///
    /// Values no other record carries are deleted from their column and
    /// their positions relinquished.
    pub fn unindex_item(&mut self, fingerprint: &ItemFingerprint) {
        for (indexed, field) in self.columns.values_mut().zip(fingerprint.fields.iter()) {
            for position in field.positions() {
                let count = indexed.holders.get_mut(&position);
                let remaining = match count {
                    Some(count) => {
                        *count -= 1;
                        *count
                    }
                    None => panic!("released {} which no record holds", position),
                };
                if remaining > 0 {
                    continue;
                }
                indexed.holders.remove(&position);
                let key = indexed
                    .column
                    .release(position)
                    .unwrap_or_else(|| panic!("held {} has no key", position));
                tracing::trace!(
                    target: "sift::index",
                    position = position.as_u32(),
                    key = %key,
                    "Released column value"
                );
            }
        }
    }

    /// Number of indexed records holding the value at `position` in a column
    pub fn holders(&self, ordinal: usize, position: BitPosition) -> u32 {
        self.columns
            .get_index(ordinal)
            .and_then(|(_, c)| c.holders.get(&position).copied())
            .unwrap_or(0)
    }
}

impl<T> fmt::Debug for SearchIndex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, indexed) in &self.columns {
            map.entry(name, &indexed.column.len());
        }
        map.finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
