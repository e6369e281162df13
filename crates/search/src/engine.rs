//! Query engine
//!
//! This module provides:
//! - Search, the mutable engine holding indexed items
//! - SealedSearch, its structurally read-only form
//! - SearchItem, the record wrapper (value, precomputed sort data, metadata)
//! - SearchResults / SearchHit / QueryStats
//!
//! # Query Flow
//!
//! ```text
//! Query ──normalize, prune──► leaves ──condition per column──► (field, scores)
//!                                                        │
//!        items ── fingerprint[column] AND field ◄────────┘
//!                        │
//!                        ▼
//!         score per item (All: sum, Any: max)
//!                        │
//!                        ▼
//!     stable sort: score desc, then comparator ──► ranks, truncation
//! ```
//!
//! Each leaf runs its condition once over the column's keys; items are then
//! tested by intersecting their per-column fingerprint with the leaf's
//! matching field, so record values are never re-read at query time.

use crate::column::SearchIndexColumn;
use crate::condition::{Condition, ScoreBuffer};
use crate::config::SearchOptions;
use crate::index::{ItemFingerprint, SearchIndex};
use crate::query::Query;
use crate::sort::{Computed, Ranked, SharedComparator};
use serde::Serialize;
use sift_core::{BitField, Result, SiftError};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Per-item metadata generator
pub type MetadataFn<T, M> = Arc<dyn Fn(&T) -> M + Send + Sync>;

// ============================================================================
// SearchItem
// ============================================================================

/// One indexed record
#[derive(Debug)]
pub struct SearchItem<T, M = ()> {
    /// The record
    pub value: T,
    /// Data precomputed by the active sort rules
    pub computed: Computed,
    /// Caller-attached metadata
    pub metadata: M,
    fingerprint: ItemFingerprint,
}

impl<T, M> SearchItem<T, M> {
    /// Per-column membership of this record
    pub fn fingerprint(&self) -> &ItemFingerprint {
        &self.fingerprint
    }

    fn ranked(&self) -> Ranked<'_, T> {
        Ranked::new(&self.value, &self.computed)
    }
}

// ============================================================================
// Results
// ============================================================================

/// Query execution statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueryStats {
    /// Time spent in the query
    pub elapsed_micros: u64,
    /// Number of items tested against the query
    pub candidates_considered: usize,
}

/// One ranked match
#[derive(Debug)]
pub struct SearchHit<'s, T, M = ()> {
    /// The matched item
    pub item: &'s SearchItem<T, M>,
    /// Position of the item in the search's item list
    pub index: usize,
    /// Match score (0.0 for unfiltered results)
    pub score: f32,
    /// 1-based rank
    pub rank: u32,
}

impl<T, M> Clone for SearchHit<'_, T, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, M> Copy for SearchHit<'_, T, M> {}

impl<'s, T, M> SearchHit<'s, T, M> {
    /// The matched record
    pub fn value(&self) -> &'s T {
        &self.item.value
    }
}

/// Ranked query output
#[derive(Debug)]
pub struct SearchResults<'s, T, M = ()> {
    /// Hits in rank order
    pub hits: Vec<SearchHit<'s, T, M>>,
    /// Whether hits were dropped by `max_results`
    pub truncated: bool,
    /// Execution statistics
    pub stats: QueryStats,
}

impl<'s, T, M> SearchResults<'s, T, M> {
    /// Number of hits
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Check if nothing matched
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Matched records in rank order
    pub fn values(&self) -> impl Iterator<Item = &'s T> + '_ {
        self.hits.iter().map(|h| h.value())
    }

    /// Iterate hits in rank order
    pub fn iter(&self) -> std::slice::Iter<'_, SearchHit<'s, T, M>> {
        self.hits.iter()
    }
}

// ============================================================================
// Query plan
// ============================================================================

/// Pruned query with every leaf's condition already evaluated
enum Plan {
    Leaf {
        ordinal: usize,
        matched: BitField,
        scores: ScoreBuffer,
    },
    All(Vec<Plan>),
    Any(Vec<Plan>),
}

impl Plan {
    /// Resolve and evaluate every leaf
    ///
    /// Leaves whose text normalizes to "" filter nothing and are dropped,
    /// as are combinators left without children. Returns None when the
    /// whole query drops out.
    fn compile<T>(index: &SearchIndex<T>, query: &Query) -> Result<Option<Plan>> {
        Ok(match query {
            Query::Match(leaf) => {
                let (ordinal, column) = index.resolve(&leaf.column)?;
                let text = column.normalize(&leaf.text);
                if text.is_empty() {
                    return Ok(None);
                }
                let mut scores = ScoreBuffer::with_len(column.domain_size());
                let matched = leaf.condition.evaluate(column, &text, &mut scores);
                Some(Plan::Leaf {
                    ordinal,
                    matched,
                    scores,
                })
            }
            Query::All(children) => Plan::compile_children(index, children)?.map(Plan::All),
            Query::Any(children) => Plan::compile_children(index, children)?.map(Plan::Any),
        })
    }

    fn compile_children<T>(index: &SearchIndex<T>, children: &[Query]) -> Result<Option<Vec<Plan>>> {
        let mut kept = Vec::with_capacity(children.len());
        for child in children {
            if let Some(plan) = Plan::compile(index, child)? {
                kept.push(plan);
            }
        }
        Ok((!kept.is_empty()).then_some(kept))
    }

    /// Score of a record, or None if it does not match
    fn score(&self, fingerprint: &ItemFingerprint) -> Option<f32> {
        match self {
            Plan::Leaf {
                ordinal,
                matched,
                scores,
            } => {
                let field = fingerprint.field(*ordinal)?;
                field
                    .positions()
                    .filter(|p| matched.contains(*p))
                    .map(|p| scores.get(p))
                    .reduce(f32::max)
            }
            Plan::All(children) => children
                .iter()
                .try_fold(0.0, |total, c| c.score(fingerprint).map(|s| total + s)),
            Plan::Any(children) => children
                .iter()
                .filter_map(|c| c.score(fingerprint))
                .reduce(f32::max),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            Plan::Leaf { .. } => 1,
            Plan::All(children) | Plan::Any(children) => {
                children.iter().map(Plan::leaf_count).sum()
            }
        }
    }
}

// ============================================================================
// Search
// ============================================================================

/// Search engine over a collection of records
///
/// Holds the column index, the wrapped items and the active sort rule.
/// Items can be added, removed and replaced; every change keeps column
/// positions and item fingerprints consistent.
pub struct Search<T, M = ()> {
    index: SearchIndex<T>,
    items: Vec<SearchItem<T, M>>,
    comparator: Option<SharedComparator<T>>,
    metadata: MetadataFn<T, M>,
    options: SearchOptions,
}

impl<T, M> Search<T, M> {
    /// Create an empty search over a declared column set
    pub fn new(
        index: SearchIndex<T>,
        metadata: MetadataFn<T, M>,
        comparator: Option<SharedComparator<T>>,
        options: SearchOptions,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Search {
            index,
            items: Vec::new(),
            comparator,
            metadata,
            options,
        })
    }

    // ------------------------------------------------------------------------
    // Churn
    // ------------------------------------------------------------------------

    /// Index and append records
    pub fn add_items<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in values {
            let item = self.wrap(value);
            self.items.push(item);
        }
    }

    /// Remove the item at `index`, returning its record
    ///
    /// Later items shift down by one.
    pub fn remove(&mut self, index: usize) -> Result<T> {
        self.check_bounds(index)?;
        let item = self.items.remove(index);
        self.index.unindex_item(&item.fingerprint);
        Ok(item.value)
    }

    /// Remove every item whose record satisfies `predicate`
    ///
    /// Returns the removed records in their previous order.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut kept = Vec::with_capacity(self.items.len());
        let mut removed = Vec::new();
        for item in self.items.drain(..) {
            if predicate(&item.value) {
                removed.push(item);
            } else {
                kept.push(item);
            }
        }
        self.items = kept;

        for item in &removed {
            self.index.unindex_item(&item.fingerprint);
        }
        removed.into_iter().map(|item| item.value).collect()
    }

    /// Replace the record at `index`, returning the previous one
    ///
    /// Metadata and precomputed data are regenerated for the new record.
    pub fn replace(&mut self, index: usize, value: T) -> Result<T> {
        self.check_bounds(index)?;
        // Index the new record before releasing the old one so values they
        // share keep their positions
        let item = self.wrap(value);
        let old = std::mem::replace(&mut self.items[index], item);
        self.index.unindex_item(&old.fingerprint);
        Ok(old.value)
    }

    /// Replace the sort rule and recompute every item's precomputed data
    pub fn set_sorting(&mut self, comparator: Option<SharedComparator<T>>) {
        let started = Instant::now();
        self.comparator = comparator;
        for item in &mut self.items {
            item.computed = precompute(self.comparator.as_ref(), &item.value);
        }
        tracing::debug!(
            target: "sift::search",
            rule = self.comparator.as_ref().map(|c| c.name()).unwrap_or("none"),
            items = self.items.len(),
            elapsed_micros = started.elapsed().as_micros() as u64,
            "Replaced sort rule"
        );
    }

    /// Replace the query options
    pub fn set_options(&mut self, options: SearchOptions) -> Result<()> {
        options.validate()?;
        self.options = options;
        Ok(())
    }

    /// Mutable access to one item's metadata
    pub fn metadata_mut(&mut self, index: usize) -> Option<&mut M> {
        self.items.get_mut(index).map(|item| &mut item.metadata)
    }

    /// Freeze the item list and column set
    pub fn seal(self) -> SealedSearch<T, M> {
        SealedSearch { inner: self }
    }

    fn wrap(&mut self, value: T) -> SearchItem<T, M> {
        let fingerprint = self.index.index_item(&value);
        SearchItem {
            computed: precompute(self.comparator.as_ref(), &value),
            metadata: (self.metadata)(&value),
            value,
            fingerprint,
        }
    }

    fn check_bounds(&self, index: usize) -> Result<()> {
        if index >= self.items.len() {
            return Err(SiftError::ItemOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Run a query
    ///
    /// Every column the query names must be declared, including columns of
    /// empty-text matches. Query text is normalized by its column first; a
    /// query with nothing left to filter on returns all items or none
    /// depending on `reset_to_all`.
    pub fn query(&self, query: &Query) -> Result<SearchResults<'_, T, M>> {
        let started = Instant::now();

        // Compiling resolves every leaf, so unknown columns fail even when
        // their text is empty
        let (scored, leaves, candidates): (Vec<(usize, f32)>, usize, usize) =
            match Plan::compile(&self.index, query)? {
                None if self.options.reset_to_all => {
                    ((0..self.items.len()).map(|i| (i, 0.0)).collect(), 0, 0)
                }
                None => (Vec::new(), 0, 0),
                Some(plan) => {
                    let scored = self
                        .items
                        .iter()
                        .enumerate()
                        .filter_map(|(i, item)| plan.score(&item.fingerprint).map(|s| (i, s)))
                        .collect();
                    (scored, plan.leaf_count(), self.items.len())
                }
            };

        let results = self.rank(scored, started, candidates);
        tracing::trace!(
            target: "sift::search",
            leaves,
            candidates,
            hits = results.hits.len(),
            truncated = results.truncated,
            "Query executed"
        );
        Ok(results)
    }

    /// Match one column
    pub fn search_column(
        &self,
        column: &str,
        condition: Condition,
        text: &str,
    ) -> Result<SearchResults<'_, T, M>> {
        self.query(&Query::column(column, condition, text))
    }

    fn rank(
        &self,
        mut scored: Vec<(usize, f32)>,
        started: Instant,
        candidates: usize,
    ) -> SearchResults<'_, T, M> {
        // sort_by is stable: full ties keep item order
        scored.sort_by(|&(ia, sa), &(ib, sb)| {
            sb.total_cmp(&sa).then_with(|| match &self.comparator {
                Some(c) => c.compare(self.items[ia].ranked(), self.items[ib].ranked()),
                None => std::cmp::Ordering::Equal,
            })
        });

        let mut truncated = false;
        if let Some(limit) = self.options.max_results {
            truncated = scored.len() > limit;
            scored.truncate(limit);
        }

        let hits = scored
            .into_iter()
            .enumerate()
            .map(|(rank, (index, score))| SearchHit {
                item: &self.items[index],
                index,
                score,
                rank: (rank + 1) as u32,
            })
            .collect();

        SearchResults {
            hits,
            truncated,
            stats: QueryStats {
                elapsed_micros: started.elapsed().as_micros() as u64,
                candidates_considered: candidates,
            },
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Items in insertion order
    pub fn items(&self) -> &[SearchItem<T, M>] {
        &self.items
    }

    /// Item at `index`
    pub fn get(&self, index: usize) -> Option<&SearchItem<T, M>> {
        self.items.get(index)
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if there are no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current query options
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Declared column names in declaration order
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.index.column_names()
    }

    /// Look up a column
    pub fn column(&self, name: &str) -> Option<&SearchIndexColumn> {
        self.index.column(name)
    }

    /// The column index
    pub fn index(&self) -> &SearchIndex<T> {
        &self.index
    }
}

fn precompute<T>(comparator: Option<&SharedComparator<T>>, value: &T) -> Computed {
    comparator
        .and_then(|c| c.precompute(value))
        .unwrap_or_default()
}

impl<T, M> fmt::Debug for Search<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Search")
            .field("columns", &self.index)
            .field("items", &self.items.len())
            .field("sorting", &self.comparator.as_ref().map(|c| c.name()))
            .field("options", &self.options)
            .finish()
    }
}

// ============================================================================
// SealedSearch
// ============================================================================

/// A built search whose items and columns no longer change
///
/// Queries never mutate index state. Item metadata may still be edited and
/// the sort rule replaced.
pub struct SealedSearch<T, M = ()> {
    inner: Search<T, M>,
}

impl<T, M> SealedSearch<T, M> {
    /// Run a query
    pub fn query(&self, query: &Query) -> Result<SearchResults<'_, T, M>> {
        self.inner.query(query)
    }

    /// Match one column
    pub fn search_column(
        &self,
        column: &str,
        condition: Condition,
        text: &str,
    ) -> Result<SearchResults<'_, T, M>> {
        self.inner.search_column(column, condition, text)
    }

    /// Items in insertion order
    pub fn items(&self) -> &[SearchItem<T, M>] {
        self.inner.items()
    }

    /// Item at `index`
    pub fn get(&self, index: usize) -> Option<&SearchItem<T, M>> {
        self.inner.get(index)
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if there are no items
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Mutable access to one item's metadata
    pub fn metadata_mut(&mut self, index: usize) -> Option<&mut M> {
        self.inner.metadata_mut(index)
    }

    /// Replace the sort rule and recompute precomputed data
    pub fn set_sorting(&mut self, comparator: Option<SharedComparator<T>>) {
        self.inner.set_sorting(comparator)
    }

    /// Current query options
    pub fn options(&self) -> &SearchOptions {
        self.inner.options()
    }

    /// Declared column names in declaration order
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.inner.column_names()
    }

    /// Look up a column
    pub fn column(&self, name: &str) -> Option<&SearchIndexColumn> {
        self.inner.column(name)
    }
}

impl<T, M> fmt::Debug for SealedSearch<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SealedSearch").field(&self.inner).finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
