//! Search builder
//!
//! [`SearchFactory`] records column declarations, metadata generation, sort
//! rules and options, then builds a fresh search from them on every
//! [`SearchFactory::build`] call.
//!
//! # Example
//!
//! ```ignore
//! use sift_search::{compare_id, Query, SearchFactory};
//!
//! let search = SearchFactory::new(callouts)
//!     .with_column("id", "id")
//!     .with_normalized_column("alias", ColumnSource::getter(aliases), Normalizer::Lowercase)
//!     .with_sorting(compare_id(|c: &Callout| c.id.as_str()))
//!     .with_inclusive_defaults(true)
//!     .build()?;
//!
//! let results = search.query(&Query::includes("alias", "memo"))?;
//! ```

use crate::config::SearchOptions;
use crate::engine::{MetadataFn, Search, SealedSearch};
use crate::sort::{combined_comparison, Comparator, SharedComparator};
use crate::source::ColumnSource;
use crate::index::SearchIndex;
use sift_core::{Normalizer, Result, SiftError};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

struct ColumnSpec<T> {
    name: String,
    source: ColumnSource<T>,
    normalizer: Normalizer,
}

/// Builder for [`SealedSearch`]
pub struct SearchFactory<T, M = ()> {
    items: Vec<T>,
    columns: Vec<ColumnSpec<T>>,
    duplicates: Vec<String>,
    metadata: MetadataFn<T, M>,
    sorting: Vec<SharedComparator<T>>,
    options: SearchOptions,
}

impl<T: 'static> SearchFactory<T, ()> {
    /// Start a builder over `items`
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        SearchFactory {
            items: items.into_iter().collect(),
            columns: Vec::new(),
            duplicates: Vec::new(),
            metadata: Arc::new(|_: &T| ()),
            sorting: Vec::new(),
            options: SearchOptions::default(),
        }
    }
}

impl<T: 'static, M> SearchFactory<T, M> {
    /// Declare a column with identity normalization
    ///
    /// `source` is a property name (for [`Record`](crate::Record) types) or
    /// a [`ColumnSource`].
    pub fn with_column(self, name: impl Into<String>, source: impl Into<ColumnSource<T>>) -> Self {
        self.with_normalized_column(name, source, Normalizer::Identity)
    }

    /// Declare a column with a normalizer
    pub fn with_normalized_column(
        mut self,
        name: impl Into<String>,
        source: impl Into<ColumnSource<T>>,
        normalizer: Normalizer,
    ) -> Self {
        let name = name.into();
        if self.columns.iter().any(|c| c.name == name) {
            tracing::warn!(
                target: "sift::search",
                column = %name,
                "Column declared twice; build will fail"
            );
            self.duplicates.push(name);
            return self;
        }
        self.columns.push(ColumnSpec {
            name,
            source: source.into(),
            normalizer,
        });
        self
    }

    /// Attach per-item metadata
    ///
    /// Replaces any previous generator.
    pub fn with_metadata<M2, F>(self, generate: F) -> SearchFactory<T, M2>
    where
        F: Fn(&T) -> M2 + Send + Sync + 'static,
    {
        SearchFactory {
            items: self.items,
            columns: self.columns,
            duplicates: self.duplicates,
            metadata: Arc::new(generate),
            sorting: self.sorting,
            options: self.options,
        }
    }

    /// Append a ranking rule
    ///
    /// Rules apply in call order; the first is primary.
    pub fn with_sorting<C>(mut self, comparator: C) -> Self
    where
        C: Comparator<T> + 'static,
    {
        self.sorting.push(Arc::new(comparator));
        self
    }

    /// Return every item for an empty query
    pub fn with_inclusive_defaults(mut self, enabled: bool) -> Self {
        self.options.reset_to_all = enabled;
        self
    }

    /// Replace all query options
    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    /// Append more items
    pub fn with_items<I>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        self.items.extend(items);
        self
    }

    /// Build a sealed search
    pub fn build(&self) -> Result<SealedSearch<T, M>>
    where
        T: Clone,
    {
        self.build_search().map(Search::seal)
    }

    /// Build a search that still accepts item changes
    pub fn build_search(&self) -> Result<Search<T, M>>
    where
        T: Clone,
    {
        let started = Instant::now();
        if let Some(name) = self.duplicates.first() {
            return Err(SiftError::DuplicateColumn { name: name.clone() });
        }

        let mut index = SearchIndex::new();
        for spec in &self.columns {
            index.declare(&spec.name, spec.source.clone(), spec.normalizer.clone())?;
        }

        let mut search = Search::new(
            index,
            Arc::clone(&self.metadata),
            self.comparator(),
            self.options.clone(),
        )?;
        search.add_items(self.items.iter().cloned());

        tracing::debug!(
            target: "sift::search",
            items = search.len(),
            columns = self.columns.len(),
            rules = self.sorting.len(),
            elapsed_micros = started.elapsed().as_micros() as u64,
            "Built search"
        );
        Ok(search)
    }

    fn comparator(&self) -> Option<SharedComparator<T>> {
        match self.sorting.as_slice() {
            [] => None,
            [only] => Some(Arc::clone(only)),
            rules => {
                let combined: SharedComparator<T> = Arc::new(combined_comparison(rules.to_vec()));
                Some(combined)
            }
        }
    }
}

impl<T, M> fmt::Debug for SearchFactory<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: Vec<(&str, &str)> = self
            .columns
            .iter()
            .map(|c| (c.name.as_str(), c.source.label()))
            .collect();
        f.debug_struct("SearchFactory")
            .field("items", &self.items.len())
            .field("columns", &columns)
            .field("rules", &self.sorting.len())
            .field("options", &self.options)
            .finish()
    }
}
