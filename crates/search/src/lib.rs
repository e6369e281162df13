//! Bit-field search engine
//!
//! This crate provides:
//! - SearchIndexColumn mapping normalized keys to bit positions
//! - equals / startsWith / includes conditions that score while matching
//! - SearchIndex assigning each record its per-column membership
//! - Query trees (match / all / any) deserializable from JSON
//! - Search / SealedSearch executing queries and ranking results
//! - SearchFactory wiring record fields, metadata and sort rules
//! - Sort combinators with per-record precomputation
//!
//! # Usage
//!
//! ```ignore
//! use sift_search::{Query, SearchFactory};
//! use sift_core::Normalizer;
//!
//! let search = SearchFactory::new(records)
//!     .with_normalized_column("name", "name", Normalizer::Lowercase)
//!     .build()?;
//!
//! let results = search.query(&Query::includes("name", "ot"))?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod column;
pub mod condition;
pub mod config;
pub mod engine;
pub mod factory;
pub mod index;
pub mod query;
pub mod sort;
pub mod source;

// Re-export commonly used types
pub use column::SearchIndexColumn;
pub use condition::{Condition, ScoreBuffer};
pub use config::SearchOptions;
pub use engine::{
    MetadataFn, QueryStats, Search, SearchHit, SearchItem, SearchResults, SealedSearch,
};
pub use factory::SearchFactory;
pub use index::{ItemFingerprint, SearchIndex};
pub use query::{ColumnQuery, Query};
pub use sort::{
    combined_comparison, compare_by, compare_color, compare_id, ColorComparator, ColorKey,
    ColorSortConfig, CombinedComparator, CompareBy, CompareId, Comparator, Computed, Hsv, Ranked,
    Rgb, SharedComparator, ToHsv,
};
pub use source::{ColumnSource, Getter, Record};
