//! Sift - in-memory search and filter engine over structured records
//!
//! Sift indexes string-valued fields of a fixed record collection into
//! named columns, answers equals / startsWith / includes queries with a
//! relevance score per match, and orders results by score and then by
//! composable sort rules.
//!
//! # Quick Start
//!
//! ```ignore
//! use sift::{Normalizer, Query, SearchFactory};
//!
//! let search = SearchFactory::new(vec!["Note", "Nested", "Other"])
//!     .with_normalized_column(
//!         "name",
//!         ColumnSource::getter(|s: &&str| vec![s.to_string()]),
//!         Normalizer::Lowercase,
//!     )
//!     .build()?;
//!
//! let results = search.query(&Query::includes("name", "ot"))?;
//! ```
//!
//! # Architecture
//!
//! Set algebra lives in `sift-core` (bit positions, bit fields, position
//! registry, normalization, errors). The engine lives in `sift-search`.
//! Both are re-exported here.

pub use sift_core::*;
pub use sift_search::*;
