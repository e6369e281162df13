//! Search configuration.
//!
//! This module provides the query-time options of a built search.

use serde::{Deserialize, Serialize};
use sift_core::{Result, SiftError};

/// Query-time options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Return every item for an empty query (default: false).
    ///
    /// A query is empty when all of its matches have empty text. With
    /// this unset, an empty query returns no items.
    pub reset_to_all: bool,

    /// Maximum number of hits returned (default: unlimited).
    ///
    /// Hits past the limit are dropped after ranking.
    pub max_results: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            reset_to_all: false,
            max_results: None,
        }
    }
}

impl SearchOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set empty-query behaviour (builder pattern).
    pub fn with_reset_to_all(mut self, enabled: bool) -> Self {
        self.reset_to_all = enabled;
        self
    }

    /// Set hit limit (builder pattern).
    pub fn with_max_results(mut self, limit: usize) -> Self {
        self.max_results = Some(limit);
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_results == Some(0) {
            return Err(SiftError::InvalidConfig(
                "max_results must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
