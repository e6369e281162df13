//! Query trees
//!
//! A [`Query`] is a boolean tree of column matches:
//!
//! ```text
//! Match { column, condition, text }   one column, one condition
//! All [ ... ]                         every child must match; scores add
//! Any [ ... ]                         some child must match; best score wins
//! ```
//!
//! Matches whose text normalizes to "" mean "no filter on this column" and
//! are pruned before evaluation, as are `All`/`Any` nodes left without
//! children. A query that prunes to nothing is empty and the engine falls
//! back to its `reset_to_all` option.
//!
//! Queries deserialize from JSON with externally tagged, snake_case
//! variants:
//!
//! ```json
//! { "all": [
//!     { "match": { "column": "name", "condition": "includes", "text": "ot" } },
//!     { "any": [ { "match": { "column": "id", "condition": "startsWith", "text": "n" } } ] }
//! ] }
//! ```

use crate::condition::Condition;
use serde::{Deserialize, Serialize};
use sift_core::{Result, SiftError};

/// A single column match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnQuery {
    /// Column name
    pub column: String,
    /// How `text` is matched against the column's keys
    pub condition: Condition,
    /// Raw query text; normalized by the column before matching
    pub text: String,
}

/// Boolean query over columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    /// One column match
    Match(ColumnQuery),
    /// All children must match
    All(Vec<Query>),
    /// At least one child must match
    Any(Vec<Query>),
}

impl Query {
    /// Match `text` against `column` with `condition`
    pub fn column(column: impl Into<String>, condition: Condition, text: impl Into<String>) -> Self {
        Query::Match(ColumnQuery {
            column: column.into(),
            condition,
            text: text.into(),
        })
    }

    /// Shorthand for an `includes` match
    pub fn includes(column: impl Into<String>, text: impl Into<String>) -> Self {
        Query::column(column, Condition::Includes, text)
    }

    /// Shorthand for a `startsWith` match
    pub fn starts_with(column: impl Into<String>, text: impl Into<String>) -> Self {
        Query::column(column, Condition::StartsWith, text)
    }

    /// Shorthand for an `equals` match
    pub fn equals(column: impl Into<String>, text: impl Into<String>) -> Self {
        Query::column(column, Condition::Equals, text)
    }

    /// Per-column query map: every listed column must match
    pub fn columns<I, C, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (C, Condition, S)>,
        C: Into<String>,
        S: Into<String>,
    {
        Query::All(
            entries
                .into_iter()
                .map(|(column, condition, text)| Query::column(column, condition, text))
                .collect(),
        )
    }

    /// Parse a query document
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SiftError::InvalidQuery(e.to_string()))
    }

    /// Drop empty-text matches and childless combinators
    ///
    /// Looks at the raw text only. The engine prunes again after column
    /// normalization, so text such as `"  "` on a trimming column is also
    /// dropped at query time. Returns None when nothing is left to filter on.
    pub fn pruned(&self) -> Option<Query> {
        match self {
            Query::Match(m) if m.text.is_empty() => None,
            Query::Match(_) => Some(self.clone()),
            Query::All(children) => {
                let kept: Vec<Query> = children.iter().filter_map(Query::pruned).collect();
                (!kept.is_empty()).then_some(Query::All(kept))
            }
            Query::Any(children) => {
                let kept: Vec<Query> = children.iter().filter_map(Query::pruned).collect();
                (!kept.is_empty()).then_some(Query::Any(kept))
            }
        }
    }

    /// Check whether the query filters nothing
    pub fn is_empty(&self) -> bool {
        self.pruned().is_none()
    }

    /// Visit every column match in the tree
    pub fn leaves(&self) -> Vec<&ColumnQuery> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a ColumnQuery>) {
        match self {
            Query::Match(m) => out.push(m),
            Query::All(children) | Query::Any(children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }
}
