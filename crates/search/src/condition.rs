//! Match conditions
//!
//! A condition walks one column's live keys, collects the positions whose
//! key matches a normalized query into a [`BitField`], and writes a score
//! for each match into a caller-owned [`ScoreBuffer`].
//!
//! # Scoring
//!
//! `equals` scores every match 1.0. `starts_with` and `includes` score a
//! match by how much of the key the query covers:
//!
//! ```text
//! score = chars(query) / chars(key)
//! ```
//!
//! A full match scores 1.0 and every extra character of the key outside the
//! match lowers the score, so more specific matches rank higher and equal
//! specificity ranks equal. The empty query matches every key with score
//! 0.0, except an empty key, which it matches fully.

use crate::column::SearchIndexColumn;
use serde::{Deserialize, Serialize};
use sift_core::{BitField, BitPosition};
use std::fmt;

// ============================================================================
// ScoreBuffer
// ============================================================================

/// Per-position scores written by conditions
///
/// Owned by the caller and reused across evaluations. Conditions only write
/// at positions they match; callers reset between independent queries.
#[derive(Debug, Clone, Default)]
pub struct ScoreBuffer {
    scores: Vec<f32>,
}

impl ScoreBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a zeroed buffer covering `len` positions
    pub fn with_len(len: usize) -> Self {
        ScoreBuffer {
            scores: vec![0.0; len],
        }
    }

    /// Zero the buffer and size it to cover `len` positions
    pub fn reset(&mut self, len: usize) {
        self.scores.clear();
        self.scores.resize(len, 0.0);
    }

    /// Score recorded at a position (0.0 if never written)
    pub fn get(&self, position: BitPosition) -> f32 {
        self.scores
            .get(position.as_usize())
            .copied()
            .unwrap_or(0.0)
    }

    /// Record a score, growing the buffer if needed
    pub fn set(&mut self, position: BitPosition, score: f32) {
        let index = position.as_usize();
        if index >= self.scores.len() {
            self.scores.resize(index + 1, 0.0);
        }
        self.scores[index] = score;
    }

    /// Number of positions covered
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Check if the buffer covers no positions
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

// ============================================================================
// Condition
// ============================================================================

/// How query text is matched against column keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Condition {
    /// Key equals the query
    Equals,
    /// Key starts with the query
    StartsWith,
    /// Key contains the query anywhere
    Includes,
}

impl Condition {
    /// Evaluate this condition against a column
    ///
    /// `query` must already be normalized with the column's normalizer.
    pub fn evaluate(
        self,
        column: &SearchIndexColumn,
        query: &str,
        scores: &mut ScoreBuffer,
    ) -> BitField {
        match self {
            Condition::Equals => equals(column, query, scores),
            Condition::StartsWith => starts_with(column, query, scores),
            Condition::Includes => includes(column, query, scores),
        }
    }

    /// Name for debugging and logging
    pub fn name(self) -> &'static str {
        match self {
            Condition::Equals => "equals",
            Condition::StartsWith => "startsWith",
            Condition::Includes => "includes",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Exact match; the empty query matches every key
pub fn equals(column: &SearchIndexColumn, query: &str, scores: &mut ScoreBuffer) -> BitField {
    if query.is_empty() {
        return match_all(column, query, scores);
    }
    scan(column, scores, |key| (key == query).then_some(1.0))
}

/// Prefix match
pub fn starts_with(column: &SearchIndexColumn, query: &str, scores: &mut ScoreBuffer) -> BitField {
    scan(column, scores, |key| {
        key.starts_with(query).then(|| coverage(query, key))
    })
}

/// Substring match at any offset
pub fn includes(column: &SearchIndexColumn, query: &str, scores: &mut ScoreBuffer) -> BitField {
    scan(column, scores, |key| {
        key.contains(query).then(|| coverage(query, key))
    })
}

fn match_all(column: &SearchIndexColumn, query: &str, scores: &mut ScoreBuffer) -> BitField {
    scan(column, scores, |key| Some(coverage(query, key)))
}

fn scan<F>(column: &SearchIndexColumn, scores: &mut ScoreBuffer, mut score_of: F) -> BitField
where
    F: FnMut(&str) -> Option<f32>,
{
    let mut matched = BitField::empty();
    for (key, position) in column.iter() {
        if let Some(score) = score_of(key) {
            matched.insert(position);
            scores.set(position, score);
        }
    }
    matched
}

/// Share of the key covered by a matching query
pub fn coverage(query: &str, key: &str) -> f32 {
    let key_len = key.chars().count();
    if key_len == 0 {
        return 1.0;
    }
    query.chars().count() as f32 / key_len as f32
}

// ============================================================================
// Tests
// ============================================================================
