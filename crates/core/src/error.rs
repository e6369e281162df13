//! Error types for sift
//!
//! This module defines the error type shared by every sift crate.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Only caller input and configuration problems are reported through
//! [`SiftError`]. Index corruption (for example relinquishing a bit position
//! that is not claimed) is a programming error and panics instead.

use thiserror::Error;

/// Result type alias for sift operations
pub type Result<T> = std::result::Result<T, SiftError>;

/// Error types for sift
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SiftError {
    /// A column name was declared more than once
    #[error("Duplicate column: {name}")]
    DuplicateColumn {
        /// Column name
        name: String,
    },

    /// A query referenced a column that was never declared
    #[error("Unknown column: {name}")]
    UnknownColumn {
        /// Column name
        name: String,
    },

    /// A query document has a shape that is not recognized
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An item index does not exist
    #[error("Item index {index} out of bounds (len {len})")]
    ItemOutOfBounds {
        /// Requested index
        index: usize,
        /// Number of items
        len: usize,
    },
}

impl SiftError {
    /// Check if this error indicates a missing column or item
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SiftError::UnknownColumn { .. } | SiftError::ItemOutOfBounds { .. }
        )
    }

    /// Check if this error is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            SiftError::DuplicateColumn { .. }
                | SiftError::InvalidQuery(_)
                | SiftError::InvalidConfig(_)
        )
    }
}
