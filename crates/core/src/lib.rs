//! Core types for sift
//!
//! This crate defines the foundational types used throughout the system:
//! - BitPosition: Slot identifier within one column's value domain
//! - BitField: Arbitrary-width set of bit positions
//! - BitPositionRegistry: Allocator that recycles relinquished positions
//! - Normalizer: Key normalization shared by stored keys and query text
//! - SiftError: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitfield;
pub mod error;
pub mod normalize;
pub mod position;
pub mod registry;

pub use bitfield::{BitField, Positions};
pub use error::{Result, SiftError};
pub use normalize::{NormalizeFn, Normalizer};
pub use position::BitPosition;
pub use registry::BitPositionRegistry;
