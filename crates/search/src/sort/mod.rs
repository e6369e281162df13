//! Ranking rules
//!
//! This module provides:
//! - Comparator trait for pluggable ordering rules with optional
//!   per-record precomputation
//! - Computed, the type-keyed store of precomputed sort data
//! - CombinedComparator for lexicographic composition of rules
//! - compare_by / compare_id helpers
//! - ColorComparator (see [`color`])
//!
//! # Precomputation
//!
//! A rule that is expensive to evaluate (color conversion, say) computes
//! its data once per record in [`Comparator::precompute`]. Each rule stores
//! its own type in [`Computed`], so the data of several rules merges
//! without name clashes; a type stored twice keeps the later value.

pub mod color;

pub use color::{compare_color, ColorComparator, ColorKey, ColorSortConfig, Hsv, Rgb, ToHsv};

use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Computed
// ============================================================================

/// Precomputed sort data for one record
#[derive(Default)]
pub struct Computed {
    slots: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Computed {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing any value of the same type
    pub fn insert<V: Any + Send + Sync>(&mut self, value: V) {
        self.slots.insert(TypeId::of::<V>(), Box::new(value));
    }

    /// Builder: store a value
    pub fn with<V: Any + Send + Sync>(mut self, value: V) -> Self {
        self.insert(value);
        self
    }

    /// Fetch the stored value of type `V`
    pub fn get<V: Any>(&self) -> Option<&V> {
        self.slots
            .get(&TypeId::of::<V>())
            .and_then(|v| v.downcast_ref::<V>())
    }

    /// Move every value of `other` into this store
    pub fn merge(&mut self, other: Computed) {
        self.slots.extend(other.slots);
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Debug for Computed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Computed")
            .field("slots", &self.slots.len())
            .finish()
    }
}

// ============================================================================
// Ranked
// ============================================================================

/// A record together with its precomputed sort data
pub struct Ranked<'a, T> {
    /// The record
    pub value: &'a T,
    /// Data produced by the active comparator's `precompute`
    pub computed: &'a Computed,
}

impl<'a, T> Ranked<'a, T> {
    /// Pair a record with its precomputed data
    pub fn new(value: &'a T, computed: &'a Computed) -> Self {
        Ranked { value, computed }
    }
}

impl<T> Clone for Ranked<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Ranked<'_, T> {}

// ============================================================================
// Comparator Trait
// ============================================================================

/// Pluggable ordering rule
///
/// `compare` returns `Less` when `a` should be listed before `b`.
/// Comparators must be Send + Sync so a search can be shared.
pub trait Comparator<T>: Send + Sync {
    /// Order two records
    fn compare(&self, a: Ranked<'_, T>, b: Ranked<'_, T>) -> Ordering;

    /// Compute cached data for one record
    ///
    /// Called once per record when it is indexed or when sort rules change.
    fn precompute(&self, _value: &T) -> Option<Computed> {
        None
    }

    /// Name for debugging and logging
    fn name(&self) -> &str {
        "custom"
    }
}

impl<T, C: Comparator<T> + ?Sized> Comparator<T> for Arc<C> {
    fn compare(&self, a: Ranked<'_, T>, b: Ranked<'_, T>) -> Ordering {
        (**self).compare(a, b)
    }

    fn precompute(&self, value: &T) -> Option<Computed> {
        (**self).precompute(value)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T, C: Comparator<T> + ?Sized> Comparator<T> for Box<C> {
    fn compare(&self, a: Ranked<'_, T>, b: Ranked<'_, T>) -> Ordering {
        (**self).compare(a, b)
    }

    fn precompute(&self, value: &T) -> Option<Computed> {
        (**self).precompute(value)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Shared comparator handle
pub type SharedComparator<T> = Arc<dyn Comparator<T>>;

// ============================================================================
// CombinedComparator
// ============================================================================

/// Rules applied in priority order
///
/// The first rule that does not tie decides; all-tie yields `Equal`, and
/// the caller's stable sort keeps the previous relative order.
pub struct CombinedComparator<T> {
    rules: Vec<SharedComparator<T>>,
}

/// Compose rules lexicographically (first rule is primary)
pub fn combined_comparison<T>(rules: Vec<SharedComparator<T>>) -> CombinedComparator<T> {
    CombinedComparator { rules }
}

impl<T> CombinedComparator<T> {
    /// Number of composed rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if no rules are composed
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<T> Comparator<T> for CombinedComparator<T> {
    fn compare(&self, a: Ranked<'_, T>, b: Ranked<'_, T>) -> Ordering {
        for rule in &self.rules {
            match rule.compare(a, b) {
                Ordering::Equal => continue,
                decided => return decided,
            }
        }
        Ordering::Equal
    }

    fn precompute(&self, value: &T) -> Option<Computed> {
        let mut merged: Option<Computed> = None;
        for part in self.rules.iter().filter_map(|r| r.precompute(value)) {
            merged.get_or_insert_with(Computed::new).merge(part);
        }
        merged
    }

    fn name(&self) -> &str {
        "combined"
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Comparator over plain records
pub struct CompareBy<F> {
    f: F,
}

/// Adapt a plain ordering function
pub fn compare_by<T, F>(f: F) -> CompareBy<F>
where
    F: Fn(&T, &T) -> Ordering + Send + Sync,
{
    CompareBy { f }
}

impl<T, F> Comparator<T> for CompareBy<F>
where
    F: Fn(&T, &T) -> Ordering + Send + Sync,
{
    fn compare(&self, a: Ranked<'_, T>, b: Ranked<'_, T>) -> Ordering {
        (self.f)(a.value, b.value)
    }

    fn name(&self) -> &str {
        "by"
    }
}

/// Descending order of a stable string identifier
pub struct CompareId<F> {
    id: F,
}

/// Sort by an identifier, descending
pub fn compare_id<T, F>(id: F) -> CompareId<F>
where
    F: for<'a> Fn(&'a T) -> &'a str + Send + Sync,
{
    CompareId { id }
}

impl<T, F> Comparator<T> for CompareId<F>
where
    F: for<'a> Fn(&'a T) -> &'a str + Send + Sync,
{
    fn compare(&self, a: Ranked<'_, T>, b: Ranked<'_, T>) -> Ordering {
        (self.id)(b.value).cmp((self.id)(a.value))
    }

    fn name(&self) -> &str {
        "id"
    }
}

// ============================================================================
// Tests
// ============================================================================
