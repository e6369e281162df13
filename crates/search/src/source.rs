//! Column sources
//!
//! A column is fed either from a named property of the record or from a
//! getter closure. Both are resolved once, when the column is declared, into
//! a single [`Getter`], so indexing never inspects the source again.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Extracts a column's values from a record
pub type Getter<T> = Arc<dyn Fn(&T) -> Vec<String> + Send + Sync>;

// ============================================================================
// Record
// ============================================================================

/// Records whose string properties can be looked up by name
///
/// Missing properties and non-string values yield no values; a plain string
/// yields one value and a string sequence yields one value per element.
pub trait Record {
    /// Values of the named property
    fn property(&self, name: &str) -> Vec<String>;
}

impl Record for serde_json::Value {
    fn property(&self, name: &str) -> Vec<String> {
        match self.get(name) {
            Some(serde_json::Value::String(s)) => vec![s.clone()],
            Some(serde_json::Value::Array(values)) => values
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect(),
            _ => vec![],
        }
    }
}

impl Record for HashMap<String, String> {
    fn property(&self, name: &str) -> Vec<String> {
        self.get(name).cloned().into_iter().collect()
    }
}

impl Record for BTreeMap<String, String> {
    fn property(&self, name: &str) -> Vec<String> {
        self.get(name).cloned().into_iter().collect()
    }
}

// ============================================================================
// ColumnSource
// ============================================================================

/// Where a column's values come from
pub struct ColumnSource<T> {
    getter: Getter<T>,
    label: String,
}

impl<T> ColumnSource<T> {
    /// Values produced by a getter closure
    pub fn getter<F>(f: F) -> Self
    where
        F: Fn(&T) -> Vec<String> + Send + Sync + 'static,
    {
        ColumnSource {
            getter: Arc::new(f),
            label: "getter".into(),
        }
    }

    /// Values of a named record property
    pub fn property(name: impl Into<String>) -> Self
    where
        T: Record + 'static,
    {
        let name = name.into();
        let label = format!("property:{}", name);
        ColumnSource {
            getter: Arc::new(move |record: &T| record.property(&name)),
            label,
        }
    }

    /// The resolved getter
    pub fn into_getter(self) -> Getter<T> {
        self.getter
    }

    /// Description for debugging and logging
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<T> Clone for ColumnSource<T> {
    fn clone(&self) -> Self {
        ColumnSource {
            getter: Arc::clone(&self.getter),
            label: self.label.clone(),
        }
    }
}

impl<T: Record + 'static> From<&str> for ColumnSource<T> {
    fn from(name: &str) -> Self {
        ColumnSource::property(name)
    }
}

impl<T: Record + 'static> From<String> for ColumnSource<T> {
    fn from(name: String) -> Self {
        ColumnSource::property(name)
    }
}

impl<T> fmt::Debug for ColumnSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ColumnSource").field(&self.label).finish()
    }
}
