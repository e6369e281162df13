//! Key normalization
//!
//! Every column applies one [`Normalizer`] to stored keys and to query
//! text alike, so case-insensitive (or otherwise folded) matching needs no
//! cooperation from callers.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Caller-supplied normalization function
pub type NormalizeFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Key normalization applied by a column
#[derive(Clone, Default)]
pub enum Normalizer {
    /// Keys are used as given
    #[default]
    Identity,
    /// Unicode lowercase
    Lowercase,
    /// Surrounding whitespace removed, then lowercase
    TrimLowercase,
    /// Caller-supplied function (e.g. diacritic folding)
    Custom(NormalizeFn),
}

impl Normalizer {
    /// Wrap a custom normalization function
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Normalizer::Custom(Arc::new(f))
    }

    /// Normalize a raw key
    ///
    /// Identity normalization borrows the input.
    pub fn apply<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        match self {
            Normalizer::Identity => Cow::Borrowed(raw),
            Normalizer::Lowercase => Cow::Owned(raw.to_lowercase()),
            Normalizer::TrimLowercase => Cow::Owned(raw.trim().to_lowercase()),
            Normalizer::Custom(f) => Cow::Owned(f(raw)),
        }
    }

    /// Name for debugging and logging
    pub fn name(&self) -> &str {
        match self {
            Normalizer::Identity => "identity",
            Normalizer::Lowercase => "lowercase",
            Normalizer::TrimLowercase => "trim-lowercase",
            Normalizer::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Normalizer").field(&self.name()).finish()
    }
}
