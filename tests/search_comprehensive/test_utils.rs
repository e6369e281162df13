//! Test utilities for the comprehensive suite

#![allow(dead_code)]

use sift::{
    ColumnSource, Normalizer, Rgb, ScoreBuffer, SealedSearch, Search, SearchFactory,
    SearchIndexColumn, SearchResults,
};

/// Install a fmt subscriber writing through the test harness
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// A styled callout definition
#[derive(Debug, Clone, PartialEq)]
pub struct Callout {
    pub id: String,
    pub title: String,
    pub aliases: Vec<String>,
    pub color: Option<Rgb>,
}

pub fn callout(id: &str, title: &str, aliases: &[&str], color: Option<(u8, u8, u8)>) -> Callout {
    Callout {
        id: id.to_string(),
        title: title.to_string(),
        aliases: aliases.iter().map(|a| a.to_string()).collect(),
        color: color.map(|(r, g, b)| Rgb::new(r, g, b)),
    }
}

/// The default callout set
pub fn default_callouts() -> Vec<Callout> {
    vec![
        callout("note", "Note", &[], Some((68, 138, 255))),
        callout("abstract", "Abstract", &["summary", "tldr"], Some((0, 176, 255))),
        callout("info", "Info", &[], Some((0, 184, 212))),
        callout("todo", "Todo", &[], Some((0, 184, 212))),
        callout("tip", "Tip", &["hint", "important"], Some((0, 191, 165))),
        callout("success", "Success", &["check", "done"], Some((0, 200, 83))),
        callout("question", "Question", &["help", "faq"], Some((100, 221, 23))),
        callout("warning", "Warning", &["caution", "attention"], Some((255, 145, 0))),
        callout("failure", "Failure", &["fail", "missing"], Some((255, 82, 82))),
        callout("danger", "Danger", &["error"], Some((255, 23, 68))),
        callout("bug", "Bug", &[], Some((245, 0, 87))),
        callout("example", "Example", &[], Some((124, 77, 255))),
        callout("quote", "Quote", &["cite"], Some((158, 158, 158))),
        callout("custom", "Custom", &[], None),
    ]
}

/// Factory over callouts with id, title and alias columns
pub fn callout_factory(callouts: Vec<Callout>) -> SearchFactory<Callout> {
    SearchFactory::new(callouts)
        .with_normalized_column(
            "id",
            ColumnSource::getter(|c: &Callout| vec![c.id.clone()]),
            Normalizer::Lowercase,
        )
        .with_normalized_column(
            "title",
            ColumnSource::getter(|c: &Callout| vec![c.title.clone()]),
            Normalizer::Lowercase,
        )
        .with_normalized_column(
            "alias",
            ColumnSource::getter(|c: &Callout| c.aliases.clone()),
            Normalizer::Lowercase,
        )
}

/// Sealed search over the default callouts
pub fn default_search() -> SealedSearch<Callout> {
    callout_factory(default_callouts()).build().unwrap()
}

/// Mutable search over the default callouts
pub fn default_mutable_search() -> Search<Callout> {
    callout_factory(default_callouts()).build_search().unwrap()
}

/// Ids of the hits in rank order
pub fn hit_ids<M>(results: &SearchResults<'_, Callout, M>) -> Vec<String> {
    results.values().map(|c| c.id.clone()).collect()
}

/// Column holding the given keys, in order
pub fn column_of(keys: &[&str]) -> SearchIndexColumn {
    let mut column = SearchIndexColumn::new();
    for key in keys {
        column.add(key);
    }
    column
}

/// Keys matched by a field, in column order
pub fn matched_keys(column: &SearchIndexColumn, field: &sift::BitField) -> Vec<String> {
    column
        .iter()
        .filter(|(_, p)| field.contains(*p))
        .map(|(k, _)| k.to_string())
        .collect()
}

/// Fresh score buffer covering a column's domain
pub fn buffer_for(column: &SearchIndexColumn) -> ScoreBuffer {
    ScoreBuffer::with_len(column.domain_size())
}
