//! Tier 6: End-to-End
//!
//! Factory to ranked results, including the Note / Nested / Other scenario.

use crate::test_utils::{default_search, hit_ids, init_tracing};
use serde_json::{json, Value};
use sift::{ColumnSource, Condition, Normalizer, Query, SearchFactory};

fn names(values: &[&str], inclusive: bool) -> sift::SealedSearch<String> {
    SearchFactory::new(values.iter().map(|v| v.to_string()))
        .with_normalized_column(
            "name",
            ColumnSource::getter(|s: &String| vec![s.clone()]),
            Normalizer::Lowercase,
        )
        .with_inclusive_defaults(inclusive)
        .build()
        .unwrap()
}

#[test]
fn tier6_note_nested_other() {
    init_tracing();
    let search = names(&["Note", "Nested", "Other"], false);

    let results = search.search_column("name", Condition::Includes, "ot").unwrap();
    let found: Vec<&str> = results.values().map(String::as_str).collect();
    assert_eq!(found, vec!["Note", "Other"]);

    // chars("ot") / chars(key)
    assert_eq!(results.hits[0].score, 2.0 / 4.0);
    assert_eq!(results.hits[1].score, 2.0 / 5.0);
}

#[test]
fn tier6_empty_query_with_reset_to_all() {
    let search = names(&["Note", "Nested", "Other"], true);
    let results = search.search_column("name", Condition::Includes, "").unwrap();
    let found: Vec<&str> = results.values().map(String::as_str).collect();
    assert_eq!(found, vec!["Note", "Nested", "Other"]);
}

#[test]
fn tier6_empty_query_without_reset_to_all() {
    let search = names(&["Note", "Nested", "Other"], false);
    let results = search.search_column("name", Condition::Includes, "").unwrap();
    assert!(results.is_empty());
    assert_eq!(results.stats.candidates_considered, 0);
}

#[test]
fn tier6_text_normalizing_to_empty_is_an_empty_query() {
    let build = |inclusive: bool| {
        SearchFactory::new(["Note", "Nested", "Other"].map(String::from))
            .with_normalized_column(
                "name",
                ColumnSource::getter(|s: &String| vec![s.clone()]),
                Normalizer::TrimLowercase,
            )
            .with_inclusive_defaults(inclusive)
            .build()
            .unwrap()
    };

    let exclusive = build(false);
    for text in ["", "   ", "\t\n"] {
        let results = exclusive.search_column("name", Condition::Includes, text).unwrap();
        assert!(results.is_empty(), "text {:?}", text);
        assert_eq!(results.stats.candidates_considered, 0);
    }

    let inclusive = build(true);
    let results = inclusive.search_column("name", Condition::Includes, "   ").unwrap();
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|h| h.score == 0.0));
}

#[test]
fn tier6_whitespace_leaf_is_dropped_from_combinators() {
    let search = SearchFactory::new(["Note", "Nested", "Other"].map(String::from))
        .with_normalized_column(
            "name",
            ColumnSource::getter(|s: &String| vec![s.clone()]),
            Normalizer::TrimLowercase,
        )
        .with_normalized_column(
            "digits",
            ColumnSource::getter(|s: &String| vec![s.clone()]),
            Normalizer::custom(|s: &str| s.chars().filter(char::is_ascii_digit).collect()),
        )
        .build()
        .unwrap();

    // Both "  " and "abc" normalize to nothing and must not widen the match
    let q = Query::All(vec![
        Query::includes("name", "  "),
        Query::equals("digits", "abc"),
        Query::starts_with("name", " NE "),
    ]);
    let found: Vec<String> = search.query(&q).unwrap().values().cloned().collect();
    assert_eq!(found, vec!["Nested"]);

    let only_blank = Query::Any(vec![Query::includes("name", " "), Query::equals("digits", "x")]);
    assert!(search.query(&only_blank).unwrap().is_empty());
}

#[test]
fn tier6_per_column_query_map() {
    init_tracing();
    let search = default_search();
    let q = Query::columns([
        ("title", Condition::StartsWith, "w"),
        ("alias", Condition::Includes, "caution"),
        ("id", Condition::Includes, ""),
    ]);
    assert_eq!(hit_ids(&search.query(&q).unwrap()), vec!["warning"]);
}

#[test]
fn tier6_alias_search_finds_multi_valued_fields() {
    let search = default_search();
    let results = search.search_column("alias", Condition::StartsWith, "fa").unwrap();

    // "faq" (question) and "fail" (failure)
    let mut found = hit_ids(&results);
    found.sort();
    assert_eq!(found, vec!["failure", "question"]);
}

#[test]
fn tier6_json_records_and_query_document() {
    let records: Vec<Value> = vec![
        json!({ "id": "note", "aliases": ["memo"] }),
        json!({ "id": "summary", "aliases": ["abstract", "tldr"] }),
        json!({ "id": "quote", "aliases": "cite" }),
    ];
    let search = SearchFactory::new(records)
        .with_column("id", "id")
        .with_column("aliases", "aliases")
        .with_metadata(|v: &Value| v["id"].as_str().map(str::len).unwrap_or(0))
        .build()
        .unwrap();

    let q = Query::from_json(
        r#"{ "any": [
            { "match": { "column": "aliases", "condition": "equals", "text": "cite" } },
            { "all": [
                { "match": { "column": "id", "condition": "startsWith", "text": "sum" } },
                { "match": { "column": "aliases", "condition": "includes", "text": "dr" } }
            ] }
        ] }"#,
    )
    .unwrap();
    let results = search.query(&q).unwrap();

    let ids: Vec<&str> = results.values().map(|v| v["id"].as_str().unwrap()).collect();
    // quote: 1.0; summary: 3/7 + 2/4
    assert_eq!(ids, vec!["quote", "summary"]);
    assert_eq!(results.hits[1].item.metadata, 7);
}

#[test]
fn tier6_max_results_and_ranks() {
    let search = SearchFactory::new(vec!["aa", "ab", "ac", "ad"])
        .with_column("v", ColumnSource::getter(|s: &&str| vec![s.to_string()]))
        .with_options(sift::SearchOptions::new().with_max_results(3))
        .build()
        .unwrap();

    let results = search.search_column("v", Condition::StartsWith, "a").unwrap();
    assert_eq!(results.len(), 3);
    assert!(results.truncated);
    let ranks: Vec<u32> = results.iter().map(|h| h.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}
