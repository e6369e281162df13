//! Tier 5: Sorting
//!
//! - combined_comparison takes the first non-tie
//! - Precomputed data from several rules merges
//! - Color ordering: invalid last, shades after colors, hue, then vividness
//! - Score always dominates the sort rule

use crate::test_utils::{callout, callout_factory, default_callouts, hit_ids, Callout};
use sift::{
    combined_comparison, compare_by, compare_color, compare_id, ColorKey, ColorSortConfig,
    Comparator, Computed, Query, Ranked, SharedComparator,
};
use std::cmp::Ordering;
use std::sync::Arc;

fn cmp_with(comparator: &dyn Comparator<Callout>, a: &Callout, b: &Callout) -> Ordering {
    let ca = comparator.precompute(a).unwrap_or_default();
    let cb = comparator.precompute(b).unwrap_or_default();
    comparator.compare(Ranked::new(a, &ca), Ranked::new(b, &cb))
}

#[test]
fn tier5_combined_precedence() {
    let by_title_len: SharedComparator<Callout> =
        Arc::new(compare_by(|a: &Callout, b: &Callout| a.title.len().cmp(&b.title.len())));
    let by_id: SharedComparator<Callout> = Arc::new(compare_id(|c: &Callout| c.id.as_str()));
    let combined = combined_comparison(vec![by_title_len, by_id]);

    let tip = callout("tip", "Tip", &[], None);
    let bug = callout("bug", "Bug", &[], None);
    let note = callout("note", "Note", &[], None);

    // First rule decides
    assert_eq!(cmp_with(&combined, &tip, &note), Ordering::Less);
    // Tie on the first rule falls back to the second (id descending)
    assert_eq!(cmp_with(&combined, &tip, &bug), Ordering::Less);
    assert_eq!(cmp_with(&combined, &bug, &tip), Ordering::Greater);
    // Both tie
    assert_eq!(cmp_with(&combined, &tip, &tip.clone()), Ordering::Equal);
}

#[test]
fn tier5_combined_merges_precomputed_data() {
    let color: SharedComparator<Callout> = Arc::new(compare_color(|c: &Callout| c.color));
    let by_id: SharedComparator<Callout> = Arc::new(compare_id(|c: &Callout| c.id.as_str()));
    let combined = combined_comparison(vec![by_id, color]);

    let computed = combined
        .precompute(&callout("tip", "Tip", &[], Some((0, 191, 165))))
        .unwrap();
    let key = computed.get::<ColorKey>().unwrap();
    assert!(key.hsv.is_some());
    assert!(!key.shade);
}

#[test]
fn tier5_color_order() {
    let search = callout_factory(vec![
        callout("custom", "Custom", &[], None),
        callout("quote", "Quote", &[], Some((158, 158, 158))),
        callout("example", "Example", &[], Some((124, 77, 255))),
        callout("warning", "Warning", &[], Some((255, 145, 0))),
        callout("success", "Success", &[], Some((0, 200, 83))),
    ])
    .with_sorting(compare_color(|c: &Callout| c.color))
    .with_inclusive_defaults(true)
    .build()
    .unwrap();

    let results = search.query(&Query::All(vec![])).unwrap();
    // orange (34) < green (145) < violet (258), then gray shade, then no color
    assert_eq!(
        hit_ids(&results),
        vec!["warning", "success", "example", "quote", "custom"]
    );
}

#[test]
fn tier5_color_same_hue_band_prefers_vivid() {
    let search = callout_factory(vec![
        callout("dim", "Dim", &[], Some((0, 92, 106))),
        callout("info", "Info", &[], Some((0, 184, 212))),
    ])
    .with_sorting(compare_color(|c: &Callout| c.color))
    .with_inclusive_defaults(true)
    .build()
    .unwrap();

    let results = search.query(&Query::All(vec![])).unwrap();
    assert_eq!(hit_ids(&results), vec!["info", "dim"]);
}

#[test]
fn tier5_color_config_shade_threshold() {
    let pastel = callout("pastel", "Pastel", &[], Some((230, 210, 210)));
    let red = callout("red", "Red", &[], Some((255, 0, 0)));

    let strict = compare_color(|c: &Callout| c.color)
        .with_config(ColorSortConfig::new().with_shade_saturation(0.5))
        .unwrap();
    // Pastel saturation is about 0.09, a shade under this threshold
    assert_eq!(cmp_with(&strict, &red, &pastel), Ordering::Less);

    let lenient = compare_color(|c: &Callout| c.color)
        .with_config(ColorSortConfig::new().with_shade_saturation(0.0))
        .unwrap();
    // With no shades, both are hue 0: the more vivid red wins
    assert_eq!(cmp_with(&lenient, &red, &pastel), Ordering::Less);
}

#[test]
fn tier5_score_dominates_sort_rule() {
    let search = callout_factory(default_callouts())
        .with_sorting(compare_id(|c: &Callout| c.id.as_str()))
        .build()
        .unwrap();

    let results = search.search_column("id", sift::Condition::Includes, "no").unwrap();
    // "note" scores 2/4; no other id contains "no"
    assert_eq!(hit_ids(&results), vec!["note"]);

    let results = search.search_column("id", sift::Condition::StartsWith, "t").unwrap();
    // "tip" 1/3 beats "todo" 1/4 despite id-descending preferring "todo"
    assert_eq!(hit_ids(&results), vec!["tip", "todo"]);
}

#[test]
fn tier5_set_sorting_recomputes() {
    let mut search = callout_factory(default_callouts())
        .with_inclusive_defaults(true)
        .build()
        .unwrap();
    assert!(search.items().iter().all(|i| i.computed.is_empty()));

    search.set_sorting(Some(Arc::new(compare_color(|c: &Callout| c.color))));
    assert!(search
        .items()
        .iter()
        .all(|i| i.computed.get::<ColorKey>().is_some()));

    let results = search.query(&Query::All(vec![])).unwrap();
    assert_eq!(hit_ids(&results).last().map(String::as_str), Some("custom"));

    search.set_sorting(None);
    let results = search.query(&Query::All(vec![])).unwrap();
    assert_eq!(hit_ids(&results)[0], "note");
}

#[test]
fn tier5_custom_comparator_precompute() {
    struct ByAliasCount;

    impl Comparator<Callout> for ByAliasCount {
        fn compare(&self, a: Ranked<'_, Callout>, b: Ranked<'_, Callout>) -> Ordering {
            let count = |r: Ranked<'_, Callout>| r.computed.get::<usize>().copied().unwrap_or(0);
            count(b).cmp(&count(a))
        }

        fn precompute(&self, value: &Callout) -> Option<Computed> {
            Some(Computed::new().with(value.aliases.len()))
        }
    }

    let search = callout_factory(default_callouts())
        .with_sorting(ByAliasCount)
        .with_inclusive_defaults(true)
        .build()
        .unwrap();

    let results = search.query(&Query::All(vec![])).unwrap();
    let first = results.hits[0].item;
    assert_eq!(first.value.id, "abstract");
    assert_eq!(first.computed.get::<usize>(), Some(&2));
}
