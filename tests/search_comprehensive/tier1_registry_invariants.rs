//! Tier 1: Registry Invariants
//!
//! - No position is handed out twice while held
//! - Relinquished positions are reused before the high-water mark grows
//! - Fields built from positions beyond one machine word stay exact

use sift::{BitField, BitPosition, BitPositionRegistry};
use std::collections::HashSet;

#[test]
fn tier1_claims_are_unique_while_held() {
    let mut registry = BitPositionRegistry::new();
    let claimed: Vec<BitPosition> = (0..500).map(|_| registry.claim()).collect();

    let unique: HashSet<BitPosition> = claimed.iter().copied().collect();
    assert_eq!(unique.len(), claimed.len());
    assert_eq!(registry.live(), 500);
    assert_eq!(registry.high_water_mark(), 500);
}

#[test]
fn tier1_relinquished_position_is_reused() {
    let mut registry = BitPositionRegistry::new();
    let a = registry.claim();
    let _b = registry.claim();

    registry.relinquish(a);
    assert!(!registry.is_claimed(a));
    assert_eq!(registry.claim(), a);
    assert_eq!(registry.high_water_mark(), 2);
}

#[test]
fn tier1_reuse_never_collides_with_live_claims() {
    let mut registry = BitPositionRegistry::new();
    let mut live: HashSet<BitPosition> = HashSet::new();

    for round in 0..50 {
        for _ in 0..4 {
            let p = registry.claim();
            assert!(live.insert(p), "round {}: {} handed out twice", round, p);
        }
        let victims: Vec<BitPosition> = live.iter().copied().take(3).collect();
        for p in victims {
            registry.relinquish(p);
            live.remove(&p);
        }
    }
    assert_eq!(registry.live(), live.len());
}

#[test]
#[should_panic(expected = "not claimed")]
fn tier1_double_relinquish_panics() {
    let mut registry = BitPositionRegistry::new();
    let p = registry.claim();
    registry.relinquish(p);
    registry.relinquish(p);
}

#[test]
fn tier1_fields_are_not_limited_to_one_word() {
    let high = BitPosition::new(1000);
    let field = BitField::or(
        &BitField::from_position(BitPosition::new(3)),
        &BitField::from_position(high),
    );

    assert!(field.contains(high));
    assert!(!field.contains(BitPosition::new(999)));
    assert_eq!(field.len(), 2);
    assert_eq!(
        field.positions().collect::<Vec<_>>(),
        vec![BitPosition::new(3), high]
    );
}

#[test]
fn tier1_or_is_commutative_with_empty_identity() {
    let a: BitField = [1u32, 70, 200].into_iter().map(BitPosition::new).collect();
    let b: BitField = [2u32, 70].into_iter().map(BitPosition::new).collect();

    assert_eq!(BitField::or(&a, &b), BitField::or(&b, &a));
    assert_eq!(BitField::or(&a, &BitField::empty()), a);
}
