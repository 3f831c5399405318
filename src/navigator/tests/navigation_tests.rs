//! Tests for step / seek / random pick / reset

use super::fixtures::{five_records, id_of, navigator, plain_records};
use crate::dataset::TraitLevel;
use crate::navigator::{InvalidPosition, NavigationMode, SearchOutcome};

// ============================================================================
// Unfiltered Navigation
// ============================================================================

#[test]
fn test_step_unfiltered() {
    let mut nav = navigator(five_records());
    nav.seek(2).unwrap();

    let sel = nav.step_next().unwrap();
    assert_eq!(sel.absolute_index, 2);
    assert_eq!(sel.position, 3);
    assert_eq!(sel.relative_index, None);
    assert!(sel.has_previous && sel.has_next);

    let sel = nav.step_previous().unwrap();
    assert_eq!(sel.absolute_index, 1);
}

#[test]
fn test_step_clamped_at_bounds() {
    let mut nav = navigator(five_records());

    let first = nav.seek(1).unwrap();
    assert!(!first.has_previous);
    assert!(nav.step_previous().is_none());
    assert_eq!(nav.active_index(), Some(0));

    let last = nav.seek(5).unwrap();
    assert!(!last.has_next);
    assert!(last.has_previous);
    assert!(nav.step_next().is_none());
    assert_eq!(nav.active_index(), Some(4));
}

#[test]
fn test_next_then_previous_round_trip() {
    let mut nav = navigator(five_records());
    for start in 2..=4i64 {
        let before = nav.seek(start).unwrap().absolute_index;
        nav.step_next().unwrap();
        let after = nav.step_previous().unwrap();
        assert_eq!(after.absolute_index, before);
        assert_eq!(nav.active_index(), Some((start - 1) as usize));
    }
}

#[test]
fn test_step_with_nothing_selected() {
    let mut nav = navigator(five_records());
    assert!(nav.current().is_none());
    assert!(nav.step_next().is_none());
    assert!(nav.step_previous().is_none());
}

// ============================================================================
// Filtered Navigation
// ============================================================================

#[test]
fn test_step_filtered_tracks_absolute_index() {
    let mut nav = navigator(five_records());
    nav.toggle_strategy_filter("Logical", true);
    assert!(matches!(nav.search(), SearchOutcome::Match(_)));

    let sel = nav.step_next().unwrap();
    assert_eq!(id_of(sel.record), "r3");
    assert_eq!(sel.absolute_index, 3);
    assert_eq!(sel.relative_index, Some(1));
    assert_eq!(sel.position, 2);
    assert_eq!(sel.total, 2);
    assert!(sel.has_previous);
    assert!(!sel.has_next);

    assert!(nav.step_next().is_none());
    assert_eq!(nav.mode(), NavigationMode::Filtered);

    let sel = nav.step_previous().unwrap();
    assert_eq!(sel.absolute_index, 1);
    assert_eq!(sel.relative_index, Some(0));
}

#[test]
fn test_seek_filtered_uses_relative_numbering() {
    let mut nav = navigator(five_records());
    nav.set_trait_filter("assertive", Some(TraitLevel::Low));
    assert!(matches!(nav.search(), SearchOutcome::Match(_)));

    let sel = nav.seek(2).unwrap();
    assert_eq!(id_of(sel.record), "r2");
    assert_eq!(sel.absolute_index, 2);

    // Absolute position 4 is outside the 2-element filtered space
    assert_eq!(
        nav.seek(4).unwrap_err(),
        InvalidPosition { requested: 4, current_position: Some(2) }
    );
    assert_eq!(nav.mode(), NavigationMode::Filtered);
}

// ============================================================================
// Seek
// ============================================================================

#[test]
fn test_seek_bounds() {
    let mut nav = navigator(five_records());
    assert_eq!(nav.seek(1).unwrap().absolute_index, 0);
    assert_eq!(nav.seek(5).unwrap().absolute_index, 4);

    nav.seek(3).unwrap();
    for bad in [0, 6, -1] {
        let err = nav.seek(bad).unwrap_err();
        assert_eq!(err.requested, bad);
        assert_eq!(err.current_position, Some(3));
        assert_eq!(nav.active_index(), Some(2));
    }
}

#[test]
fn test_seek_without_selection_reports_none() {
    let mut nav = navigator(five_records());
    let err = nav.seek(9).unwrap_err();
    assert_eq!(err.current_position, None);
    assert!(nav.current().is_none());
}

#[test]
fn test_seek_after_no_match_uses_full_collection() {
    let mut nav = navigator(five_records());
    nav.set_trait_filter("curious", Some(TraitLevel::High));
    assert_eq!(nav.search(), SearchOutcome::NoMatch);

    let sel = nav.seek(4).unwrap();
    assert_eq!(sel.absolute_index, 3);
    assert_eq!(sel.total, 5);
}

// ============================================================================
// Random Pick + Reset
// ============================================================================

#[test]
fn test_pick_random_leaves_filtered_mode() {
    let mut nav = navigator(five_records());
    nav.toggle_strategy_filter("Logical", true);
    assert!(matches!(nav.search(), SearchOutcome::Match(_)));

    let sel = nav.pick_random().unwrap();
    assert!(sel.absolute_index < 5);
    assert_eq!(sel.total, 5);
    assert_eq!(sel.relative_index, None);
    assert_eq!(nav.mode(), NavigationMode::Unfiltered);
    // Filters survive a random pick
    assert!(nav.filter().strategies().contains("Logical"));
}

#[test]
fn test_pick_random_covers_collection() {
    let mut nav = navigator(plain_records(4));
    let mut seen = [false; 4];
    for _ in 0..200 {
        seen[nav.pick_random().unwrap().absolute_index] = true;
    }
    assert!(seen.iter().all(|&s| s), "Expected every index to be picked: {:?}", seen);
}

#[test]
fn test_pick_random_deterministic_with_seed() {
    let collection = plain_records(50);
    let mut a = crate::navigator::Navigator::with_seed(collection.clone(), 7);
    let mut b = crate::navigator::Navigator::with_seed(collection, 7);
    for _ in 0..10 {
        assert_eq!(
            a.pick_random().unwrap().absolute_index,
            b.pick_random().unwrap().absolute_index
        );
    }
}

#[test]
fn test_pick_random_empty_collection() {
    let mut nav = navigator(plain_records(0));
    assert!(nav.pick_random().is_none());
    assert!(nav.current().is_none());
}

#[test]
fn test_reset_clears_filters() {
    let mut nav = navigator(five_records());
    nav.set_trait_filter("assertive", Some(TraitLevel::High));
    nav.toggle_strategy_filter("Logical", true);
    assert!(matches!(nav.search(), SearchOutcome::Match(_)));

    assert!(nav.reset().is_some());
    assert!(nav.filter().traits().is_empty());
    assert!(nav.filter().strategies().is_empty());
    assert_eq!(nav.mode(), NavigationMode::Unfiltered);
    assert!(nav.current().is_some());
}

#[test]
fn test_reset_empty_collection() {
    let mut nav = navigator(plain_records(0));
    nav.set_trait_filter("assertive", Some(TraitLevel::High));
    assert!(nav.reset().is_none());
    assert!(nav.filter().is_empty());
    assert!(nav.current().is_none());
}

#[test]
fn test_replace_collection_resets_state() {
    let mut nav = navigator(five_records());
    nav.set_trait_filter("assertive", Some(TraitLevel::High));
    assert!(matches!(nav.search(), SearchOutcome::Match(_)));

    nav.replace_collection(plain_records(3));
    assert!(nav.filter().is_empty());
    assert_eq!(nav.mode(), NavigationMode::Unfiltered);
    assert!(nav.current().is_none());
    assert_eq!(nav.active_len(), 3);
}
