use super::{Marker, MarkerSet, DEFAULT_OVERLAP_TOLERANCE};
use crate::geometry::{StaticGeometry, UniformStrip};
use crate::snap_index::SnapIndex;

fn five_pages() -> SnapIndex {
    SnapIndex::build(5, &UniformStrip::new(5, 9.0)).unwrap()
}

fn positions(set: &MarkerSet) -> Vec<(f64, bool)> {
    set.markers().iter().map(|m| (m.position, m.locked)).collect()
}

#[test]
fn test_seed_places_interior_starts_between_end_caps() {
    let set = MarkerSet::seed(&five_pages(), [3], DEFAULT_OVERLAP_TOLERANCE);
    assert_eq!(
        positions(&set),
        vec![(0.0, true), (20.0, false), (50.0, true)]
    );
}

#[test]
fn test_seed_skips_first_page_and_out_of_range_starts() {
    let set = MarkerSet::seed(&five_pages(), [1, 6, 0, 5], DEFAULT_OVERLAP_TOLERANCE);
    assert_eq!(
        positions(&set),
        vec![(0.0, true), (40.0, false), (50.0, true)]
    );
}

#[test]
fn test_seed_collapses_duplicate_proposals() {
    let set = MarkerSet::seed(&five_pages(), [3, 3, 2], DEFAULT_OVERLAP_TOLERANCE);
    assert_eq!(
        positions(&set),
        vec![(0.0, true), (10.0, false), (20.0, false), (50.0, true)]
    );
}

#[test]
fn test_seed_without_proposals_has_only_end_caps() {
    let set = MarkerSet::seed(&five_pages(), [], DEFAULT_OVERLAP_TOLERANCE);
    assert_eq!(set.len(), 2);
    assert_eq!(set.locked_count(), 2);
}

#[test]
fn test_leftmost_and_rightmost() {
    let set = MarkerSet::seed(&five_pages(), [3], DEFAULT_OVERLAP_TOLERANCE);
    assert!(set.is_leftmost(0));
    assert!(!set.is_leftmost(1));
    assert!(set.is_rightmost(2));
    assert!(!set.is_rightmost(1));
    assert!(!set.is_leftmost(9));
}

#[test]
fn test_remove_crossed_sweeps_markers_in_between() {
    let mut set = MarkerSet::seed(&five_pages(), [2, 3, 4], DEFAULT_OVERLAP_TOLERANCE);
    // Drag the marker at 10 over 20 and 30 onto 40.
    let dragged = set.remove_crossed(1, 10.0, 40.0);
    assert_eq!(dragged, 1);
    assert_eq!(
        positions(&set),
        vec![(0.0, true), (10.0, false), (50.0, true)]
    );
}

#[test]
fn test_remove_crossed_removes_unlocked_marker_on_target() {
    let mut set = MarkerSet::seed(&five_pages(), [2, 4], DEFAULT_OVERLAP_TOLERANCE);
    let dragged = set.remove_crossed(2, 30.0, 10.0);
    assert_eq!(dragged, 1);
    assert_eq!(
        positions(&set),
        vec![(0.0, true), (30.0, false), (50.0, true)]
    );
}

#[test]
fn test_remove_crossed_keeps_locked_marker_on_target() {
    let mut set = MarkerSet::seed(&five_pages(), [3], DEFAULT_OVERLAP_TOLERANCE);
    let dragged = set.remove_crossed(1, 20.0, 50.0);
    assert_eq!(dragged, 1);
    assert_eq!(set.len(), 3);
    assert_eq!(set.locked_count(), 2);
}

#[test]
fn test_relocate_moves_unlocked_marker_in_place() {
    let mut set = MarkerSet::seed(&five_pages(), [3], DEFAULT_OVERLAP_TOLERANCE);
    set.relocate(1, 40.0);
    assert_eq!(set.get(1), Some(&Marker::unlocked(40.0)));
    assert_eq!(set.len(), 3);
}

#[test]
fn test_relocate_locked_marker_leaves_locked_copy() {
    let mut set = MarkerSet::seed(&five_pages(), [], DEFAULT_OVERLAP_TOLERANCE);
    set.relocate(0, 20.0);
    assert_eq!(
        positions(&set),
        vec![(0.0, true), (20.0, false), (50.0, true)]
    );
    assert_eq!(set.locked_count(), 2);
}

#[test]
fn test_dedup_keeps_first_of_overlapping_unlocked_markers() {
    let snaps = SnapIndex::build(4, &StaticGeometry(vec![0.0, 10.0, 10.5, 11.0, 30.0])).unwrap();
    let mut set = MarkerSet::seed(&snaps, [2, 3, 4], DEFAULT_OVERLAP_TOLERANCE);
    assert_eq!(set.len(), 5);
    set.dedup();
    assert_eq!(
        positions(&set),
        vec![(0.0, true), (10.0, false), (30.0, true)]
    );
}

#[test]
fn test_dedup_absorbs_unlocked_marker_on_end_cap() {
    let mut set = MarkerSet::seed(&five_pages(), [3], DEFAULT_OVERLAP_TOLERANCE);
    set.relocate(1, 50.0);
    set.dedup();
    assert_eq!(positions(&set), vec![(0.0, true), (50.0, true)]);
}

#[test]
fn test_rebuild_from_starts_replaces_interior_markers() {
    let snaps = five_pages();
    let mut set = MarkerSet::seed(&snaps, [3], DEFAULT_OVERLAP_TOLERANCE);
    set.rebuild_from_starts(&snaps, [1, 2, 5]);
    assert_eq!(
        positions(&set),
        vec![(0.0, true), (10.0, false), (40.0, false), (50.0, true)]
    );
}

#[test]
fn test_remap_follows_relayout() {
    let old = five_pages();
    let new = SnapIndex::build(5, &UniformStrip::new(5, 19.0)).unwrap();
    let mut set = MarkerSet::seed(&old, [3], DEFAULT_OVERLAP_TOLERANCE);
    let dropped = set.remap(&old, &new);
    assert_eq!(dropped, 0);
    assert_eq!(
        positions(&set),
        vec![(0.0, true), (40.0, false), (100.0, true)]
    );
}
