use super::SnapIndex;
use crate::error::SplitError;
use crate::geometry::{StaticGeometry, UniformStrip};
use proptest::prelude::*;

fn five_pages() -> SnapIndex {
    SnapIndex::build(5, &UniformStrip::new(5, 9.0)).unwrap()
}

#[test]
fn test_build_from_uniform_strip() {
    let snaps = five_pages();
    assert_eq!(snaps.len(), 6);
    assert_eq!(snaps.page_count(), 5);
    assert_eq!(snaps.positions(), &[0.0, 10.0, 20.0, 30.0, 40.0, 50.0]);
    assert_eq!(snaps.position(2), Some(20.0));
    assert_eq!(snaps.position(6), None);
}

#[test]
fn test_partial_geometry_is_deferred() {
    let partial = StaticGeometry(vec![0.0, 10.0, 20.0]);
    match SnapIndex::build(5, &partial) {
        Err(SplitError::GeometryNotReady { expected, reported }) => {
            assert_eq!(expected, 6);
            assert_eq!(reported, 3);
        }
        other => panic!("expected GeometryNotReady, got {other:?}"),
    }
}

#[test]
fn test_excess_geometry_is_a_mismatch() {
    let extra = StaticGeometry(vec![0.0, 10.0, 20.0, 30.0]);
    assert!(matches!(
        SnapIndex::build(2, &extra),
        Err(SplitError::GeometryMismatch { .. })
    ));
}

#[test]
fn test_empty_document_is_rejected() {
    assert!(matches!(
        SnapIndex::build(0, &StaticGeometry(vec![0.0])),
        Err(SplitError::EmptyDocument)
    ));
}

#[test]
fn test_decreasing_geometry_is_rejected() {
    let geometry = StaticGeometry(vec![0.0, 20.0, 10.0]);
    match SnapIndex::build(2, &geometry) {
        Err(SplitError::UnorderedGeometry { index, .. }) => assert_eq!(index, 2),
        other => panic!("expected UnorderedGeometry, got {other:?}"),
    }
}

#[test]
fn test_coincident_boundaries_are_rejected() {
    let zero_width_last_page = StaticGeometry(vec![0.0, 10.0, 20.0, 20.0]);
    match SnapIndex::build(3, &zero_width_last_page) {
        Err(SplitError::UnorderedGeometry { index, position }) => {
            assert_eq!(index, 3);
            assert!((position - 20.0).abs() < f64::EPSILON);
        }
        other => panic!("expected UnorderedGeometry, got {other:?}"),
    }
    assert!(matches!(
        SnapIndex::build(1, &StaticGeometry(vec![0.0, 0.0])),
        Err(SplitError::UnorderedGeometry { index: 1, .. })
    ));
    assert!(matches!(
        SnapIndex::build(1, &StaticGeometry(vec![0.0, f64::NAN])),
        Err(SplitError::UnorderedGeometry { index: 1, .. })
    ));
}

#[test]
fn test_nearest_has_no_answer_for_non_finite_x() {
    let snaps = five_pages();
    assert_eq!(snaps.nearest(f64::NAN), None);
    assert_eq!(snaps.nearest(f64::INFINITY), None);
    assert_eq!(snaps.nearest(f64::NEG_INFINITY), None);
}

#[test]
fn test_nearest_prefers_lowest_index_on_tie() {
    let snaps = five_pages();
    assert_eq!(snaps.nearest(38.0), Some(4));
    assert_eq!(snaps.nearest(15.0), Some(1));
    assert_eq!(snaps.nearest(-40.0), Some(0));
    assert_eq!(snaps.nearest(400.0), Some(5));
}

#[test]
fn test_index_of_requires_exact_position() {
    let snaps = five_pages();
    assert_eq!(snaps.index_of(30.0), Some(3));
    assert_eq!(snaps.index_of(31.0), None);
    assert_eq!(SnapIndex::page_at(3), 4);
}

proptest! {
    #[test]
    fn prop_snap_index_has_one_entry_per_boundary(
        pages in 1usize..200,
        width in 1.0f64..40.0,
    ) {
        let snaps = SnapIndex::build(pages, &UniformStrip::new(pages, width)).unwrap();
        prop_assert_eq!(snaps.len(), pages + 1);
        prop_assert!(snaps.positions().windows(2).all(|w| w[0] < w[1]));
    }
}
