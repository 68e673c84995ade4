//! Flat segment tree: piecewise-constant value map operations (§4.3).

use mtv::FlatSegmentTree;

#[test]
fn new_is_one_segment_of_default() {
    let fst = FlatSegmentTree::new(0i64, 100, -1i32).unwrap();
    assert_eq!(fst.leaf_size(), 2);
    assert_eq!(fst.min_key(), 0);
    assert_eq!(fst.max_key(), 100);
    let segs: Vec<_> = fst.segments().collect();
    assert_eq!(segs.len(), 1);
    assert_eq!(segs[0].value, -1);
}

#[test]
fn rejects_inverted_range() {
    assert!(FlatSegmentTree::new(10i64, 10, 0i32).is_err());
    assert!(FlatSegmentTree::new(10i64, 5, 0i32).is_err());
}

#[test]
fn insert_front_sets_value_and_splits_segments() {
    let mut fst = FlatSegmentTree::new(0i64, 100, 0i32).unwrap();
    let (_, changed) = fst.insert_front(10, 20, 5);
    assert!(changed);
    let segs: Vec<_> = fst.segments().collect();
    assert_eq!(segs.len(), 3);
    assert_eq!(segs[0], mtv::Segment { start: 0, end: 10, value: 0 });
    assert_eq!(segs[1], mtv::Segment { start: 10, end: 20, value: 5 });
    assert_eq!(segs[2], mtv::Segment { start: 20, end: 100, value: 0 });
}

#[test]
fn adjacent_equal_values_merge() {
    let mut fst = FlatSegmentTree::new(0i64, 100, 0i32).unwrap();
    fst.insert_front(10, 20, 5);
    fst.insert_front(20, 30, 5);
    let segs: Vec<_> = fst.segments().collect();
    assert_eq!(segs.len(), 3);
    assert_eq!(segs[1], mtv::Segment { start: 10, end: 30, value: 5 });
}

#[test]
fn insert_clips_to_domain() {
    let mut fst = FlatSegmentTree::new(0i64, 100, 0i32).unwrap();
    fst.insert_front(-50, 10, 9);
    assert_eq!(fst.min_key(), 0);
    let segs: Vec<_> = fst.segments().collect();
    assert_eq!(segs[0], mtv::Segment { start: 0, end: 10, value: 9 });
}

#[test]
fn search_reports_out_of_range() {
    let fst = FlatSegmentTree::new(0i64, 100, 0i32).unwrap();
    let (_, found) = fst.search(150);
    assert!(!found);
    let (idx, found) = fst.search(50);
    assert!(found);
    assert_eq!(fst.value_at(idx), Some(&0));
}

#[test]
fn search_tree_fails_until_built() {
    let mut fst = FlatSegmentTree::new(0i64, 100, 0i32).unwrap();
    let (_, found) = fst.search_tree(50);
    assert!(!found);
    fst.build_tree();
    let (idx, found) = fst.search_tree(50);
    assert!(found);
    assert_eq!(fst.value_at(idx), Some(&0));
}

#[test]
fn mutation_invalidates_built_tree() {
    let mut fst = FlatSegmentTree::new(0i64, 100, 0i32).unwrap();
    fst.build_tree();
    assert!(fst.is_tree_valid());
    fst.insert_front(10, 20, 1);
    assert!(!fst.is_tree_valid());
}

#[test]
fn shift_left_removes_range_and_keeps_domain_fixed() {
    let mut fst = FlatSegmentTree::new(0i64, 100, 0i32).unwrap();
    fst.insert_front(10, 20, 5);
    fst.shift_left(5, 15);
    // kmax is a ceiling on the domain, not the key of the last real leaf —
    // it stays put even though content shifted left.
    assert_eq!(fst.max_key(), 100);
    let (idx, found) = fst.search(5);
    assert!(found);
    assert_eq!(fst.value_at(idx), Some(&5));
}

#[test]
fn shift_right_inserts_default_gap() {
    let mut fst = FlatSegmentTree::new(0i64, 100, 0i32).unwrap();
    fst.insert_front(10, 20, 5);
    fst.shift_right(10, 3, false);
    // kmax stays fixed; the node that would have landed past it is dropped.
    assert_eq!(fst.max_key(), 100);
    let (idx, found) = fst.search(10);
    assert!(found);
    assert_eq!(fst.value_at(idx), Some(&0));
    let (idx, found) = fst.search(13);
    assert!(found);
    assert_eq!(fst.value_at(idx), Some(&5));
}

#[test]
fn shift_right_discards_nodes_pushed_past_kmax() {
    let mut fst = FlatSegmentTree::new(0i64, 100, 0i32).unwrap();
    fst.insert_front(80, 90, 8);
    fst.shift_right(0, 30, false);
    assert_eq!(fst.max_key(), 100);
    let segs: Vec<_> = fst.segments().collect();
    assert_eq!(segs, vec![mtv::Segment { start: 0, end: 100, value: 0 }]);
}

#[test]
fn clear_resets_to_single_default_segment() {
    let mut fst = FlatSegmentTree::new(0i64, 100, 0i32).unwrap();
    fst.insert_front(10, 20, 5);
    fst.clear();
    assert_eq!(fst.leaf_size(), 2);
    let segs: Vec<_> = fst.segments().collect();
    assert_eq!(segs[0].value, 0);
}
