//! Ranged insert/erase/resize/transfer (§4.2.3, §4.2.5) and the
//! block-integrity invariant after each.

use mtv::MultiTypeVector;

#[test]
fn insert_grows_and_shifts_tail() {
    let mut mtv = MultiTypeVector::from_values(3, vec![1i32, 2, 3]).unwrap();
    mtv.insert(1, &[10i32, 20]).unwrap();
    assert_eq!(mtv.size(), 5);
    assert_eq!(*mtv.get::<i32>(0).unwrap(), 1);
    assert_eq!(*mtv.get::<i32>(1).unwrap(), 10);
    assert_eq!(*mtv.get::<i32>(2).unwrap(), 20);
    assert_eq!(*mtv.get::<i32>(3).unwrap(), 2);
    assert_eq!(*mtv.get::<i32>(4).unwrap(), 3);
    assert_eq!(mtv.block_size(), 1);
    mtv.check_block_integrity().unwrap();
}

#[test]
fn insert_empty_creates_gap() {
    let mut mtv = MultiTypeVector::from_values(2, vec![1i32, 2]).unwrap();
    mtv.insert_empty(1, 3).unwrap();
    assert_eq!(mtv.size(), 5);
    assert_eq!(mtv.get_type(1).unwrap(), mtv::ElementTag::Empty);
    assert_eq!(mtv.get_type(3).unwrap(), mtv::ElementTag::Empty);
    assert_eq!(*mtv.get::<i32>(4).unwrap(), 2);
    mtv.check_block_integrity().unwrap();
}

#[test]
fn erase_shrinks_and_merges() {
    let mut mtv = MultiTypeVector::with_size(5);
    mtv.set(2, 1i32).unwrap();
    assert_eq!(mtv.block_size(), 3);
    // [2, 3] inclusive removes both the typed position and the empty one
    // after it.
    mtv.erase(2, 3).unwrap();
    assert_eq!(mtv.size(), 3);
    assert_eq!(mtv.block_size(), 1);
    mtv.check_block_integrity().unwrap();
}

#[test]
fn erase_single_position_removes_one() {
    let mut mtv = MultiTypeVector::from_values(3, vec![1i32, 2, 3]).unwrap();
    mtv.erase(1, 1).unwrap();
    assert_eq!(mtv.size(), 2);
    assert_eq!(*mtv.get::<i32>(0).unwrap(), 1);
    assert_eq!(*mtv.get::<i32>(1).unwrap(), 3);
}

#[test]
fn erase_inverted_range_is_noop() {
    let mut mtv = MultiTypeVector::with_size(3);
    mtv.erase(2, 1).unwrap();
    assert_eq!(mtv.size(), 3);
}

#[test]
fn resize_grows_with_empty_and_shrinks_from_tail() {
    let mut mtv = MultiTypeVector::from_values(3, vec![1i32, 2, 3]).unwrap();
    mtv.resize(5).unwrap();
    assert_eq!(mtv.size(), 5);
    assert_eq!(mtv.get_type(4).unwrap(), mtv::ElementTag::Empty);
    mtv.resize(1).unwrap();
    assert_eq!(mtv.size(), 1);
    assert_eq!(*mtv.get::<i32>(0).unwrap(), 1);
    mtv.check_block_integrity().unwrap();
}

#[test]
fn push_back_appends() {
    let mut mtv = MultiTypeVector::new();
    mtv.push_back(1i32).unwrap();
    mtv.push_back(2i32).unwrap();
    mtv.push_back_empty().unwrap();
    assert_eq!(mtv.size(), 3);
    assert_eq!(*mtv.get::<i32>(0).unwrap(), 1);
    assert_eq!(*mtv.get::<i32>(1).unwrap(), 2);
    assert_eq!(mtv.get_type(2).unwrap(), mtv::ElementTag::Empty);
    mtv.check_block_integrity().unwrap();
}

#[test]
fn transfer_moves_range_and_leaves_empty_behind() {
    let mut src = MultiTypeVector::from_values(4, vec![1i32, 2, 3, 4]).unwrap();
    let mut dst = MultiTypeVector::with_size(2);
    // [1, 3] inclusive is positions 1, 2, and 3 — three values, not two.
    src.transfer(1, 3, &mut dst, 1).unwrap();
    assert_eq!(src.size(), 4);
    assert_eq!(dst.size(), 5);
    assert_eq!(mtv::ElementTag::Empty, src.get_type(1).unwrap());
    assert_eq!(mtv::ElementTag::Empty, src.get_type(2).unwrap());
    assert_eq!(mtv::ElementTag::Empty, src.get_type(3).unwrap());
    assert_eq!(*src.get::<i32>(0).unwrap(), 1);
    assert_eq!(*dst.get::<i32>(1).unwrap(), 2);
    assert_eq!(*dst.get::<i32>(2).unwrap(), 3);
    assert_eq!(*dst.get::<i32>(3).unwrap(), 4);
    src.check_block_integrity().unwrap();
    dst.check_block_integrity().unwrap();
}

#[test]
fn swap_range_exchanges_values_between_containers() {
    let mut a = MultiTypeVector::from_values(3, vec![1i32, 2, 3]).unwrap();
    let mut b = MultiTypeVector::from_values(3, vec![10i32, 20, 30]).unwrap();
    // [0, 1] inclusive is two positions.
    a.swap_range(0, 1, &mut b, 1).unwrap();
    assert_eq!(*a.get::<i32>(0).unwrap(), 20);
    assert_eq!(*a.get::<i32>(1).unwrap(), 30);
    assert_eq!(*a.get::<i32>(2).unwrap(), 3);
    assert_eq!(*b.get::<i32>(0).unwrap(), 10);
    assert_eq!(*b.get::<i32>(1).unwrap(), 1);
    assert_eq!(*b.get::<i32>(2).unwrap(), 2);
    a.check_block_integrity().unwrap();
    b.check_block_integrity().unwrap();
}

#[test]
fn release_at_clears_slot_and_returns_value() {
    let mut mtv = MultiTypeVector::from_values(3, vec![1i32, 2, 3]).unwrap();
    let v = mtv.release_at::<i32>(1).unwrap();
    assert_eq!(v, 2);
    assert_eq!(mtv.get_type(1).unwrap(), mtv::ElementTag::Empty);
}

#[test]
fn whole_container_release_detaches_without_events() {
    let mut mtv = MultiTypeVector::from_values(2, vec![1i32, 2]).unwrap();
    let detached = mtv.release();
    assert_eq!(mtv.size(), 0);
    assert_eq!(mtv.block_size(), 0);
    assert_eq!(detached.len(), 1);
    assert_eq!(detached[0].size, 2);
}
