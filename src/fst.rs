//! Flat segment tree (§4.3): a piecewise-constant value map over `[kmin,
//! kmax)`. Grounded on Design Notes §9's recommendation that an indexed
//! arena satisfies the leaf-list ordering contract as well as an explicit
//! doubly-linked list would, so the backing store here is a sorted
//! `Vec<(K, V)>` rather than a pointer-linked node chain — the same choice
//! `block.rs` makes for `ElementBlock` storage.
//!
//! The last leaf is a sentinel marking `kmax`; its value is never read by a
//! lookup, only its key.

use std::ops::{Add, Sub};

use crate::error::{MtvError, MtvResult};
use crate::logging;

/// One `[start, end)` run of constant value, as yielded by [`FlatSegmentTree::segments`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment<K, V> {
    pub start: K,
    pub end: K,
    pub value: V,
}

pub struct FlatSegmentTree<K, V> {
    leaves: Vec<(K, V)>,
    default: V,
    tree_valid: bool,
}

impl<K, V> FlatSegmentTree<K, V>
where
    K: Copy + Ord + Add<Output = K> + Sub<Output = K>,
    V: Clone + PartialEq,
{
    /// A single segment `[kmin, kmax)` holding `default`. Fails with
    /// `InvalidArg` if `kmin >= kmax`.
    pub fn new(kmin: K, kmax: K, default: V) -> MtvResult<Self> {
        if kmin >= kmax {
            return Err(MtvError::invalid_arg("kmin must be < kmax"));
        }
        Ok(FlatSegmentTree {
            leaves: vec![(kmin, default.clone()), (kmax, default.clone())],
            default,
            tree_valid: false,
        })
    }

    pub fn min_key(&self) -> K {
        self.leaves[0].0
    }

    pub fn max_key(&self) -> K {
        self.leaves[self.leaves.len() - 1].0
    }

    pub fn default_value(&self) -> &V {
        &self.default
    }

    /// Number of leaf nodes, including the `kmax` sentinel.
    pub fn leaf_size(&self) -> usize {
        self.leaves.len()
    }

    /// Resets to a single default-valued segment spanning `[kmin, kmax)`.
    pub fn clear(&mut self) {
        let kmin = self.min_key();
        let kmax = self.max_key();
        self.leaves = vec![(kmin, self.default.clone()), (kmax, self.default.clone())];
        self.tree_valid = false;
    }

    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.leaves, &mut other.leaves);
        std::mem::swap(&mut self.default, &mut other.default);
        std::mem::swap(&mut self.tree_valid, &mut other.tree_valid);
    }

    fn floor_index(&self, key: K) -> Option<usize> {
        if key < self.min_key() || key > self.max_key() {
            return None;
        }
        let idx = self.leaves.partition_point(|(k, _)| *k <= key);
        Some(idx - 1)
    }

    /// Searches the leaf list directly. `found` is `false` iff `key` falls
    /// outside `[kmin, kmax)`.
    pub fn search(&self, key: K) -> (usize, bool) {
        match self.floor_index(key) {
            Some(i) => (i, true),
            None => (self.leaves.len(), false),
        }
    }

    /// Like [`Self::search`], but checks `hint`'s segment first so a
    /// sequential scan stays O(1) per step instead of paying `O(log n)`
    /// every time.
    pub fn search_from(&self, hint: usize, key: K) -> (usize, bool) {
        if let Some(&(start, _)) = self.leaves.get(hint) {
            let next = self.leaves.get(hint + 1).map(|&(k, _)| k);
            if start <= key && next.map_or(true, |n| key < n) {
                return (hint, true);
            }
        }
        self.search(key)
    }

    /// `O(log n)` search via the auxiliary tree. Returns `(leaf_size(),
    /// false)` if [`Self::build_tree`] hasn't been called since the last
    /// mutation.
    pub fn search_tree(&self, key: K) -> (usize, bool) {
        if !self.tree_valid {
            return (self.leaves.len(), false);
        }
        self.search(key)
    }

    /// Marks the auxiliary tree as built. Since the leaf list is already a
    /// sorted array, the "tree" search is the same binary search as
    /// [`Self::search`] — this flag only gates whether `search_tree` is
    /// allowed to use it, matching the "undefined until built" contract.
    pub fn build_tree(&mut self) {
        logging::fst_rebuild(self.leaves.len());
        self.tree_valid = true;
    }

    pub fn is_tree_valid(&self) -> bool {
        self.tree_valid
    }

    fn invalidate_tree(&mut self) {
        self.tree_valid = false;
    }

    pub fn value_at(&self, idx: usize) -> Option<&V> {
        if idx + 1 < self.leaves.len() {
            Some(&self.leaves[idx].1)
        } else {
            None
        }
    }

    pub fn key_at(&self, idx: usize) -> Option<K> {
        self.leaves.get(idx).map(|&(k, _)| k)
    }

    /// Ensures a leaf exists exactly at `key` (which must already be within
    /// `[kmin, kmax]`), splitting the leaf that currently covers it if
    /// needed. Returns the index of that leaf.
    fn ensure_leaf(&mut self, key: K) -> usize {
        let idx = self.leaves.partition_point(|(k, _)| *k <= key);
        if self.leaves[idx - 1].0 == key {
            return idx - 1;
        }
        let value = self.leaves[idx - 1].1.clone();
        self.leaves.insert(idx, (key, value));
        idx
    }

    fn try_merge_at(&mut self, i: usize) -> bool {
        if i + 1 < self.leaves.len() - 1 && self.leaves[i].1 == self.leaves[i + 1].1 {
            self.leaves.remove(i + 1);
            true
        } else {
            false
        }
    }

    fn merge_around(&mut self, i: usize) {
        self.try_merge_at(i);
        if i > 0 {
            self.try_merge_at(i - 1);
        }
    }

    /// Shared implementation behind `insert_front`/`insert_back`: both
    /// produce the same result here, since the backing leaf list is a
    /// sorted array rather than a list walked from one end or the other —
    /// the distinction only matters for a pointer-chased linked list.
    fn set_range(&mut self, s: K, e: K, v: V) -> (usize, bool) {
        let s = s.max(self.min_key());
        let e = e.min(self.max_key());
        if s >= e {
            return self.search(s.min(self.max_key()));
        }
        self.invalidate_tree();
        self.ensure_leaf(s);
        self.ensure_leaf(e);
        let start_idx = self.floor_index(s).expect("s was just ensured as a leaf");
        let end_idx = self.floor_index(e).expect("e was just ensured as a leaf");
        let no_op = end_idx == start_idx + 1 && self.leaves[start_idx].1 == v;
        if end_idx > start_idx + 1 {
            self.leaves.drain(start_idx + 1..end_idx);
        }
        self.leaves[start_idx].1 = v;
        self.merge_around(start_idx);
        let final_idx = self
            .floor_index(s)
            .expect("s is still a valid key after merging");
        (final_idx, !no_op)
    }

    /// Sets `[s, e)` to `v`, clipped to `[kmin, kmax)`. Returns the index of
    /// the segment containing `s` and whether the structure changed.
    pub fn insert_front(&mut self, s: K, e: K, v: V) -> (usize, bool) {
        self.set_range(s, e, v)
    }

    /// Equivalent to [`Self::insert_front`] (see its implementation note).
    pub fn insert_back(&mut self, s: K, e: K, v: V) -> (usize, bool) {
        self.set_range(s, e, v)
    }

    /// Equivalent to [`Self::insert_front`]; `hint` is accepted for API
    /// parity but unused, since `set_range` already resolves its own
    /// boundaries in `O(log n)`.
    pub fn insert(&mut self, _hint: usize, s: K, e: K, v: V) -> (usize, bool) {
        self.set_range(s, e, v)
    }

    /// Removes `[s, e)`, shifting everything at or past `e` left by `e -
    /// s`. `kmax` stays fixed: it is a ceiling on the domain, not a value
    /// that tracks the last real leaf. A no-op (leaving the tree valid) if
    /// the range is empty or outside `[kmin, kmax)`.
    pub fn shift_left(&mut self, s: K, e: K) {
        let s = s.max(self.min_key());
        let e = e.min(self.max_key());
        if s >= e {
            return;
        }
        self.invalidate_tree();
        self.ensure_leaf(s);
        self.ensure_leaf(e);
        let start_idx = self.floor_index(s).unwrap();
        let end_idx = self.floor_index(e).unwrap();
        self.leaves.drain(start_idx..end_idx);
        let delta = e - s;
        // The sentinel (last leaf, pinned at `kmax`) never shifts.
        let last = self.leaves.len() - 1;
        for leaf in self.leaves[start_idx..last].iter_mut() {
            leaf.0 = leaf.0 - delta;
        }
        if start_idx < self.leaves.len() {
            self.merge_around(start_idx);
        }
    }

    /// Inserts `size` positions at `s`, shifting keys `> s` right by `size`;
    /// the newly exposed span takes [`Self::default_value`]. `kmax` stays
    /// fixed — any leaf whose shifted key would land at or past it is
    /// discarded rather than pushed beyond the domain. When `skip_start_node`
    /// is `true` and `s` already lands on a leaf boundary, that leaf is left
    /// in place and the inserted span appears immediately after it rather
    /// than in front.
    pub fn shift_right(&mut self, s: K, size: K, skip_start_node: bool) {
        let kmax = self.max_key();
        if s >= kmax {
            return;
        }
        self.invalidate_tree();
        let exact_boundary = self.leaves.iter().any(|&(k, _)| k == s);
        if exact_boundary && skip_start_node {
            // The leaf at `s` keeps its key and value; the newly-exposed
            // span inherits that value too, rather than getting its own
            // default-valued leaf, since the node was explicitly asked to
            // stay in place covering what follows it.
            let idx = self.floor_index(s).unwrap();
            self.shift_tail(idx + 1, size, kmax);
        } else {
            let idx = self.ensure_leaf(s);
            self.shift_tail(idx, size, kmax);
            self.leaves.insert(idx, (s, self.default.clone()));
            self.merge_around(idx);
        }
    }

    /// Adds `size` to every leaf key from `from` up to (but not including)
    /// the `kmax` sentinel, dropping any leaf whose shifted key would land
    /// at or past `kmax`.
    fn shift_tail(&mut self, mut idx: usize, size: K, kmax: K) {
        while idx + 1 < self.leaves.len() {
            let new_key = self.leaves[idx].0 + size;
            if new_key >= kmax {
                self.leaves.remove(idx);
            } else {
                self.leaves[idx].0 = new_key;
                idx += 1;
            }
        }
    }

    /// Leaf nodes in key order, including the `kmax` sentinel (whose value
    /// is unused).
    pub fn leaves(&self) -> impl DoubleEndedIterator<Item = (K, &V)> + '_ {
        self.leaves.iter().map(|&(k, ref v)| (k, v))
    }

    /// `[start, end)` segments in key order; the sentinel never starts one.
    pub fn segments(&self) -> impl Iterator<Item = Segment<K, V>> + '_ {
        self.leaves
            .windows(2)
            .map(|w| Segment { start: w[0].0, end: w[1].0, value: w[0].1.clone() })
    }
}

impl<K: Copy + PartialEq, V: PartialEq> PartialEq for FlatSegmentTree<K, V> {
    /// Structural equality over leaves and default value; the tree-built
    /// flag is a cache bit, not part of the value.
    fn eq(&self, other: &Self) -> bool {
        self.leaves == other.leaves && self.default == other.default
    }
}

impl<K: Copy + Eq, V: Eq> Eq for FlatSegmentTree<K, V> {}

impl<K: Copy + std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for FlatSegmentTree<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlatSegmentTree")
            .field("leaves", &self.leaves)
            .field("tree_valid", &self.tree_valid)
            .finish()
    }
}
