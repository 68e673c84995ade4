//! Segment tree (§4.4): a stabbing-query index over half-open intervals
//! `[low, high)`, each tagged with a caller-supplied identity `D`. Grounded
//! on the standard iterative array-backed segment tree (canonical
//! decomposition of a range update into `O(log n)` nodes, root-to-leaf walk
//! for the query) rather than a pointer-linked node tree, the same
//! flat-array choice `fst.rs` makes for its leaf list.

use crate::error::MtvResult;
use crate::logging;

pub struct SegmentTree<K, D> {
    segments: Vec<(K, K, D)>,
    endpoints: Vec<K>,
    nodes: Vec<Vec<D>>,
    leaf_base: usize,
    built: bool,
}

impl<K, D> SegmentTree<K, D>
where
    K: Copy + Ord,
    D: Clone + PartialEq,
{
    pub fn new() -> Self {
        SegmentTree {
            segments: Vec::new(),
            endpoints: Vec::new(),
            nodes: Vec::new(),
            leaf_base: 0,
            built: false,
        }
    }

    /// Appends `[low, high)` tagged `data`. Fails with `InvalidArg` if
    /// `high <= low`. A triple identical to one already present is silently
    /// skipped. Invalidates the built tree.
    pub fn insert(&mut self, low: K, high: K, data: D) -> MtvResult<()> {
        if high <= low {
            return Err(crate::error::MtvError::invalid_arg(
                "segment high must be greater than low",
            ));
        }
        if self
            .segments
            .iter()
            .any(|(l, h, d)| *l == low && *h == high && *d == data)
        {
            return Ok(());
        }
        self.segments.push((low, high, data));
        self.built = false;
        Ok(())
    }

    /// Removes every segment tagged `data`. Invalidates the built tree.
    pub fn remove(&mut self, data: &D) {
        self.segments.retain(|(_, _, d)| d != data);
        self.built = false;
    }

    pub fn empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn size(&self) -> usize {
        self.segments.len()
    }

    pub fn clear(&mut self) {
        self.segments.clear();
        self.endpoints.clear();
        self.nodes.clear();
        self.leaf_base = 0;
        self.built = false;
    }

    pub fn is_tree_valid(&self) -> bool {
        self.built
    }

    /// Builds a balanced tree over the sorted distinct endpoints of every
    /// stored segment, pushing each segment's identity down to every node
    /// whose elementary interval it fully contains (`O(n log n)`).
    pub fn build_tree(&mut self) {
        let mut pts: Vec<K> = self.segments.iter().flat_map(|(l, h, _)| [*l, *h]).collect();
        pts.sort();
        pts.dedup();
        let m = pts.len().saturating_sub(1);
        let leaf_base = if m == 0 { 0 } else { m.next_power_of_two() };
        self.endpoints = pts;
        self.leaf_base = leaf_base;
        self.nodes = vec![Vec::new(); 2 * leaf_base.max(1)];
        for (low, high, data) in self.segments.clone() {
            let lo = self
                .endpoints
                .binary_search(&low)
                .expect("low endpoint was just registered");
            let hi = self
                .endpoints
                .binary_search(&high)
                .expect("high endpoint was just registered");
            self.insert_canonical(lo, hi, data);
        }
        logging::segment_tree_rebuild(self.segments.len(), m);
        self.built = true;
    }

    /// Pushes `data` onto the `O(log n)` canonical nodes covering the
    /// elementary-interval range `[lo, hi)`.
    fn insert_canonical(&mut self, lo: usize, hi: usize, data: D) {
        let mut lo = lo + self.leaf_base;
        let mut hi = hi + self.leaf_base;
        while lo < hi {
            if lo % 2 == 1 {
                self.nodes[lo].push(data.clone());
                lo += 1;
            }
            if hi % 2 == 1 {
                hi -= 1;
                self.nodes[hi].push(data.clone());
            }
            lo /= 2;
            hi /= 2;
        }
    }

    /// Stabbing query: every identity of a segment containing `key`.
    /// Returns `None` if [`Self::build_tree`] hasn't been called since the
    /// last mutation. `O(log n + k)` where `k` is the result size.
    pub fn search(&self, key: K) -> Option<Vec<D>> {
        let mut result = Vec::new();
        if self.search_into(key, &mut result) {
            Some(result)
        } else {
            None
        }
    }

    /// Like [`Self::search`], appending into a caller-owned buffer instead
    /// of allocating a fresh one. Returns whether the tree was built.
    pub fn search_into(&self, key: K, result: &mut Vec<D>) -> bool {
        if !self.built {
            return false;
        }
        if self.endpoints.len() < 2 {
            return true;
        }
        if key < self.endpoints[0] || key >= *self.endpoints.last().unwrap() {
            return true;
        }
        let leaf_idx = self.endpoints.partition_point(|&x| x <= key) - 1;
        let mut node = leaf_idx + self.leaf_base;
        while node >= 1 {
            result.extend(self.nodes[node].iter().cloned());
            node /= 2;
        }
        true
    }
}

impl<K, D> Default for SegmentTree<K, D>
where
    K: Copy + Ord,
    D: Clone + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, D> Clone for SegmentTree<K, D>
where
    K: Copy + Ord,
    D: Clone + PartialEq,
{
    /// Clones the stored segments; the built tree, if any, is rebuilt
    /// lazily rather than copied, since `build_tree` is cheap relative to
    /// carrying the node arrays along.
    fn clone(&self) -> Self {
        SegmentTree {
            segments: self.segments.clone(),
            endpoints: Vec::new(),
            nodes: Vec::new(),
            leaf_base: 0,
            built: false,
        }
    }
}

impl<K: PartialEq, D: PartialEq> PartialEq for SegmentTree<K, D> {
    /// Structural equality over the stored segment set, regardless of
    /// insertion order or build state.
    fn eq(&self, other: &Self) -> bool {
        if self.segments.len() != other.segments.len() {
            return false;
        }
        self.segments
            .iter()
            .all(|s| other.segments.iter().any(|o| o == s))
    }
}

impl<K: std::fmt::Debug, D: std::fmt::Debug> std::fmt::Debug for SegmentTree<K, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentTree")
            .field("segments", &self.segments)
            .field("built", &self.built)
            .finish()
    }
}
