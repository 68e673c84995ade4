//! Thin wrappers around the `log` crate used at structural mutation points.
//!
//! Kept separate from the mutation code itself so the call sites read as a
//! single line ("a block split happened") rather than a multi-field
//! `log::trace!` literal repeated at every call site — the same texture as
//! `fjall-rs-lsm-tree`'s `src/compaction/worker.rs`, which logs compaction
//! events through small named helpers rather than inline macros.

use crate::tag::ElementTag;

#[inline]
pub(crate) fn block_split(tag: ElementTag, at: usize) {
    log::trace!("block split: tag={tag} at position={at}");
}

#[inline]
pub(crate) fn block_merge(tag: ElementTag, left_pos: usize, right_pos: usize) {
    log::trace!("block merge: tag={tag} left={left_pos} right={right_pos}");
}

#[inline]
pub(crate) fn block_destroy(tag: ElementTag, pos: usize, size: usize) {
    log::trace!("block destroy: tag={tag} pos={pos} size={size}");
}

#[inline]
pub(crate) fn fst_rebuild(leaf_count: usize) {
    log::debug!("flat segment tree rebuilt: {leaf_count} leaves");
}

#[inline]
pub(crate) fn segment_tree_rebuild(segment_count: usize, elementary_intervals: usize) {
    log::debug!(
        "segment tree rebuilt: {segment_count} segments over {elementary_intervals} elementary intervals"
    );
}
