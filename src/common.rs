//! Shared block-list bookkeeping used by every mutating operation: position
//! renumbering, same-tag neighbor merging, and the acquire/release event
//! hook. Mirrors the teacher's `common.rs`, which centralizes the raw
//! pointer bookkeeping its node-splitting operations share — here the
//! bookkeeping is safe `Vec<BlockRecord>` splicing instead.

use crate::block::ElementBlock;
use crate::error::MtvResult;
use crate::event::BlockInfo;
use crate::logging;
use crate::tag::ElementTag;
use crate::MultiTypeVector;

/// A block handed back by [`MultiTypeVector::release`]: the caller now owns
/// whatever resources it holds, and the container has forgotten about it
/// without running any release hook.
pub struct DetachedBlock {
    pub position: usize,
    pub size: usize,
    pub tag: ElementTag,
    pub data: Option<ElementBlock>,
}

/// What to put in place of a logical span removed by
/// [`MultiTypeVector::splice_logical`].
pub(crate) enum Replacement {
    /// Nothing — the span is simply gone (erase).
    Nothing,
    /// `n` `Empty` positions.
    Empty(usize),
    /// A single typed block.
    Typed(ElementBlock),
}

impl Replacement {
    fn len(&self) -> usize {
        match self {
            Replacement::Nothing => 0,
            Replacement::Empty(n) => *n,
            Replacement::Typed(b) => b.len(),
        }
    }
}

pub(crate) struct BlockRecord {
    pub position: usize,
    pub size: usize,
    pub tag: ElementTag,
    pub data: Option<ElementBlock>,
}

impl BlockRecord {
    pub(crate) fn empty(position: usize, size: usize) -> Self {
        BlockRecord {
            position,
            size,
            tag: ElementTag::Empty,
            data: None,
        }
    }

    pub(crate) fn typed(position: usize, data: ElementBlock) -> Self {
        let size = data.len();
        BlockRecord {
            position,
            size,
            tag: data.tag(),
            data: Some(data),
        }
    }

    pub(crate) fn info(&self) -> BlockInfo {
        BlockInfo {
            tag: self.tag,
            size: self.size,
        }
    }
}

impl MultiTypeVector {
    pub(crate) fn fire_acquired(&mut self, info: BlockInfo) {
        if let Some(h) = self.handler.as_mut() {
            h.element_block_acquired(info);
        }
    }

    pub(crate) fn fire_released(&mut self, info: BlockInfo) {
        if let Some(h) = self.handler.as_mut() {
            h.element_block_released(info);
        }
    }

    /// Recomputes absolute `position` fields for `blocks[from..]` from their
    /// sizes. Needed whenever a block is inserted, removed, grown, or
    /// shrunk — merging two same-tag blocks needs no renumbering, since the
    /// combined span's start is unchanged.
    pub(crate) fn renumber_from(&mut self, from: usize) {
        let mut pos = if from == 0 {
            0
        } else {
            self.blocks[from - 1].position + self.blocks[from - 1].size
        };
        for b in &mut self.blocks[from..] {
            b.position = pos;
            pos += b.size;
        }
    }

    /// Merges `blocks[i+1]` into `blocks[i]` if they share a tag. Returns
    /// `true` if a merge happened, in which case the block at index `i` now
    /// holds the combined span and `blocks[i+1]` no longer exists.
    pub(crate) fn try_merge_pair(&mut self, i: usize) -> MtvResult<bool> {
        if i + 1 >= self.blocks.len() || self.blocks[i].tag != self.blocks[i + 1].tag {
            return Ok(false);
        }
        let right = self.blocks.remove(i + 1);
        let left = &mut self.blocks[i];
        left.size += right.size;
        if let (Some(left_data), Some(right_data)) = (left.data.as_mut(), right.data) {
            left_data.append_block(right_data, &self.config)?;
        }
        logging::block_merge(left.tag, left.position, right.position);
        Ok(true)
    }

    /// Tries to merge the block at `i` with its left and right neighbors.
    /// Returns the index of the block that ends up containing what was at
    /// `i` before the call (it never moves left of where `i` pointed, since
    /// a left merge keeps the left block's index).
    pub(crate) fn try_merge_around(&mut self, i: usize) -> MtvResult<usize> {
        let mut idx = i;
        if idx > 0 && self.try_merge_pair(idx - 1)? {
            idx -= 1;
        }
        self.try_merge_pair(idx)?;
        Ok(idx)
    }

    /// Ensures a block boundary exists exactly at logical position `pos`,
    /// splitting the block that straddles it if necessary. The split-off
    /// suffix is a newly acquired block (§4.2.6 counts splits as a creation
    /// of the boundary piece); the shrunk prefix keeps its identity, so no
    /// release event fires for it and no renumbering is needed — the
    /// overall size is unchanged and every other block keeps its absolute
    /// position. Returns the index of the block starting at `pos` (or
    /// `block_size()` if `pos == size()`).
    pub(crate) fn ensure_boundary(&mut self, pos: usize) -> MtvResult<usize> {
        if pos == self.size {
            return Ok(self.blocks.len());
        }
        let p = self.position(pos)?;
        if p.offset == 0 {
            return Ok(p.block_index);
        }
        let idx = p.block_index;
        let old_position = self.blocks[idx].position;
        let old_size = self.blocks[idx].size;
        let suffix_len = old_size - p.offset;
        let suffix_data = match self.blocks[idx].data.as_mut() {
            Some(d) => Some(d.split_off(p.offset)?),
            None => None,
        };
        self.blocks[idx].size = p.offset;
        logging::block_split(self.blocks[idx].tag, old_position + p.offset);
        let suffix_record = match suffix_data {
            Some(d) => BlockRecord::typed(old_position + p.offset, d),
            None => BlockRecord::empty(old_position + p.offset, suffix_len),
        };
        let info = suffix_record.info();
        self.blocks.insert(idx + 1, suffix_record);
        self.fire_acquired(info);
        Ok(idx + 1)
    }

    /// Replaces the logical span `[start, start+len)` with `replacement`,
    /// shared machinery behind every structural mutation in `insert.rs`,
    /// `erase.rs` and `transfer.rs`. Splits at both boundaries so the
    /// affected blocks line up exactly with the span, removes them, splices
    /// in the replacement, merges it with same-tag neighbors, and returns
    /// the index of the block now holding the replacement (or its right
    /// neighbor, if nothing was inserted).
    pub(crate) fn splice_logical(
        &mut self,
        start: usize,
        len: usize,
        replacement: Replacement,
    ) -> MtvResult<usize> {
        if start > self.size || start + len > self.size {
            return Err(crate::error::MtvError::out_of_range(format!(
                "span [{start}, {}) exceeds size {}",
                start + len,
                self.size
            )));
        }
        let inserted_len = replacement.len();
        let left_idx = self.ensure_boundary(start)?;
        let right_idx = self.ensure_boundary(start + len)?;
        for idx in (left_idx..right_idx).rev() {
            let mut removed = self.blocks.remove(idx);
            if let Some(data) = removed.data.as_mut() {
                data.release(&self.config)?;
            }
            logging::block_destroy(removed.tag, removed.position, removed.size);
            self.fire_released(removed.info());
        }
        let insert_idx = left_idx;
        match replacement {
            Replacement::Nothing => {}
            Replacement::Empty(n) => {
                if n > 0 {
                    let rec = BlockRecord::empty(0, n);
                    let info = rec.info();
                    self.blocks.insert(insert_idx, rec);
                    self.fire_acquired(info);
                }
            }
            Replacement::Typed(block) => {
                let rec = BlockRecord::typed(0, block);
                let info = rec.info();
                self.blocks.insert(insert_idx, rec);
                self.fire_acquired(info);
            }
        }
        self.renumber_from(insert_idx);
        self.size = self.size - len + inserted_len;
        self.try_merge_around(insert_idx)
    }

    /// Tries to merge the run of freshly-inserted blocks `[first_idx,
    /// last_idx]` with whatever now sits just outside it on either side.
    /// Unlike [`Self::try_merge_around`], which only needs to look at a
    /// single seam, a multi-block splice (§4.2.5 transfer/swap) has two
    /// independent seams — one before `first_idx`, one after `last_idx` —
    /// and the blocks already inside the run can't merge with each other
    /// (they came from a valid block list, which never has adjacent
    /// same-tag runs).
    pub(crate) fn merge_run_boundaries(&mut self, first_idx: usize, last_idx: usize) -> MtvResult<()> {
        self.try_merge_pair(last_idx)?;
        if first_idx > 0 {
            self.try_merge_pair(first_idx - 1)?;
        }
        Ok(())
    }

    /// Removes the blocks spanning logical `[start, start+len)`, splitting
    /// at both boundaries first so they line up exactly. Unlike
    /// `splice_logical`, this does **not** call each block's release hook —
    /// the caller is about to hand the extracted blocks to another
    /// container, not destroy them — but it does fire the release event for
    /// each, since the block *entities* are still being destroyed here.
    /// Returns the index the removed run started at, and the removed
    /// records (still carrying their data).
    pub(crate) fn extract_range(&mut self, start: usize, len: usize) -> MtvResult<(usize, Vec<BlockRecord>)> {
        if start + len > self.size {
            return Err(crate::error::MtvError::out_of_range(format!(
                "span [{start}, {}) exceeds size {}",
                start + len,
                self.size
            )));
        }
        if len == 0 {
            let idx = self.ensure_boundary(start)?;
            return Ok((idx, Vec::new()));
        }
        let left_idx = self.ensure_boundary(start)?;
        let right_idx = self.ensure_boundary(start + len)?;
        let mut extracted = Vec::with_capacity(right_idx - left_idx);
        for idx in (left_idx..right_idx).rev() {
            let removed = self.blocks.remove(idx);
            self.fire_released(removed.info());
            extracted.push(removed);
        }
        extracted.reverse();
        Ok((left_idx, extracted))
    }

    /// Splices `blocks` in at index `at` without changing `size()` — the
    /// counterpart to [`Self::extract_range`], used when the caller just
    /// removed an equal-length span at the same spot (a transfer's
    /// destination-side emptying, or either side of a range swap).
    pub(crate) fn insert_blocks_replace(&mut self, at: usize, blocks: Vec<BlockRecord>) -> MtvResult<()> {
        self.splice_blocks(at, blocks, false)
    }

    /// Splices `blocks` in at index `at`, growing `size()` by their total
    /// length — the destination side of a transfer.
    pub(crate) fn insert_blocks_grow(&mut self, at: usize, blocks: Vec<BlockRecord>) -> MtvResult<()> {
        self.splice_blocks(at, blocks, true)
    }

    fn splice_blocks(&mut self, at: usize, blocks: Vec<BlockRecord>, grow: bool) -> MtvResult<()> {
        if blocks.is_empty() {
            return Ok(());
        }
        let added: usize = blocks.iter().map(|b| b.size).sum();
        let first_idx = at;
        let mut idx = at;
        for b in blocks {
            let rec = BlockRecord {
                position: 0,
                size: b.size,
                tag: b.tag,
                data: b.data,
            };
            let info = rec.info();
            self.blocks.insert(idx, rec);
            self.fire_acquired(info);
            idx += 1;
        }
        self.renumber_from(first_idx);
        if grow {
            self.size += added;
        }
        self.merge_run_boundaries(first_idx, idx - 1)
    }
}
