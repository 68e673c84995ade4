//! Writes that don't change `size()`: overwriting an existing span with
//! typed values or `Empty`, plus the writes that do (`insert*`, `push_back*`)
//! (§4.2.3 "Set"/"Insert").

use crate::block::{BlockElement, ElementBlock};
use crate::common::Replacement;
use crate::error::MtvResult;
use crate::MultiTypeVector;

impl MultiTypeVector {
    /// Overwrites the single position `i` with `v`. Handles all four cases
    /// of §4.2.3: same-tag overwrite in place, whole-block replacement,
    /// and splitting off the top, bottom, or middle of a differently-tagged
    /// block.
    pub fn set<T: BlockElement>(&mut self, i: usize, v: T) -> MtvResult<()> {
        self.set_values(i, &[v])
    }

    /// Overwrites `[i, i+values.len())` with `values`, which must not cross
    /// `size()`.
    pub fn set_values<T: BlockElement>(&mut self, i: usize, values: &[T]) -> MtvResult<()> {
        if values.is_empty() {
            return Ok(());
        }
        let len = values.len();
        let pos = self.position(i)?;
        if pos.block_index < self.blocks.len()
            && self.blocks[pos.block_index].tag == T::element_tag()
            && pos.offset + len <= self.blocks[pos.block_index].size
        {
            self.blocks[pos.block_index]
                .data
                .as_mut()
                .expect("typed block must carry data")
                .set_values(pos.offset, values)?;
            return Ok(());
        }
        self.splice_logical(i, len, Replacement::Typed(ElementBlock::from_values(values.to_vec())))?;
        Ok(())
    }

    /// Overwrites `[i, j]` inclusive with `Empty`. A no-op if `j < i`.
    pub fn set_empty(&mut self, i: usize, j: usize) -> MtvResult<()> {
        if j < i {
            return Ok(());
        }
        let len = j - i + 1;
        self.splice_logical(i, len, Replacement::Empty(len))?;
        Ok(())
    }

    /// Inserts `values` before position `i`, growing `size()` by
    /// `values.len()`.
    pub fn insert<T: BlockElement>(&mut self, i: usize, values: &[T]) -> MtvResult<()> {
        if values.is_empty() {
            return Ok(());
        }
        self.splice_logical(
            i,
            0,
            Replacement::Typed(ElementBlock::from_values(values.to_vec())),
        )?;
        Ok(())
    }

    /// Inserts `n` `Empty` positions before `i`, growing `size()` by `n`.
    pub fn insert_empty(&mut self, i: usize, n: usize) -> MtvResult<()> {
        if n == 0 {
            return Ok(());
        }
        self.splice_logical(i, 0, Replacement::Empty(n))?;
        Ok(())
    }

    /// Appends `v` after the last position.
    pub fn push_back<T: BlockElement>(&mut self, v: T) -> MtvResult<()> {
        let size = self.size;
        self.insert(size, &[v])
    }

    /// Appends one `Empty` position.
    pub fn push_back_empty(&mut self) -> MtvResult<()> {
        let size = self.size;
        self.insert_empty(size, 1)
    }
}
