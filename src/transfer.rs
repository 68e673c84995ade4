//! Cross-container range exchange (§4.2.5): moving or swapping a span of
//! positions between two `MultiTypeVector`s without touching the values
//! themselves — the receiving container takes ownership of the same
//! `ElementBlock` data the source held, rather than cloning it.

use crate::common::BlockRecord;
use crate::error::{MtvError, MtvResult};
use crate::MultiTypeVector;

impl MultiTypeVector {
    /// Moves `[i, j]` inclusive out of `self` into `dst` starting at `k`,
    /// growing `dst` by `j - i + 1` and leaving `Empty` behind in `self`
    /// (size unchanged). A no-op if `j < i`. Fails with `OutOfRange` if
    /// either range falls outside its container.
    pub fn transfer(&mut self, i: usize, j: usize, dst: &mut MultiTypeVector, k: usize) -> MtvResult<()> {
        if j < i {
            return Ok(());
        }
        if k > dst.size {
            return Err(MtvError::out_of_range(format!(
                "destination index {k} exceeds size {}",
                dst.size
            )));
        }
        let len = j - i + 1;
        let (left_idx, extracted) = self.extract_range(i, len)?;
        self.insert_blocks_replace(left_idx, vec![BlockRecord::empty(0, len)])?;
        let dst_left = dst.ensure_boundary(k)?;
        dst.insert_blocks_grow(dst_left, extracted)
    }

    /// Exchanges `[i, j]` inclusive in `self` with the equal-length span
    /// starting at `k` in `dst`. Neither container's `size()` changes. A
    /// no-op if `j < i`.
    pub fn swap_range(&mut self, i: usize, j: usize, dst: &mut MultiTypeVector, k: usize) -> MtvResult<()> {
        if j < i {
            return Ok(());
        }
        let len = j - i + 1;
        if k + len > dst.size {
            return Err(MtvError::out_of_range(format!(
                "destination span [{k}, {}) exceeds size {}",
                k + len,
                dst.size
            )));
        }
        let (self_left, self_extracted) = self.extract_range(i, len)?;
        let (dst_left, dst_extracted) = dst.extract_range(k, len)?;
        self.insert_blocks_replace(self_left, dst_extracted)?;
        dst.insert_blocks_replace(dst_left, self_extracted)?;
        Ok(())
    }
}
