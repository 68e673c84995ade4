//! Operations that change `size()` by removing positions (§4.2.3 "Erase",
//! §4.2.1 "resize").

use crate::common::Replacement;
use crate::error::MtvResult;
use crate::MultiTypeVector;

impl MultiTypeVector {
    /// Removes `[i, j]` inclusive, shifting everything after it left by
    /// `j - i + 1`. A no-op if `j < i`.
    pub fn erase(&mut self, i: usize, j: usize) -> MtvResult<()> {
        if j < i {
            return Ok(());
        }
        self.splice_logical(i, j - i + 1, Replacement::Nothing)?;
        Ok(())
    }

    /// Grows or shrinks the container to exactly `n` positions. Growing
    /// appends `Empty`; shrinking truncates from the tail, releasing
    /// whatever the truncated positions held.
    pub fn resize(&mut self, n: usize) -> MtvResult<()> {
        if n > self.size {
            let extra = n - self.size;
            let size = self.size;
            self.insert_empty(size, extra)
        } else if n < self.size {
            let size = self.size;
            self.erase(n, size - 1)
        } else {
            Ok(())
        }
    }
}
