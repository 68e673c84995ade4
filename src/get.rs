//! Read-only typed accessors (§4.2.3 "Get").

use crate::block::BlockElement;
use crate::error::{MtvError, MtvResult};
use crate::tag::ElementTag;
use crate::MultiTypeVector;

impl MultiTypeVector {
    /// Reads the value at logical index `i`. Fails with `TypeError` if the
    /// position doesn't hold a block of type `T` (including `Empty`
    /// positions), `OutOfRange` if `i >= size()`.
    pub fn get<T: BlockElement>(&self, i: usize) -> MtvResult<&T> {
        let pos = self.position(i)?;
        self.get_at(pos)
    }

    /// The tag stored at `i`, without requiring a concrete type.
    pub fn get_type(&self, i: usize) -> MtvResult<ElementTag> {
        if i >= self.size {
            return Err(MtvError::out_of_range(format!(
                "index {i} exceeds size {}",
                self.size
            )));
        }
        let pos = self.position(i)?;
        Ok(self.blocks[pos.block_index].tag)
    }

    /// `true` if `i` holds no value.
    pub fn is_empty_at(&self, i: usize) -> MtvResult<bool> {
        Ok(self.get_type(i)? == ElementTag::Empty)
    }

    /// Takes ownership of the value at `i`, replacing its slot with `Empty`.
    /// Fails with `TypeError` if `i` doesn't hold a `T`.
    pub fn release_at<T: BlockElement>(&mut self, i: usize) -> MtvResult<T> {
        let value = self.get::<T>(i)?.clone();
        self.set_empty(i, i)?;
        Ok(value)
    }
}
