//! A block-structured, type-heterogeneous sequence container (§3).
//!
//! A [`MultiTypeVector`] partitions logical positions `[0, size())` into an
//! ordered run of blocks, each holding a dense `Vec<T>` of one element type
//! (or no storage at all, for `Empty` runs). Mirrors the teacher's top-level
//! `BPlusTreeMap`: construction, sizing and equality live here; each family
//! of mutating operations gets its own module (`get`, `insert`, `erase`,
//! `transfer`), and the block-list bookkeeping they all share lives in
//! `common`.
//!
//! Two companion index structures live alongside it: [`FlatSegmentTree`], a
//! piecewise-constant value map, and [`SegmentTree`], a stabbing-query
//! interval index. Both are standalone — they don't borrow from or wrap a
//! `MultiTypeVector` — but share its error type and logging conventions.

mod block;
mod common;
mod erase;
mod error;
mod event;
mod fst;
mod get;
mod insert;
mod iterate;
mod logging;
mod segment_tree;
mod tag;
mod transfer;

use std::rc::Rc;

pub use block::{BlockConfig, BlockElement, ElementBlock, UserTagOps};
pub use common::DetachedBlock;
pub use error::{MtvError, MtvResult};
pub use event::{BlockInfo, EventHandler, NoopEventHandler};
pub use fst::{FlatSegmentTree, Segment};
pub use iterate::{BlockIter, BlockView, Position};
pub use segment_tree::SegmentTree;
pub use tag::{ElementTag, TypedElement};

use common::BlockRecord;

/// The container itself. See the module documentation for the overall
/// shape; individual operations are documented where they're implemented.
pub struct MultiTypeVector {
    pub(crate) blocks: Vec<BlockRecord>,
    pub(crate) size: usize,
    pub(crate) config: Rc<BlockConfig>,
    pub(crate) handler: Option<Box<dyn EventHandler>>,
}

impl MultiTypeVector {
    /// An empty container with no registered user tags and no event handler.
    pub fn new() -> Self {
        MultiTypeVector {
            blocks: Vec::new(),
            size: 0,
            config: Rc::new(BlockConfig::new()),
            handler: None,
        }
    }

    /// An empty container sharing `config`'s user-tag registrations — use
    /// this to construct several vectors that store the same user tags.
    pub fn with_config(config: Rc<BlockConfig>) -> Self {
        MultiTypeVector {
            blocks: Vec::new(),
            size: 0,
            config,
            handler: None,
        }
    }

    /// Attaches `handler` so it's notified of block acquisition/release from
    /// this point on. Replaces any previously attached handler.
    pub fn set_event_handler(&mut self, handler: Box<dyn EventHandler>) {
        self.handler = Some(handler);
    }

    /// Detaches and returns the currently attached event handler, if any.
    pub fn take_event_handler(&mut self) -> Option<Box<dyn EventHandler>> {
        self.handler.take()
    }

    /// `size` positions, all `Empty`.
    pub fn with_size(size: usize) -> Self {
        let mut mtv = Self::new();
        if size > 0 {
            mtv.blocks.push(BlockRecord::empty(0, size));
            mtv.size = size;
        }
        mtv
    }

    /// `size` positions, all holding a clone of `value`.
    pub fn with_size_value<T: BlockElement>(size: usize, value: T) -> Self {
        let mut mtv = Self::new();
        if size > 0 {
            let block = ElementBlock::from_values(vec![value; size]);
            mtv.blocks.push(BlockRecord::typed(0, block));
            mtv.size = size;
        }
        mtv
    }

    /// Builds a container of `len` positions from `values`, which must yield
    /// exactly `len` items. Fails with `InvalidArg` on a length mismatch.
    pub fn from_values<T: BlockElement>(
        len: usize,
        values: impl IntoIterator<Item = T>,
    ) -> MtvResult<Self> {
        let collected: Vec<T> = values.into_iter().collect();
        if collected.len() != len {
            return Err(MtvError::invalid_arg(format!(
                "expected {len} values, got {}",
                collected.len()
            )));
        }
        let mut mtv = Self::new();
        if len > 0 {
            let block = ElementBlock::from_values(collected);
            mtv.blocks.push(BlockRecord::typed(0, block));
            mtv.size = len;
        }
        Ok(mtv)
    }

    /// Total logical length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// `true` if `size() == 0`.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of blocks currently in the container.
    pub fn block_size(&self) -> usize {
        self.blocks.len()
    }

    /// Block-list storage capacity, exposed for callers tuning allocation
    /// behavior around bulk inserts.
    pub fn capacity(&self) -> usize {
        self.blocks.capacity()
    }

    /// Releases excess block-list capacity back to the allocator.
    pub fn shrink_to_fit(&mut self) {
        self.blocks.shrink_to_fit();
    }

    /// Empties the container, releasing every block's contents and firing a
    /// release event for each. Registered user tags and event handler are
    /// kept.
    pub fn clear(&mut self) -> MtvResult<()> {
        for mut removed in self.blocks.drain(..) {
            if let Some(data) = removed.data.as_mut() {
                data.release(&self.config)?;
            }
            if let Some(h) = self.handler.as_mut() {
                h.element_block_released(removed.info());
            }
        }
        self.size = 0;
        Ok(())
    }

    /// Swaps the block lists and sizes of `self` and `other` in place.
    /// Configs and event handlers stay with their original container.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.blocks, &mut other.blocks);
        std::mem::swap(&mut self.size, &mut other.size);
    }

    /// Detaches every block without invoking per-block release hooks,
    /// handing ownership of the raw contents to the caller. Use this (rather
    /// than [`Self::clear`]) when the caller, not the container, is about to
    /// take responsibility for any resources a user-tag block owns.
    pub fn release(&mut self) -> Vec<DetachedBlock> {
        self.size = 0;
        self.blocks
            .drain(..)
            .map(|b| DetachedBlock {
                position: b.position,
                size: b.size,
                tag: b.tag,
                data: b.data,
            })
            .collect()
    }

    /// Checks the block-list invariants of §8: block sizes sum to `size()`,
    /// positions are contiguous and strictly increasing, and no two
    /// adjacent blocks share a tag.
    pub fn check_block_integrity(&self) -> MtvResult<()> {
        let mut expected_pos = 0usize;
        for (idx, b) in self.blocks.iter().enumerate() {
            if b.position != expected_pos {
                return Err(MtvError::general(format!(
                    "block {idx} has position {} but expected {expected_pos}",
                    b.position
                )));
            }
            if idx > 0 && self.blocks[idx - 1].tag == b.tag {
                return Err(MtvError::general(format!(
                    "adjacent blocks {} and {idx} share tag {}",
                    idx - 1,
                    b.tag
                )));
            }
            let data_len = b.data.as_ref().map(|d| d.len());
            if let Some(len) = data_len {
                if len != b.size {
                    return Err(MtvError::general(format!(
                        "block {idx} declares size {} but holds {len} values",
                        b.size
                    )));
                }
            }
            expected_pos += b.size;
        }
        if expected_pos != self.size {
            return Err(MtvError::general(format!(
                "block sizes sum to {expected_pos} but size() is {}",
                self.size
            )));
        }
        Ok(())
    }
}

impl Default for MultiTypeVector {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MultiTypeVector {
    /// Deep-clones every block's contents. The registered-tag configuration
    /// is shared (cheap `Rc` bump, not a deep copy — the hook table is fixed
    /// once registered and logically belongs to the schema, not any one
    /// instance). The event handler is never cloned, since there's no
    /// general way to duplicate an arbitrary `Box<dyn EventHandler>`; the
    /// clone starts with no handler attached.
    fn clone(&self) -> Self {
        let blocks = self
            .blocks
            .iter()
            .map(|b| BlockRecord {
                position: b.position,
                size: b.size,
                tag: b.tag,
                data: b
                    .data
                    .as_ref()
                    .map(|d| d.clone_block(&self.config))
                    .transpose()
                    .expect("cloning a block failed: a user tag lost its registration"),
            })
            .collect();
        MultiTypeVector {
            blocks,
            size: self.size,
            config: Rc::clone(&self.config),
            handler: None,
        }
    }
}

impl PartialEq for MultiTypeVector {
    /// Structural equality: same length, same block boundaries, same
    /// values. Event handlers are never compared.
    fn eq(&self, other: &Self) -> bool {
        if self.size != other.size || self.blocks.len() != other.blocks.len() {
            return false;
        }
        self.blocks.iter().zip(other.blocks.iter()).all(|(a, b)| {
            a.tag == b.tag
                && a.size == b.size
                && match (&a.data, &b.data) {
                    (Some(x), Some(y)) => x.equal(y, &self.config),
                    (None, None) => true,
                    _ => false,
                }
        })
    }
}

impl Eq for MultiTypeVector {}

impl std::fmt::Debug for MultiTypeVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiTypeVector")
            .field("size", &self.size)
            .field("block_size", &self.blocks.len())
            .finish()
    }
}
