//! Optional acquire/release notifications for element-block lifecycle (§4.2.6).

use crate::tag::ElementTag;

/// Describes the block a lifecycle event fired for. Intentionally carries no
/// element data — only enough for a subscriber to track counts and tags.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockInfo {
    pub tag: ElementTag,
    pub size: usize,
}

/// Implemented by callers that want to observe block creation/destruction,
/// including the boundary pieces produced by splits and transfers.
pub trait EventHandler {
    fn element_block_acquired(&mut self, block: BlockInfo);
    fn element_block_released(&mut self, block: BlockInfo);
}

/// The default handler: observes nothing. Used when a container is
/// constructed without an explicit handler.
#[derive(Default)]
pub struct NoopEventHandler;

impl EventHandler for NoopEventHandler {
    fn element_block_acquired(&mut self, _block: BlockInfo) {}
    fn element_block_released(&mut self, _block: BlockInfo) {}
}
