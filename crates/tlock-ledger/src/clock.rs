//! # Chain Clock
//!
//! The clock is read-only from the wallet's point of view. Heights are
//! monotonically non-decreasing: [`SimulatedChain`] has no way to move
//! backwards.

use tlock_core::BlockHeight;

/// Source of the current block height.
pub trait ChainClock {
    /// The height of the block currently being executed.
    fn current_height(&self) -> BlockHeight;
}

/// A fixed height is a valid (frozen) clock.
impl ChainClock for BlockHeight {
    fn current_height(&self) -> BlockHeight {
        *self
    }
}

/// Deterministic chain whose height advances only by mining.
#[derive(Debug, Clone, Default)]
pub struct SimulatedChain {
    height: BlockHeight,
}

impl SimulatedChain {
    /// Start a chain at `genesis`.
    pub fn new(genesis: BlockHeight) -> Self {
        Self { height: genesis }
    }

    /// Mine a single block and return the new height.
    pub fn mine_block(&mut self) -> BlockHeight {
        self.mine_empty_blocks(1)
    }

    /// Mine `count` empty blocks and return the new height.
    pub fn mine_empty_blocks(&mut self, count: u64) -> BlockHeight {
        self.height = self.height.saturating_add(count);
        tracing::debug!(count, height = %self.height, "mined blocks");
        self.height
    }
}

impl ChainClock for SimulatedChain {
    fn current_height(&self) -> BlockHeight {
        self.height
    }
}
