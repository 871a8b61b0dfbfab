//! # tlock-ledger — Chain Clock and Asset Transfer Service
//!
//! The escrow state machine never reads a block height or moves a balance
//! on its own. It consumes two collaborators defined here:
//!
//! - **Chain clock** ([`clock`]): the [`ChainClock`] trait exposing the
//!   current block height, plus [`SimulatedChain`], a deterministic clock
//!   that only moves forward when blocks are mined.
//!
//! - **Asset transfer** ([`transfer`]): the [`AssetTransfer`] trait that
//!   moves the native asset between principals atomically, the
//!   [`TransferError`] codes it reports, and [`InMemoryLedger`], a balance
//!   table that records a [`ChainEvent`] for every committed transfer.
//!
//! Mock and real implementations are interchangeable behind the traits,
//! so the wallet can be tested without a live chain.

pub mod clock;
pub mod event;
pub mod transfer;

pub use clock::{ChainClock, SimulatedChain};
pub use event::{ChainEvent, TransferEvent};
pub use transfer::{AssetTransfer, InMemoryLedger, TransferError, TRANSFER_CODES};
