//! # tlock-state — Escrow State Machine
//!
//! A single-asset time-locked escrow. One owner deposits a fixed amount,
//! naming a beneficiary and an unlock height. Nothing can be withdrawn
//! before that height; afterwards only the current beneficiary may claim.
//! The beneficiary may hand the claim right to another principal
//! (`bestow`) any number of times before claiming.
//!
//! ## States
//!
//! ```text
//! Uninitialized --lock--> Locked --claim--> Claimed
//!                          |  ^
//!                          +--+ bestow
//! ```
//!
//! `Claimed` is terminal: further `claim` and `bestow` calls by the
//! beneficiary fail with code 106.
//!
//! ## Atomicity
//!
//! Every operation checks all of its preconditions before touching
//! anything. The asset transfer is the only step that can still fail, and
//! it runs before the record is written, so a failed call leaves both the
//! record and all balances exactly as they were.
//!
//! ## Error Codes
//!
//! See [`codes`] for the stable numeric codes returned to callers.

pub mod error;
pub mod wallet;

pub use error::{codes, AuthorizedRole, WalletError};
pub use wallet::{
    CallContext, LockRecord, Operation, TimelockedWallet, WalletState, WalletTransition,
};
