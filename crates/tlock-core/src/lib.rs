#![deny(missing_docs)]

//! # tlock-core — Foundational Types for the Time-Locked Wallet
//!
//! This crate defines the primitive types that every other crate in the
//! workspace depends on. It has no internal crate dependencies — only `serde` and
//! `thiserror` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Validated principals.** A [`Principal`] is either a standard account
//!    address or a contract identifier (`<issuer>.<name>`). Both forms are
//!    checked at construction; there is no way to hold a malformed one.
//!
//! 2. **Newtypes for chain quantities.** [`BlockHeight`] and [`Amount`] are
//!    distinct types. An unlock height cannot be passed where an escrow
//!    amount is expected.
//!
//! 3. **Amounts serialize as decimal strings.** Transfer events and
//!    receipts carry `"amount": "10"`, never a float.
//!
//! 4. **[`TlockError`] hierarchy.** Structured errors with `thiserror` — no
//!    `Box<dyn Error>`, no `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod quantity;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{TlockError, ValidationError};
pub use identity::Principal;
pub use quantity::{Amount, BlockHeight};
