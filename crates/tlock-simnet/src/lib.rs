//! # tlock-simnet — Simulation Network
//!
//! A deterministic, in-process chain for exercising the wallet the way a
//! contract test harness would:
//!
//! - **Configuration** ([`config`]): devnet accounts, genesis height and
//!   contract name, loaded from YAML or taken from built-in defaults.
//!
//! - **Simnet** ([`simnet`]): deploys the wallet, mines blocks, and
//!   executes public function calls, each returning a [`CallReceipt`]
//!   with the call's result and exactly the events it emitted.
//!
//! - **Values** ([`value`]): typed call arguments (`uint`, `principal`)
//!   and results (`ok`, `err`).

pub mod config;
pub mod error;
pub mod simnet;
pub mod value;

pub use config::{AccountConfig, SimnetConfig, CONFIG_ENV_VAR};
pub use error::SimnetError;
pub use simnet::{CallReceipt, Simnet};
pub use value::{CallResult, Value};
