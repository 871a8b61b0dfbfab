//! # tlock-cli — Command Line Interface for the Time-Locked Wallet
//!
//! Provides the `tlock` binary. Every subcommand builds a fresh
//! [`Simnet`](tlock_simnet::Simnet) from the configured accounts.
//!
//! ## Subcommands
//!
//! - `tlock run <SCRIPT>` — execute a YAML scenario and check its expectations.
//! - `tlock accounts` — list configured accounts and genesis balances.
//! - `tlock codes` — print the stable error-code table.
//!
//! ```bash
//! tlock run scenarios/claim.yaml
//! tlock --config devnet.yaml accounts --json
//! tlock codes
//! ```

pub mod accounts;
pub mod codes;
pub mod run;

use std::path::Path;

use anyhow::{Context, Result};
use tlock_simnet::SimnetConfig;

/// Load the simnet configuration.
///
/// An explicit `--config` path wins; otherwise `TLOCK_CONFIG` is consulted
/// and the devnet defaults apply when it is unset.
pub fn load_config(path: Option<&Path>) -> Result<SimnetConfig> {
    match path {
        Some(path) => SimnetConfig::from_path(path)
            .with_context(|| format!("failed to load config: {}", path.display())),
        None => SimnetConfig::from_env().context("failed to load config from environment"),
    }
}
