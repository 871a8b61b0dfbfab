//! # Codes Subcommand
//!
//! Prints every stable numeric code a call can fail with: wallet
//! rejections first, then the asset-layer codes a failed transfer
//! propagates.

use std::io::Write;

use anyhow::Result;

/// Execute the codes subcommand.
pub fn run_codes(out: &mut impl Write) -> Result<u8> {
    writeln!(out, "wallet")?;
    for (code, meaning) in tlock_state::codes::ALL {
        writeln!(out, "  {code:>4}  {meaning}")?;
    }
    writeln!(out, "transfer")?;
    for (code, meaning) in tlock_ledger::TRANSFER_CODES {
        writeln!(out, "  {code:>4}  {meaning}")?;
    }
    Ok(0)
}
