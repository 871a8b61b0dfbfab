//! # Accounts Subcommand
//!
//! Lists the accounts funded at genesis together with the wallet's own
//! contract principal.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tlock_simnet::Simnet;
use tlock_simnet::SimnetConfig;

/// Arguments for the `tlock accounts` subcommand.
#[derive(Args, Debug)]
pub struct AccountsArgs {
    /// Emit a JSON array instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct AccountRow {
    name: String,
    address: String,
    balance: String,
}

/// Execute the accounts subcommand.
pub fn run_accounts(args: &AccountsArgs, config: SimnetConfig, out: &mut impl Write) -> Result<u8> {
    let simnet = Simnet::new(config).context("failed to start simnet")?;

    let mut rows: Vec<AccountRow> = simnet
        .accounts()
        .map(|(name, address)| AccountRow {
            name: name.to_string(),
            address: address.to_string(),
            balance: simnet.balance(address).to_string(),
        })
        .collect();
    let contract = simnet.wallet().contract_principal();
    rows.push(AccountRow {
        name: simnet.config().contract_name.clone(),
        address: contract.to_string(),
        balance: simnet.balance(contract).to_string(),
    });

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &rows)?;
        writeln!(out)?;
        return Ok(0);
    }

    let name_width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
    let addr_width = rows.iter().map(|r| r.address.len()).max().unwrap_or(0);
    for row in &rows {
        writeln!(
            out,
            "{:<name_width$}  {:<addr_width$}  {:>20}",
            row.name, row.address, row.balance
        )?;
    }
    Ok(0)
}
