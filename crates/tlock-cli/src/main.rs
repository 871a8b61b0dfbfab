//! # tlock CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use tlock_cli::accounts::{run_accounts, AccountsArgs};
use tlock_cli::codes::run_codes;
use tlock_cli::load_config;
use tlock_cli::run::{run_script, RunArgs};

/// Time-locked wallet toolchain.
///
/// Drives a deterministic simulation network with one deployed wallet.
#[derive(Parser, Debug)]
#[command(name = "tlock", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a simnet configuration file (overrides TLOCK_CONFIG).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute a YAML scenario script against a fresh simnet.
    Run(RunArgs),

    /// List configured accounts and their genesis balances.
    Accounts(AccountsArgs),

    /// Print the error-code table.
    Codes,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so stdout stays machine-readable.
    match cli.log_format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "tlock CLI starting");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = match cli.command {
        Commands::Run(args) => load_config(cli.config.as_deref())
            .and_then(|config| run_script(&args, config, &mut out)),
        Commands::Accounts(args) => load_config(cli.config.as_deref())
            .and_then(|config| run_accounts(&args, config, &mut out)),
        Commands::Codes => run_codes(&mut out),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
