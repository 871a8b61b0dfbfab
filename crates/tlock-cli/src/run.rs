//! # Run Subcommand
//!
//! Executes a scenario script against a fresh simnet and checks each
//! call's result against its expectation.
//!
//! ## Script Format
//!
//! ```yaml
//! steps:
//!   - call:
//!       function: lock
//!       sender: deployer
//!       args: [{principal: wallet_1}, {uint: 10}, {uint: 10}]
//!       expect: {ok: true}
//!       expect_events: 1
//!   - mine: 10
//!   - call:
//!       function: claim
//!       sender: wallet_1
//!       expect: {ok: true}
//! ```
//!
//! Principals may be given as account names, as the contract name, or as
//! literal addresses. Every step prints one JSON line to stdout. The exit
//! code is 1 if any expectation failed.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Deserialize;
use serde_json::json;
use tlock_simnet::{CallReceipt, CallResult, Simnet, SimnetConfig, Value};

/// Arguments for the `tlock run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the scenario YAML file.
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Stop at the first failed expectation.
    #[arg(long)]
    pub fail_fast: bool,
}

/// A parsed scenario.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// Steps executed in order.
    ///
    /// Enums anywhere below this field (steps, arguments, expected
    /// results) are written as single-key maps (`mine: 3`, `{uint: 10}`,
    /// `{err: 104}`) rather than YAML tags.
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<Step>,
}

/// One scenario step.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Mine this many empty blocks.
    Mine(u64),
    /// Call a public function.
    Call(CallStep),
}

/// A public function call and what it should return.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CallStep {
    /// Function name.
    pub function: String,
    /// Account name or principal that signs the call.
    pub sender: String,
    /// Positional arguments.
    #[serde(default)]
    pub args: Vec<ScriptValue>,
    /// Expected result, if checked.
    #[serde(default)]
    pub expect: Option<CallResult>,
    /// Expected number of emitted events, if checked.
    #[serde(default)]
    pub expect_events: Option<usize>,
}

/// An argument as written in a script, before names are resolved.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptValue {
    /// Unsigned integer.
    Uint(u128),
    /// Account name, contract name or literal principal.
    Principal(String),
}

impl Script {
    /// Parse a scenario from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("failed to parse scenario YAML")
    }

    /// Read and parse a scenario file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario: {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("invalid scenario: {}", path.display()))
    }
}

/// Execute the run subcommand.
///
/// Returns exit code 0 if every expectation held, 1 otherwise.
pub fn run_script(args: &RunArgs, config: SimnetConfig, out: &mut impl Write) -> Result<u8> {
    if !args.script.exists() {
        bail!("scenario file not found: {}", args.script.display());
    }
    let script = Script::from_path(&args.script)?;
    let failed = execute(&script, config, args.fail_fast, out)?;
    if failed > 0 {
        tracing::warn!(failed, "scenario expectations failed");
        Ok(1)
    } else {
        tracing::info!(steps = script.steps.len(), "scenario passed");
        Ok(0)
    }
}

/// Run every step of `script`, writing one JSON line per step.
///
/// Returns the number of calls whose expectations failed.
pub fn execute(
    script: &Script,
    config: SimnetConfig,
    fail_fast: bool,
    out: &mut impl Write,
) -> Result<usize> {
    let mut simnet = Simnet::new(config).context("failed to start simnet")?;
    let mut failed = 0;

    for (index, step) in script.steps.iter().enumerate() {
        match step {
            Step::Mine(count) => {
                let height = simnet.mine_empty_blocks(*count);
                writeln!(
                    out,
                    "{}",
                    json!({ "step": index, "mine": count, "block_height": height })
                )?;
            }
            Step::Call(call) => {
                let receipt = issue_call(&mut simnet, call)
                    .with_context(|| format!("step {index}: {} failed to execute", call.function))?;
                let mismatches = check_expectations(call, &receipt);
                let passed = mismatches.is_empty();
                writeln!(
                    out,
                    "{}",
                    json!({
                        "step": index,
                        "receipt": receipt,
                        "passed": passed,
                        "mismatches": mismatches,
                    })
                )?;
                if !passed {
                    failed += 1;
                    tracing::warn!(step = index, function = %call.function, "expectation failed");
                    if fail_fast {
                        break;
                    }
                }
            }
        }
    }
    Ok(failed)
}

fn issue_call(simnet: &mut Simnet, call: &CallStep) -> Result<CallReceipt> {
    let sender = simnet.resolve(&call.sender)?;
    let args = call
        .args
        .iter()
        .map(|arg| -> Result<Value> {
            Ok(match arg {
                ScriptValue::Uint(n) => Value::uint(*n),
                ScriptValue::Principal(name) => Value::Principal(simnet.resolve(name)?),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(simnet.call_public_fn(&call.function, &args, &sender)?)
}

fn check_expectations(call: &CallStep, receipt: &CallReceipt) -> Vec<String> {
    let mut mismatches = Vec::new();
    if let Some(expected) = call.expect {
        if expected != receipt.result {
            mismatches.push(format!("expected {expected}, got {}", receipt.result));
        }
    }
    if let Some(expected) = call.expect_events {
        if expected != receipt.events.len() {
            mismatches.push(format!(
                "expected {expected} events, got {}",
                receipt.events.len()
            ));
        }
    }
    mismatches
}
