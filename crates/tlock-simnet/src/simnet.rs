//! # Simnet
//!
//! Owns one chain, one ledger and one deployed wallet. Public function
//! calls are dispatched by name with positional [`Value`] arguments, as a
//! contract call would be, and each returns a [`CallReceipt`].
//!
//! ## Blocks
//!
//! With `mine_block_per_call` (the default) every call executes in a newly
//! mined block, so the height observed by a call is one above the height
//! before it. Blocks can also be mined explicitly with
//! [`Simnet::mine_empty_blocks`].
//!
//! ## Events
//!
//! A receipt carries exactly the events its call emitted. Rejected calls
//! carry none.

use serde::{Deserialize, Serialize};
use tlock_core::{Amount, BlockHeight, Principal};
use tlock_ledger::{AssetTransfer, ChainClock, ChainEvent, InMemoryLedger, SimulatedChain};
use tlock_state::{CallContext, Operation, TimelockedWallet, WalletError};

use crate::config::SimnetConfig;
use crate::error::SimnetError;
use crate::value::{CallResult, Value};

/// The outcome of one public function call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallReceipt {
    /// Function that was called.
    pub function: String,
    /// Principal that signed the call.
    pub sender: Principal,
    /// Height the call executed at.
    pub block_height: BlockHeight,
    /// Returned value or rejection code.
    pub result: CallResult,
    /// Events emitted by this call, in order.
    pub events: Vec<ChainEvent>,
}

/// A deterministic single-contract chain.
#[derive(Debug)]
pub struct Simnet {
    config: SimnetConfig,
    chain: SimulatedChain,
    ledger: InMemoryLedger,
    wallet: TimelockedWallet,
}

impl Simnet {
    /// Build a simnet: fund the configured accounts and deploy the wallet
    /// from the `deployer` account.
    pub fn new(config: SimnetConfig) -> Result<Self, SimnetError> {
        config.validate()?;

        let mut ledger = InMemoryLedger::new();
        for account in &config.accounts {
            ledger.credit(&account.address, account.balance)?;
        }
        let wallet = TimelockedWallet::deploy(config.deployer()?.clone(), &config.contract_name)?;
        let chain = SimulatedChain::new(config.genesis_height);

        tracing::info!(
            accounts = config.accounts.len(),
            contract = %wallet.contract_principal(),
            height = %chain.current_height(),
            "simnet ready"
        );
        Ok(Self {
            config,
            chain,
            ledger,
            wallet,
        })
    }

    /// Build a simnet on the default devnet configuration.
    pub fn with_defaults() -> Result<Self, SimnetError> {
        Self::new(SimnetConfig::default())
    }

    /// The active configuration.
    pub fn config(&self) -> &SimnetConfig {
        &self.config
    }

    /// Configured accounts as `(name, principal)`, in configuration order.
    pub fn accounts(&self) -> impl Iterator<Item = (&str, &Principal)> {
        self.config
            .accounts
            .iter()
            .map(|a| (a.name.as_str(), &a.address))
    }

    /// Look up an account by name.
    pub fn account(&self, name: &str) -> Result<&Principal, SimnetError> {
        self.config
            .accounts
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.address)
            .ok_or_else(|| SimnetError::UnknownAccount(name.to_string()))
    }

    /// Resolve an account name or a literal principal.
    ///
    /// The contract's own name resolves to its holding account.
    pub fn resolve(&self, name_or_principal: &str) -> Result<Principal, SimnetError> {
        if let Ok(p) = self.account(name_or_principal) {
            return Ok(p.clone());
        }
        if name_or_principal == self.config.contract_name {
            return Ok(self.wallet.contract_principal().clone());
        }
        name_or_principal
            .parse()
            .map_err(|_| SimnetError::UnknownAccount(name_or_principal.to_string()))
    }

    /// The deployed wallet (read-only).
    pub fn wallet(&self) -> &TimelockedWallet {
        &self.wallet
    }

    /// Current block height.
    pub fn block_height(&self) -> BlockHeight {
        self.chain.current_height()
    }

    /// Mine `count` empty blocks; returns the new height.
    pub fn mine_empty_blocks(&mut self, count: u64) -> BlockHeight {
        self.chain.mine_empty_blocks(count)
    }

    /// Mine one empty block; returns the new height.
    pub fn mine_empty_block(&mut self) -> BlockHeight {
        self.chain.mine_block()
    }

    /// Balance of `who`.
    pub fn balance(&self, who: &Principal) -> Amount {
        self.ledger.balance(who)
    }

    /// Every event emitted since genesis.
    pub fn events(&self) -> &[ChainEvent] {
        self.ledger.events()
    }

    /// Call a public function of the wallet.
    ///
    /// # Errors
    ///
    /// Returns [`SimnetError::UnknownFunction`] or
    /// [`SimnetError::InvalidArguments`] if the call cannot be issued.
    /// Contract rejections are not errors; they come back as a receipt
    /// whose result is `err`.
    pub fn call_public_fn(
        &mut self,
        function: &str,
        args: &[Value],
        sender: &Principal,
    ) -> Result<CallReceipt, SimnetError> {
        let operation = Operation::from_name(function)
            .ok_or_else(|| SimnetError::UnknownFunction(function.to_string()))?;
        let call = decode_args(operation, args)?;

        if self.config.mine_block_per_call {
            self.chain.mine_block();
        }
        let block_height = self.chain.current_height();
        let mark = self.ledger.event_count();
        tracing::debug!(%operation, %sender, height = %block_height, "executing call");

        let outcome = {
            let mut ctx = CallContext::new(sender, &self.chain, &mut self.ledger);
            match call {
                DecodedCall::Lock {
                    beneficiary,
                    unlock_height,
                    amount,
                } => self
                    .wallet
                    .lock(&mut ctx, beneficiary, unlock_height, amount),
                DecodedCall::Bestow { new_beneficiary } => {
                    self.wallet.bestow(&mut ctx, new_beneficiary)
                }
                DecodedCall::Claim => self.wallet.claim(&mut ctx),
            }
        };

        let result = match &outcome {
            Ok(v) => CallResult::Ok(*v),
            Err(e) => CallResult::Err(WalletError::code(e)),
        };
        let events = self.ledger.events_since(mark).to_vec();

        Ok(CallReceipt {
            function: operation.as_str().to_string(),
            sender: sender.clone(),
            block_height,
            result,
            events,
        })
    }
}

/// Arguments checked against a function signature.
enum DecodedCall {
    Lock {
        beneficiary: Principal,
        unlock_height: BlockHeight,
        amount: Amount,
    },
    Bestow {
        new_beneficiary: Principal,
    },
    Claim,
}

fn decode_args(operation: Operation, args: &[Value]) -> Result<DecodedCall, SimnetError> {
    let bad = |reason: String| SimnetError::InvalidArguments {
        function: operation.as_str().to_string(),
        reason,
    };
    let arity = |expected: usize| {
        if args.len() == expected {
            Ok(())
        } else {
            Err(bad(format!("expected {expected} arguments, got {}", args.len())))
        }
    };

    match operation {
        Operation::Lock => {
            arity(3)?;
            let beneficiary = expect_principal(&args[0]).ok_or_else(|| {
                bad(format!("argument 1 must be a principal, got {}", args[0].type_name()))
            })?;
            let unlock_height = expect_uint(&args[1])
                .and_then(|n| u64::try_from(n).ok())
                .ok_or_else(|| bad("argument 2 must be a uint block height".to_string()))?;
            let amount = expect_uint(&args[2])
                .ok_or_else(|| bad(format!("argument 3 must be a uint, got {}", args[2].type_name())))?;
            Ok(DecodedCall::Lock {
                beneficiary,
                unlock_height: BlockHeight(unlock_height),
                amount: Amount::new(amount),
            })
        }
        Operation::Bestow => {
            arity(1)?;
            let new_beneficiary = expect_principal(&args[0]).ok_or_else(|| {
                bad(format!("argument 1 must be a principal, got {}", args[0].type_name()))
            })?;
            Ok(DecodedCall::Bestow { new_beneficiary })
        }
        Operation::Claim => {
            arity(0)?;
            Ok(DecodedCall::Claim)
        }
    }
}

fn expect_principal(v: &Value) -> Option<Principal> {
    match v {
        Value::Principal(p) => Some(p.clone()),
        Value::Uint(_) => None,
    }
}

fn expect_uint(v: &Value) -> Option<u128> {
    match v {
        Value::Uint(n) => Some(*n),
        Value::Principal(_) => None,
    }
}
