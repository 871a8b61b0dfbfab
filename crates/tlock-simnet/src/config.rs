//! Simnet configuration.
//!
//! Describes the accounts funded at genesis, the starting block height and
//! the name the wallet is deployed under. Defaults reproduce the standard
//! devnet: a `deployer` plus `wallet_1` … `wallet_8`, each holding
//! 100 000 000 000 000 units. Override with a YAML file:
//!
//! ```yaml
//! contract_name: wallet
//! genesis_height: 1
//! mine_block_per_call: true
//! accounts:
//!   - name: deployer
//!     address: ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM
//!     balance: 1000
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tlock_core::{Amount, BlockHeight, Principal, TlockError};

use crate::error::SimnetError;

/// Environment variable naming a configuration file.
pub const CONFIG_ENV_VAR: &str = "TLOCK_CONFIG";

/// Name of the account that deploys, and therefore owns, the wallet.
pub const DEPLOYER: &str = "deployer";

const DEFAULT_BALANCE: u128 = 100_000_000_000_000;

const DEVNET_ACCOUNTS: [(&str, &str); 9] = [
    ("deployer", "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM"),
    ("wallet_1", "ST1SJ3DTE5DN7X54YDH5D64R3BCB6A2AG2ZQ8YPD5"),
    ("wallet_2", "ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG"),
    ("wallet_3", "ST2JHG361ZXG51QTKY2NQCVBPPRRE2KZB1HR05NNC"),
    ("wallet_4", "ST2NEB84ASENDXKYGJPQW86YXQCEFEX2ZQPG87ND"),
    ("wallet_5", "ST2REHHS5J3CERCRBEPMGH7921Q6PYKAADT7JP2VB"),
    ("wallet_6", "ST3AM1A56AK2C1XAFJ4115ZSV26EB49BVQ10MGCS0"),
    ("wallet_7", "ST3PF13W7Z0RRM42A8VZRVFQ75SV1K26RXEP8YGKJ"),
    ("wallet_8", "ST3NBRSFKX28FQ2ZJ1MAKX58HKHSDGNV5N7R21XCP"),
];

/// A named account funded at genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountConfig {
    /// Short name used in scripts (`deployer`, `wallet_1`, ...).
    pub name: String,
    /// The account's principal.
    pub address: Principal,
    /// Genesis balance.
    pub balance: Amount,
}

/// Configuration for a [`Simnet`](crate::Simnet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimnetConfig {
    /// Name the wallet is deployed under.
    #[serde(default = "default_contract_name")]
    pub contract_name: String,
    /// Block height before the first call.
    #[serde(default = "default_genesis_height")]
    pub genesis_height: BlockHeight,
    /// Whether each call executes in a freshly mined block.
    #[serde(default = "default_true")]
    pub mine_block_per_call: bool,
    /// Accounts funded at genesis.
    #[serde(default = "devnet_accounts")]
    pub accounts: Vec<AccountConfig>,
}

fn default_contract_name() -> String {
    "wallet".to_string()
}

fn default_genesis_height() -> BlockHeight {
    BlockHeight(1)
}

fn default_true() -> bool {
    true
}

fn devnet_accounts() -> Vec<AccountConfig> {
    DEVNET_ACCOUNTS
        .iter()
        .filter_map(|(name, address)| {
            Principal::standard(*address).ok().map(|address| AccountConfig {
                name: (*name).to_string(),
                address,
                balance: Amount::new(DEFAULT_BALANCE),
            })
        })
        .collect()
}

impl Default for SimnetConfig {
    fn default() -> Self {
        Self {
            contract_name: default_contract_name(),
            genesis_height: default_genesis_height(),
            mine_block_per_call: true,
            accounts: devnet_accounts(),
        }
    }
}

impl SimnetConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SimnetError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn from_path(path: &Path) -> Result<Self, SimnetError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| TlockError::io(path, source))?;
        Self::from_yaml_str(&content)
    }

    /// Load from the file named by `TLOCK_CONFIG`, or use the defaults
    /// when the variable is unset.
    pub fn from_env() -> Result<Self, SimnetError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_path(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Check internal consistency.
    ///
    /// # Errors
    ///
    /// Returns a [`TlockError::Config`] if account names or addresses
    /// repeat, if an account shadows the contract name, if no `deployer`
    /// account exists, or if an account is a contract principal. Returns a
    /// [`TlockError::Validation`] for a bad contract name. Both arrive
    /// wrapped in [`SimnetError::Core`].
    pub fn validate(&self) -> Result<(), SimnetError> {
        let deployer = self.deployer()?;
        Principal::contract(deployer, self.contract_name.clone())?;

        let mut names = HashSet::new();
        let mut addresses = HashSet::new();
        for account in &self.accounts {
            if !names.insert(account.name.as_str()) {
                return Err(SimnetError::config(format!(
                    "duplicate account name \"{}\"",
                    account.name
                )));
            }
            if !addresses.insert(&account.address) {
                return Err(SimnetError::config(format!(
                    "duplicate account address {}",
                    account.address
                )));
            }
            if account.name == self.contract_name {
                return Err(SimnetError::config(format!(
                    "account \"{}\" shadows the contract name",
                    account.name
                )));
            }
            if account.address.is_contract() {
                return Err(SimnetError::config(format!(
                    "account \"{}\" must be a standard principal, got {}",
                    account.name, account.address
                )));
            }
        }
        Ok(())
    }

    /// The deployer's principal.
    pub fn deployer(&self) -> Result<&Principal, SimnetError> {
        self.accounts
            .iter()
            .find(|a| a.name == DEPLOYER)
            .map(|a| &a.address)
            .ok_or_else(|| SimnetError::config(format!("no \"{DEPLOYER}\" account configured")))
    }
}
