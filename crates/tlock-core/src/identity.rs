//! # Principal Identity
//!
//! A [`Principal`] is any identity that can authorize operations and hold
//! the native asset. Two forms exist:
//!
//! - **Standard**: an account address such as
//!   `ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM`.
//! - **Contract**: an issuing address plus a contract name, written
//!   `<address>.<name>` (e.g. `ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM.wallet`).
//!
//! ## Validation
//!
//! Addresses must start with `S` and a network/version letter (`P`, `T`,
//! `M`, `N`), followed by characters from the c32 alphabet. Contract names
//! must start with an ASCII letter and contain only letters, digits, `-`
//! or `_`, at most 40 characters. Both checks run at construction, so every
//! `Principal` in the system is well formed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Crockford-style alphabet used by c32 addresses (no I, L, O, U).
const C32_ALPHABET: &str = "0123456789ABCDEFGHJKMNPQRSTVWXYZ";

const MIN_ADDRESS_LEN: usize = 28;
const MAX_ADDRESS_LEN: usize = 41;
const MAX_CONTRACT_NAME_LEN: usize = 40;

/// A validated principal (standard account or contract).
///
/// Serializes as its string form, so JSON events read
/// `"sender": "ST1PQ...GZGM.wallet"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Principal {
    address: String,
    contract_name: Option<String>,
}

impl Principal {
    /// Create a standard (account) principal.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAddress`] if the address is not a
    /// well-formed c32 address.
    pub fn standard(address: impl Into<String>) -> Result<Self, ValidationError> {
        let address = address.into();
        validate_address(&address)?;
        Ok(Self {
            address,
            contract_name: None,
        })
    }

    /// Create a contract principal issued by `issuer`.
    ///
    /// Only the address part of `issuer` is used; passing a contract
    /// principal as issuer yields a sibling contract of the same deployer.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidContractName`] if `name` violates
    /// the identifier rules.
    pub fn contract(issuer: &Principal, name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_contract_name(&name)?;
        Ok(Self {
            address: issuer.address.clone(),
            contract_name: Some(name),
        })
    }

    /// The account address (for a contract principal, the deployer's address).
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The contract name, if this is a contract principal.
    pub fn contract_name(&self) -> Option<&str> {
        self.contract_name.as_deref()
    }

    /// Whether this principal identifies a contract.
    pub fn is_contract(&self) -> bool {
        self.contract_name.is_some()
    }

    /// The standard principal that issued this one (itself for accounts).
    pub fn issuer(&self) -> Principal {
        Self {
            address: self.address.clone(),
            contract_name: None,
        }
    }
}

fn validate_address(s: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidAddress(s.to_string());

    if s.len() < MIN_ADDRESS_LEN || s.len() > MAX_ADDRESS_LEN {
        return Err(invalid());
    }
    let mut chars = s.chars();
    if chars.next() != Some('S') {
        return Err(invalid());
    }
    if !matches!(chars.next(), Some('P' | 'T' | 'M' | 'N')) {
        return Err(invalid());
    }
    if !chars.all(|c| C32_ALPHABET.contains(c)) {
        return Err(invalid());
    }
    Ok(())
}

fn validate_contract_name(s: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidContractName(s.to_string());

    if s.is_empty() || s.len() > MAX_CONTRACT_NAME_LEN {
        return Err(invalid());
    }
    let mut chars = s.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return Err(invalid());
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(invalid());
    }
    Ok(())
}

impl FromStr for Principal {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((address, name)) => {
                let issuer = Self::standard(address)?;
                Self::contract(&issuer, name)
            }
            None => Self::standard(s),
        }
    }
}

impl TryFrom<String> for Principal {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Principal> for String {
    fn from(p: Principal) -> Self {
        p.to_string()
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.contract_name {
            Some(name) => write!(f, "{}.{}", self.address, name),
            None => f.write_str(&self.address),
        }
    }
}
