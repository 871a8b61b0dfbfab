//! # Call Values
//!
//! Arguments and results as they cross the public function boundary.
//! Arguments are positional and typed, mirroring how a contract call is
//! encoded:
//!
//! ```yaml
//! [{principal: ST1SJ3DTE5DN7X54YDH5D64R3BCB6A2AG2ZQ8YPD5}, {uint: 10}, {uint: 10}]
//! ```
//!
//! Results are either `{ok: true}` or `{err: <code>}`.
//!
//! serde_yaml reads externally tagged enums from YAML tags by default; to
//! accept the single-key map form above, deserialize through
//! `serde_yaml::with::singleton_map_recursive`.

use serde::{Deserialize, Serialize};
use tlock_core::{Amount, Principal};

/// A typed positional argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// Unsigned integer.
    Uint(u128),
    /// Principal (account or contract).
    Principal(Principal),
}

impl Value {
    /// Build a `uint` argument.
    pub fn uint(n: u128) -> Self {
        Self::Uint(n)
    }

    /// Build a `principal` argument.
    pub fn principal(p: &Principal) -> Self {
        Self::Principal(p.clone())
    }

    /// The type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Uint(_) => "uint",
            Self::Principal(_) => "principal",
        }
    }
}

impl From<Amount> for Value {
    fn from(a: Amount) -> Self {
        Self::Uint(a.value())
    }
}

/// Outcome of a public function call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallResult {
    /// The call committed and returned this value.
    Ok(bool),
    /// The call was rejected with this code.
    Err(u32),
}

impl CallResult {
    /// Whether the call committed.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// The rejection code, if the call failed.
    pub fn err_code(&self) -> Option<u32> {
        match self {
            Self::Ok(_) => None,
            Self::Err(code) => Some(*code),
        }
    }
}

impl std::fmt::Display for CallResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok(v) => write!(f, "(ok {v})"),
            Self::Err(code) => write!(f, "(err u{code})"),
        }
    }
}
