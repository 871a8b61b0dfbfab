//! # Chain Quantities
//!
//! [`BlockHeight`] and [`Amount`] are the two unsigned quantities the
//! wallet reasons about. They are separate newtypes so an unlock height can
//! never be confused with an escrowed amount.
//!
//! Amounts are held as `u128` and serialize as decimal strings, matching the
//! way transfer events report them (`"amount": "10"`). Deserialization also
//! accepts plain integers so configuration files can write `balance: 1000`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A block height reported by the chain clock.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BlockHeight(pub u64);

impl BlockHeight {
    /// The height before any block has been mined.
    pub const GENESIS: BlockHeight = BlockHeight(0);

    /// Create a block height.
    pub const fn new(height: u64) -> Self {
        Self(height)
    }

    /// The raw height value.
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The height of the following block.
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Advance by `blocks`, saturating at `u64::MAX`.
    pub const fn saturating_add(self, blocks: u64) -> Self {
        Self(self.0.saturating_add(blocks))
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BlockHeight {
    fn from(h: u64) -> Self {
        Self(h)
    }
}

/// A quantity of the native asset, in its smallest unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "AmountRepr", into = "String")]
pub struct Amount(u128);

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Create an amount.
    pub const fn new(units: u128) -> Self {
        Self(units)
    }

    /// The raw number of units.
    pub const fn value(self) -> u128 {
        self.0
    }

    /// Whether this amount is zero.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked addition; `None` on overflow.
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Checked subtraction; `None` if `other` exceeds `self`.
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Amount {
    fn from(units: u128) -> Self {
        Self(units)
    }
}

impl From<u64> for Amount {
    fn from(units: u64) -> Self {
        Self(u128::from(units))
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    /// Parse a decimal integer. Signs, whitespace and fractions are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidAmount(s.to_string()));
        }
        s.parse::<u128>()
            .map(Amount)
            .map_err(|_| ValidationError::InvalidAmount(s.to_string()))
    }
}

impl From<Amount> for String {
    fn from(a: Amount) -> Self {
        a.0.to_string()
    }
}

/// Wire representations accepted when deserializing an [`Amount`].
#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Int(u64),
    Str(String),
}

impl TryFrom<AmountRepr> for Amount {
    type Error = ValidationError;

    fn try_from(repr: AmountRepr) -> Result<Self, Self::Error> {
        match repr {
            AmountRepr::Int(n) => Ok(Amount::from(n)),
            AmountRepr::Str(s) => s.parse(),
        }
    }
}
