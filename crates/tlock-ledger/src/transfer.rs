//! # Asset Transfer Service
//!
//! Moves the native asset between principals. A transfer either commits
//! completely (debit, credit and event together) or fails without touching
//! any balance.
//!
//! ## Failure Codes
//!
//! | Code | Variant |
//! |---|---|
//! | 1 | [`TransferError::InsufficientBalance`] |
//! | 2 | [`TransferError::SameSenderRecipient`] |
//! | 3 | [`TransferError::NonPositiveAmount`] |
//! | 4 | [`TransferError::BalanceOverflow`] |

use std::collections::BTreeMap;

use thiserror::Error;
use tlock_core::{Amount, Principal};

use crate::event::{ChainEvent, TransferEvent};

/// Errors reported by the asset layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// Sender does not hold enough of the asset.
    #[error("insufficient balance: {sender} holds {available}, needs {requested}")]
    InsufficientBalance {
        /// The principal being debited.
        sender: Principal,
        /// Its current balance.
        available: Amount,
        /// The requested transfer amount.
        requested: Amount,
    },

    /// Sender and recipient are the same principal.
    #[error("sender and recipient are both {0}")]
    SameSenderRecipient(Principal),

    /// Transfers of zero are rejected.
    #[error("transfer amount must be positive")]
    NonPositiveAmount,

    /// Crediting the recipient would overflow its balance.
    #[error("balance overflow crediting {0}")]
    BalanceOverflow(Principal),
}

/// Every transfer failure code with a short description, in code order.
pub const TRANSFER_CODES: [(u32, &str); 4] = [
    (1, "sender balance insufficient"),
    (2, "sender and recipient are the same"),
    (3, "amount is not positive"),
    (4, "recipient balance would overflow"),
];

impl TransferError {
    /// Stable numeric code for this failure.
    pub fn code(&self) -> u32 {
        match self {
            Self::InsufficientBalance { .. } => 1,
            Self::SameSenderRecipient(_) => 2,
            Self::NonPositiveAmount => 3,
            Self::BalanceOverflow(_) => 4,
        }
    }
}

/// Atomic movement of the native asset.
pub trait AssetTransfer {
    /// Current balance of `who` (zero for unknown principals).
    fn balance(&self, who: &Principal) -> Amount;

    /// Move `amount` from `from` to `to`.
    ///
    /// On success the returned event describes the committed transfer. On
    /// failure no balance has changed.
    fn transfer(
        &mut self,
        from: &Principal,
        to: &Principal,
        amount: Amount,
    ) -> Result<TransferEvent, TransferError>;
}

/// Balance table with an append-only event log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    balances: BTreeMap<Principal, Amount>,
    events: Vec<ChainEvent>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` into `who`'s balance. Used to seed genesis accounts;
    /// emits no event.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::BalanceOverflow`] if the balance would overflow.
    pub fn credit(&mut self, who: &Principal, amount: Amount) -> Result<(), TransferError> {
        let current = self.balance(who);
        let updated = current
            .checked_add(amount)
            .ok_or_else(|| TransferError::BalanceOverflow(who.clone()))?;
        self.balances.insert(who.clone(), updated);
        Ok(())
    }

    /// Every event recorded so far, in commit order.
    pub fn events(&self) -> &[ChainEvent] {
        &self.events
    }

    /// Events recorded at or after position `start`.
    pub fn events_since(&self, start: usize) -> &[ChainEvent] {
        self.events.get(start..).unwrap_or(&[])
    }

    /// Number of events recorded so far.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Sum of all balances; `None` if the sum exceeds the amount range.
    pub fn total_supply(&self) -> Option<Amount> {
        self.balances
            .values()
            .try_fold(Amount::ZERO, |acc, b| acc.checked_add(*b))
    }
}

impl AssetTransfer for InMemoryLedger {
    fn balance(&self, who: &Principal) -> Amount {
        self.balances.get(who).copied().unwrap_or(Amount::ZERO)
    }

    fn transfer(
        &mut self,
        from: &Principal,
        to: &Principal,
        amount: Amount,
    ) -> Result<TransferEvent, TransferError> {
        if amount.is_zero() {
            return Err(TransferError::NonPositiveAmount);
        }
        if from == to {
            return Err(TransferError::SameSenderRecipient(from.clone()));
        }

        let available = self.balance(from);
        let debited = available
            .checked_sub(amount)
            .ok_or_else(|| TransferError::InsufficientBalance {
                sender: from.clone(),
                available,
                requested: amount,
            })?;
        let credited = self
            .balance(to)
            .checked_add(amount)
            .ok_or_else(|| TransferError::BalanceOverflow(to.clone()))?;

        // All checks passed; commit both sides together.
        self.balances.insert(from.clone(), debited);
        self.balances.insert(to.clone(), credited);

        let event = TransferEvent {
            amount,
            sender: from.clone(),
            recipient: to.clone(),
        };
        self.events.push(ChainEvent::from(event.clone()));
        tracing::debug!(%from, %to, %amount, "transfer committed");
        Ok(event)
    }
}
