//! # Wallet Error Types
//!
//! Every rejection carries a stable numeric code. Callers and test
//! harnesses match on the code; the `Display` text is for operators.
//!
//! Codes 100–106 are owned by the wallet. A failed asset transfer surfaces
//! the transfer layer's own code (1–4) unchanged.

use thiserror::Error;
use tlock_core::{BlockHeight, Principal};
use tlock_ledger::TransferError;

/// Stable numeric error codes.
pub mod codes {
    /// Caller is not the contract owner (`lock`).
    pub const ERR_OWNER_ONLY: u32 = 100;
    /// A lock has already been established.
    pub const ERR_ALREADY_LOCKED: u32 = 101;
    /// Unlock height is not in the future at lock time.
    pub const ERR_UNLOCK_IN_PAST: u32 = 102;
    /// Lock amount is zero.
    pub const ERR_NO_VALUE: u32 = 103;
    /// Caller is not the current beneficiary (`bestow`, `claim`).
    pub const ERR_BENEFICIARY_ONLY: u32 = 104;
    /// Claim attempted before the unlock height.
    pub const ERR_UNLOCK_HEIGHT_NOT_REACHED: u32 = 105;
    /// Funds have already been claimed.
    pub const ERR_ALREADY_CLAIMED: u32 = 106;

    /// Every wallet-owned code with a short description, in code order.
    pub const ALL: [(u32, &str); 7] = [
        (ERR_OWNER_ONLY, "caller is not the contract owner"),
        (ERR_ALREADY_LOCKED, "lock already established"),
        (ERR_UNLOCK_IN_PAST, "unlock height not in the future"),
        (ERR_NO_VALUE, "lock amount is zero"),
        (ERR_BENEFICIARY_ONLY, "caller is not the beneficiary"),
        (ERR_UNLOCK_HEIGHT_NOT_REACHED, "unlock height not reached"),
        (ERR_ALREADY_CLAIMED, "funds already claimed"),
    ];
}

/// The role a caller failed to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthorizedRole {
    /// The principal that deployed the wallet and may lock funds.
    Owner,
    /// The principal currently entitled to claim.
    Beneficiary,
}

impl std::fmt::Display for AuthorizedRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owner => f.write_str("owner"),
            Self::Beneficiary => f.write_str("beneficiary"),
        }
    }
}

/// Rejections returned by wallet operations.
///
/// A returned error guarantees the call changed no state and emitted no
/// event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// Caller does not hold the role the operation requires.
    #[error("{caller} is not the {role}")]
    NotAuthorized {
        /// The rejected caller.
        caller: Principal,
        /// The role the operation requires.
        role: AuthorizedRole,
    },

    /// A lock record already exists for this wallet.
    #[error("wallet is already locked")]
    AlreadyLocked,

    /// Requested unlock height is not after the current height.
    #[error("unlock height {unlock_height} is not after current height {current_height}")]
    UnlockHeightInPast {
        /// The requested unlock height.
        unlock_height: BlockHeight,
        /// Chain height when the lock was attempted.
        current_height: BlockHeight,
    },

    /// Lock amount is zero.
    #[error("lock amount must be positive")]
    ZeroAmount,

    /// Claim attempted before the unlock height.
    #[error("funds unlock at height {unlock_height}, current height is {current_height}")]
    NotYetUnlocked {
        /// Height at which the funds unlock.
        unlock_height: BlockHeight,
        /// Chain height when the claim was attempted.
        current_height: BlockHeight,
    },

    /// Funds were already claimed.
    #[error("funds have already been claimed")]
    AlreadyClaimed,

    /// The underlying asset transfer failed.
    #[error("transfer failed: {0}")]
    TransferFailed(#[from] TransferError),
}

impl WalletError {
    /// Stable numeric code for this error.
    pub fn code(&self) -> u32 {
        match self {
            Self::NotAuthorized {
                role: AuthorizedRole::Owner,
                ..
            } => codes::ERR_OWNER_ONLY,
            Self::NotAuthorized {
                role: AuthorizedRole::Beneficiary,
                ..
            } => codes::ERR_BENEFICIARY_ONLY,
            Self::AlreadyLocked => codes::ERR_ALREADY_LOCKED,
            Self::UnlockHeightInPast { .. } => codes::ERR_UNLOCK_IN_PAST,
            Self::ZeroAmount => codes::ERR_NO_VALUE,
            Self::NotYetUnlocked { .. } => codes::ERR_UNLOCK_HEIGHT_NOT_REACHED,
            Self::AlreadyClaimed => codes::ERR_ALREADY_CLAIMED,
            Self::TransferFailed(e) => e.code(),
        }
    }
}
