//! # Simnet Error Types
//!
//! Harness-level failures. These are distinct from contract rejections:
//! a call the wallet rejects still produces a [`CallReceipt`] with an
//! `err` result, while a [`SimnetError`] means the call could not be
//! issued at all (unknown function, wrong arguments, bad configuration).
//!
//! [`CallReceipt`]: crate::CallReceipt

use thiserror::Error;
use tlock_core::{TlockError, ValidationError};
use tlock_ledger::TransferError;

/// Errors raised by the simulation harness.
#[derive(Error, Debug)]
pub enum SimnetError {
    /// Validation, configuration or file access failed.
    #[error(transparent)]
    Core(#[from] TlockError),

    /// Configuration file is not valid YAML for [`SimnetConfig`](crate::SimnetConfig).
    #[error("failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A name did not resolve to an account or principal.
    #[error("unknown account or principal: \"{0}\"")]
    UnknownAccount(String),

    /// The wallet has no public function with this name.
    #[error("unknown public function: \"{0}\"")]
    UnknownFunction(String),

    /// Arguments do not match the function signature.
    #[error("bad arguments for {function}: {reason}")]
    InvalidArguments {
        /// The function being called.
        function: String,
        /// What was wrong.
        reason: String,
    },

    /// Seeding genesis balances failed.
    #[error("genesis funding failed: {0}")]
    Genesis(#[from] TransferError),
}

impl From<ValidationError> for SimnetError {
    fn from(err: ValidationError) -> Self {
        Self::Core(TlockError::Validation(err))
    }
}

impl SimnetError {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Core(TlockError::Config(message.into()))
    }
}
