//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared across the workspace. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Contract-level rejections (wrong caller, lock already established, ...)
//! are not here: they carry stable numeric codes and live next to the
//! state machine in `tlock-state`.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the workspace.
///
/// Crates with their own error enums wrap this one for the concerns it
/// covers (validation, configuration, file access).
#[derive(Error, Debug)]
pub enum TlockError {
    /// A domain primitive failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// A file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
}

impl TlockError {
    /// Build an [`Io`](Self::Io) error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised when constructing domain primitives from untrusted input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Account address is not a well-formed c32 address.
    #[error("invalid principal address: \"{0}\" (expected S[PTMN] followed by c32 characters)")]
    InvalidAddress(String),

    /// Contract name violates the identifier rules.
    #[error("invalid contract name: \"{0}\" (expected a letter followed by up to 39 of [A-Za-z0-9_-])")]
    InvalidContractName(String),

    /// Amount string is not a non-negative integer.
    #[error("invalid amount: \"{0}\" (expected a non-negative integer)")]
    InvalidAmount(String),

    /// A restored snapshot violates a state invariant.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}
