//! Ledger error model.

use thiserror::Error;

/// Result type used across the ledger crates.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// Keep this focused on deterministic failures of the accounting core
/// (validation, ordering, precision). Storage and rendering failures belong to
/// the infrastructure crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// An entry or line failed validation (unbalanced, unknown type, malformed line).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced client (or entry) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Duplicate or missing sequence numbers were found while establishing
    /// canonical order. Indicates a storage-layer consistency violation.
    #[error("ordering violated: {0}")]
    Ordering(String),

    /// An amount cannot be represented exactly in minor units.
    #[error("precision loss: {0}")]
    Precision(String),

    /// A conflicting write was attempted (e.g. duplicate entry id).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn ordering(msg: impl Into<String>) -> Self {
        Self::Ordering(msg.into())
    }

    pub fn precision(msg: impl Into<String>) -> Self {
        Self::Precision(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
