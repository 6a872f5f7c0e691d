//! Error taxonomy for the ledger core.
//!
//! Every failure leaves the store in the state prior to the call; validation
//! and invariant checks run before anything is written. Storage backends
//! report their own I/O failures through [`LedgerError::Storage`].

use thiserror::Error;

/// Errors the ledger core can report to callers.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Bad caller input: unknown transaction kind, non-positive amount,
    /// over-long description, empty name.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The operation would drive the aggregate balance below zero.
    /// Rejected before any write takes effect.
    #[error(
        "operation would drive the balance negative \
         (current total {current_total:.2}, attempted change {attempted_change:.2})"
    )]
    BalanceViolation {
        current_total: f64,
        attempted_change: f64,
    },

    /// Unknown id on get or update. Deletes report `false` instead.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    /// The savings goal cap is already reached.
    #[error("at most {max} savings goals are allowed")]
    CapacityExceeded { max: usize },

    /// A student with the same name already exists.
    #[error("student name already taken: {0}")]
    Conflict(String),

    /// Failure in the storage backend.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
