//! Command types for transaction operations.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::models::TransactionKind;

/// Input for creating a transaction. Omitted `timestamp`/`date` default to
/// the moment of creation; omitted metadata defaults to empty.
#[derive(Debug, Clone)]
pub struct CreateTransactionCommand {
    pub kind: TransactionKind,
    pub amount: f64,
    pub description: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub student: Option<String>,
    pub date: Option<NaiveDate>,
}

impl CreateTransactionCommand {
    /// Convenience constructor covering the common case.
    pub fn new(kind: TransactionKind, amount: f64, description: impl Into<String>) -> Self {
        Self {
            kind,
            amount,
            description: description.into(),
            timestamp: None,
            category: None,
            student: None,
            date: None,
        }
    }
}

/// Partial update of an existing transaction. Fields left as `None` retain
/// their prior value.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionCommand {
    pub kind: Option<TransactionKind>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}
