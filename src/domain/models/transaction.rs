//! Domain model for a transaction.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Maximum accepted description length, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Direction of a transaction: credits increase the balance, debits
/// decrease it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "credit",
            TransactionKind::Debit => "debit",
        }
    }

    /// Apply the kind's sign to an amount.
    pub fn signed(&self, amount: f64) -> f64 {
        match self {
            TransactionKind::Credit => amount,
            TransactionKind::Debit => -amount,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = LedgerError;

    /// Parse a kind label. The legacy labels used by earlier frontends
    /// (`income`/`einzahlung`, `expense`/`ausgabe`) are accepted as aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "credit" | "income" | "einzahlung" => Ok(TransactionKind::Credit),
            "debit" | "expense" | "ausgabe" => Ok(TransactionKind::Debit),
            other => Err(LedgerError::InvalidInput(format!(
                "unknown transaction kind '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Store-assigned id, strictly increasing and never reused.
    pub id: u64,
    pub kind: TransactionKind,
    /// Always positive; the kind carries the sign.
    pub amount: f64,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub category: String,
    /// Optional tagged student, free text.
    #[serde(default)]
    pub student: String,
    /// Business date, distinct from the record timestamp.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl Transaction {
    /// Contribution of this transaction to the aggregate total.
    pub fn signed_amount(&self) -> f64 {
        self.kind.signed(self.amount)
    }
}
