//! Derived aggregate types. The balance is never stored independently; it is
//! recomputed from the live transaction set at every query.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The aggregate balance over all live transactions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub current_total: f64,
}

/// Per-day credit/debit summary, derived from the live transaction set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub credited: f64,
    pub debited: f64,
    pub net: f64,
}
