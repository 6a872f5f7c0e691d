//! Domain model for a savings goal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    /// Store-assigned id, strictly increasing within the goal registry.
    pub id: u64,
    /// Non-empty after trimming.
    pub name: String,
    /// Target amount, never negative.
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}
