//! Command types for savings goal operations.

use chrono::{DateTime, Utc};

/// Input for creating a savings goal. An omitted `created_at` defaults to
/// the moment of creation.
#[derive(Debug, Clone)]
pub struct CreateSavingsGoalCommand {
    pub name: String,
    pub amount: f64,
    pub created_at: Option<DateTime<Utc>>,
}

impl CreateSavingsGoalCommand {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
            created_at: None,
        }
    }
}
