//! Domain model for a student.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Store-assigned id, strictly increasing within the student registry.
    pub id: u64,
    /// Non-empty after trimming, unique across the registry (case-sensitive).
    pub name: String,
    pub created_at: DateTime<Utc>,
}
