//! Command types for student operations.

use chrono::{DateTime, Utc};

/// Input for registering a student. An omitted `created_at` defaults to
/// the moment of creation.
#[derive(Debug, Clone)]
pub struct CreateStudentCommand {
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl CreateStudentCommand {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: None,
        }
    }
}
