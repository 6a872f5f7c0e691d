//! # CSV Storage Backend
//!
//! File-based implementation of the storage port. One CSV file per entity
//! kind lives under the connection's base directory:
//!
//! ```text
//! data/
//! ├── transactions.csv
//! ├── savings_goals.csv
//! └── students.csv
//! ```
//!
//! Files are created with their header on first use. Every write goes to a
//! temp file that atomically replaces the original, so concurrent readers
//! never observe a partially written file.

pub mod connection;
pub mod savings_goal_repository;
pub mod student_repository;
pub mod transaction_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::CsvConnection;
pub use savings_goal_repository::SavingsGoalRepository;
pub use student_repository::StudentRepository;
pub use transaction_repository::TransactionRepository;
