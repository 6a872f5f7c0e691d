//! # Storage Traits
//!
//! The storage-port abstraction: the domain layer talks to these traits only,
//! so backends (in-memory, CSV files, a document store) are interchangeable
//! without touching the services. Backends never enforce business rules; the
//! balance floor, the goal cap, and name uniqueness live in the domain layer.

use anyhow::Result;

use crate::domain::models::{SavingsGoal, Student, Transaction};

/// Interface for transaction storage operations.
pub trait TransactionStore: Send + Sync {
    /// List all transactions ordered by id ascending.
    fn list_transactions(&self) -> Result<Vec<Transaction>>;

    /// Retrieve a specific transaction by id.
    fn get_transaction(&self, id: u64) -> Result<Option<Transaction>>;

    /// Store a new transaction. The id has already been assigned via
    /// [`TransactionStore::next_transaction_id`].
    fn store_transaction(&self, transaction: &Transaction) -> Result<()>;

    /// Replace the stored record with the same id. Fails if no such
    /// record exists.
    fn update_transaction(&self, transaction: &Transaction) -> Result<()>;

    /// Delete a transaction.
    /// Returns true if a record existed and was removed.
    fn delete_transaction(&self, id: u64) -> Result<bool>;

    /// Reserve and return the next transaction id. Ids are strictly
    /// increasing for the life of the store and never reused, even after
    /// deletion of the highest record.
    fn next_transaction_id(&self) -> Result<u64>;
}

/// Interface for savings goal storage operations.
pub trait SavingsGoalStore: Send + Sync {
    /// List goals most-recently-created first (id descending), truncated
    /// to `limit` when given.
    fn list_goals(&self, limit: Option<usize>) -> Result<Vec<SavingsGoal>>;

    /// Number of live goals.
    fn count_goals(&self) -> Result<usize>;

    /// Store a new goal.
    fn store_goal(&self, goal: &SavingsGoal) -> Result<()>;

    /// Delete a goal. Returns true if a record existed and was removed.
    fn delete_goal(&self, id: u64) -> Result<bool>;

    /// Reserve and return the next goal id.
    fn next_goal_id(&self) -> Result<u64>;
}

/// Interface for student storage operations.
pub trait StudentStore: Send + Sync {
    /// List all students ordered by id ascending.
    fn list_students(&self) -> Result<Vec<Student>>;

    /// Store a new student.
    fn store_student(&self, student: &Student) -> Result<()>;

    /// Delete a student. Returns true if a record existed and was removed.
    fn delete_student(&self, id: u64) -> Result<bool>;

    /// Reserve and return the next student id.
    fn next_student_id(&self) -> Result<u64>;
}

/// A storage connection: the factory for the per-entity repositories.
///
/// This abstracts away the concrete backend so the domain layer can be
/// constructed over any of them. Repositories created from clones of the
/// same connection share the underlying storage.
pub trait Connection: Send + Sync + Clone {
    type TransactionRepository: TransactionStore + Clone;
    type SavingsGoalRepository: SavingsGoalStore + Clone;
    type StudentRepository: StudentStore + Clone;

    fn create_transaction_repository(&self) -> Self::TransactionRepository;
    fn create_savings_goal_repository(&self) -> Self::SavingsGoalRepository;
    fn create_student_repository(&self) -> Self::StudentRepository;
}
