//! Domain models shared by the services and the storage backends.

pub mod balance;
pub mod savings_goal;
pub mod student;
pub mod transaction;

pub use balance::{Balance, DailyTotal};
pub use savings_goal::SavingsGoal;
pub use student::Student;
pub use transaction::{Transaction, TransactionKind, MAX_DESCRIPTION_LEN};
