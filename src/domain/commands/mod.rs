//! Command structs passed into the domain services.

pub mod savings_goals;
pub mod students;
pub mod transactions;

pub use savings_goals::CreateSavingsGoalCommand;
pub use students::CreateStudentCommand;
pub use transactions::{CreateTransactionCommand, UpdateTransactionCommand};
