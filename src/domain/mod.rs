//! Domain layer: models, commands, and the services that enforce the
//! business rules in front of the storage port.

pub mod balance_service;
pub mod commands;
pub mod models;
pub mod savings_goal_service;
pub mod student_service;
pub mod transaction_service;

pub use balance_service::BalanceService;
pub use savings_goal_service::{SavingsGoalService, MAX_SAVINGS_GOALS};
pub use student_service::StudentService;
pub use transaction_service::TransactionService;
