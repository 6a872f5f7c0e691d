//! # Cashbox Ledger
//!
//! Core library for a classroom cash box: a small ledger of credits and
//! debits with a derived balance that may never go negative, a short list
//! of savings goals, and a registry of students.
//!
//! The library is storage-agnostic. Domain services talk to repositories
//! through the traits in [`storage::traits`]; two backends ship in-tree,
//! an in-memory one for tests and ephemeral use and a CSV one that keeps
//! one human-readable file per entity kind.
//!
//! ```no_run
//! use cashbox_ledger::{CreateTransactionCommand, Ledger, TransactionKind};
//!
//! # fn main() -> Result<(), cashbox_ledger::LedgerError> {
//! let ledger = Ledger::open("./data")?;
//! ledger.transactions.create_transaction(CreateTransactionCommand::new(
//!     TransactionKind::Credit,
//!     50.0,
//!     "Startkapital",
//! ))?;
//! println!("balance: {:.2}", ledger.transactions.balance()?.current_total);
//! # Ok(())
//! # }
//! ```

pub mod domain;
pub mod error;
pub mod storage;

use std::path::Path;
use std::sync::Arc;

pub use domain::commands::savings_goals::CreateSavingsGoalCommand;
pub use domain::commands::students::CreateStudentCommand;
pub use domain::commands::transactions::{CreateTransactionCommand, UpdateTransactionCommand};
pub use domain::models::{
    Balance, DailyTotal, SavingsGoal, Student, Transaction, TransactionKind, MAX_DESCRIPTION_LEN,
};
pub use domain::{
    BalanceService, SavingsGoalService, StudentService, TransactionService, MAX_SAVINGS_GOALS,
};
pub use error::LedgerError;
pub use storage::{Connection, CsvConnection, MemoryConnection};

/// The assembled ledger: one service per concern, all sharing a backend.
pub struct Ledger<C: Connection> {
    pub transactions: TransactionService<C>,
    pub savings_goals: SavingsGoalService<C>,
    pub students: StudentService<C>,
}

impl<C: Connection> Ledger<C> {
    /// Wire the services onto an existing backend connection.
    pub fn new(connection: Arc<C>) -> Self {
        let balance_service = BalanceService::new(connection.clone());
        Self {
            transactions: TransactionService::new(connection.clone(), balance_service),
            savings_goals: SavingsGoalService::new(connection.clone()),
            students: StudentService::new(connection),
        }
    }
}

impl Ledger<MemoryConnection> {
    /// An empty ledger that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryConnection::new()))
    }
}

impl Ledger<CsvConnection> {
    /// Open (or initialize) a CSV-backed ledger rooted at `directory`.
    pub fn open<P: AsRef<Path>>(directory: P) -> Result<Self, LedgerError> {
        let connection = CsvConnection::new(directory)?;
        Ok(Self::new(Arc::new(connection)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_ledger_wires_all_services() {
        let ledger = Ledger::in_memory();

        ledger
            .transactions
            .create_transaction(CreateTransactionCommand::new(
                TransactionKind::Credit,
                50.0,
                "Startkapital",
            ))
            .unwrap();
        ledger
            .savings_goals
            .create_goal(CreateSavingsGoalCommand::new("Klassenfahrt", 250.0))
            .unwrap();
        ledger
            .students
            .create_student(CreateStudentCommand::new("Anna"))
            .unwrap();

        assert_eq!(ledger.transactions.balance().unwrap().current_total, 50.0);
        assert_eq!(ledger.savings_goals.count_goals().unwrap(), 1);
        assert_eq!(ledger.students.list_students().unwrap().len(), 1);
    }

    #[test]
    fn csv_ledger_persists_across_reopen() {
        let temp_dir = tempfile::TempDir::new().unwrap();

        {
            let ledger = Ledger::open(temp_dir.path()).unwrap();
            ledger
                .transactions
                .create_transaction(CreateTransactionCommand::new(
                    TransactionKind::Credit,
                    50.0,
                    "Startkapital",
                ))
                .unwrap();
            ledger
                .transactions
                .create_transaction(CreateTransactionCommand::new(
                    TransactionKind::Debit,
                    12.5,
                    "Kreide",
                ))
                .unwrap();
        }

        let reopened = Ledger::open(temp_dir.path()).unwrap();
        assert_eq!(reopened.transactions.balance().unwrap().current_total, 37.5);
        assert_eq!(reopened.transactions.list_transactions().unwrap().len(), 2);
    }
}
