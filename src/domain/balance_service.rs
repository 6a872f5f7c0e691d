//! Balance derivation for the ledger.
//!
//! The balance is never cached: every query recomputes the aggregate from the
//! live transaction set, so it cannot drift from the stored records no matter
//! how they were mutated.

use std::sync::Arc;

use crate::domain::models::{Balance, Transaction};
use crate::error::LedgerError;
use crate::storage::traits::{Connection, TransactionStore};

/// Sum rule for the aggregate: credits add, debits subtract. Addition is
/// commutative, so the result is independent of record order.
pub fn compute_total(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(Transaction::signed_amount).sum()
}

/// Service responsible for balance calculations.
#[derive(Clone)]
pub struct BalanceService<C: Connection> {
    transaction_repository: C::TransactionRepository,
}

impl<C: Connection> BalanceService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        let transaction_repository = connection.create_transaction_repository();
        Self {
            transaction_repository,
        }
    }

    /// Current aggregate balance, fully recomputed at query time.
    pub fn current_balance(&self) -> Result<Balance, LedgerError> {
        let transactions = self.transaction_repository.list_transactions()?;
        Ok(Balance {
            current_total: compute_total(&transactions),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TransactionKind;
    use crate::storage::memory::MemoryConnection;
    use crate::storage::traits::TransactionStore;
    use chrono::Utc;

    fn transaction(id: u64, kind: TransactionKind, amount: f64) -> Transaction {
        Transaction {
            id,
            kind,
            amount,
            description: String::new(),
            timestamp: Utc::now(),
            category: String::new(),
            student: String::new(),
            date: None,
        }
    }

    #[test]
    fn compute_total_is_credits_minus_debits() {
        let transactions = vec![
            transaction(1, TransactionKind::Credit, 50.0),
            transaction(2, TransactionKind::Debit, 12.5),
            transaction(3, TransactionKind::Credit, 2.5),
        ];
        assert_eq!(compute_total(&transactions), 40.0);
    }

    #[test]
    fn empty_store_has_zero_balance() {
        let connection = Arc::new(MemoryConnection::new());
        let service = BalanceService::new(connection);
        assert_eq!(service.current_balance().unwrap().current_total, 0.0);
    }

    #[test]
    fn balance_reflects_out_of_band_mutations() {
        let connection = Arc::new(MemoryConnection::new());
        let service = BalanceService::new(connection.clone());
        let repo = connection.create_transaction_repository();

        repo.store_transaction(&transaction(1, TransactionKind::Credit, 30.0))
            .unwrap();
        assert_eq!(service.current_balance().unwrap().current_total, 30.0);

        repo.delete_transaction(1).unwrap();
        assert_eq!(service.current_balance().unwrap().current_total, 0.0);
    }
}
