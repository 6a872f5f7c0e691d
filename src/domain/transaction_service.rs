//! Transaction service: the mutation/query contract of the ledger core.
//!
//! All business rules live here, in front of the storage port:
//!
//! - amounts must be positive, descriptions at most 200 characters
//! - the aggregate balance must never go negative as an effect of a create
//!   or update (deletes are exempt)
//! - the check-then-write on the balance floor is serialized per service
//!   instance, so concurrent creates cannot jointly overdraw the cash box

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use log::info;

use crate::domain::balance_service::{compute_total, BalanceService};
use crate::domain::commands::transactions::{
    CreateTransactionCommand, UpdateTransactionCommand,
};
use crate::domain::models::{
    Balance, DailyTotal, Transaction, MAX_DESCRIPTION_LEN,
};
use crate::error::LedgerError;
use crate::storage::traits::{Connection, TransactionStore};

#[derive(Clone)]
pub struct TransactionService<C: Connection> {
    transaction_repository: C::TransactionRepository,
    balance_service: BalanceService<C>,
    // Serializes check-then-write mutations across clones of this service.
    write_lock: Arc<Mutex<()>>,
}

impl<C: Connection> TransactionService<C> {
    pub fn new(connection: Arc<C>, balance_service: BalanceService<C>) -> Self {
        let transaction_repository = connection.create_transaction_repository();
        Self {
            transaction_repository,
            balance_service,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// All transactions, ascending by id.
    pub fn list_transactions(&self) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self.transaction_repository.list_transactions()?)
    }

    /// Look up a single transaction. Absence is a normal negative result.
    pub fn get_transaction(&self, id: u64) -> Result<Option<Transaction>, LedgerError> {
        Ok(self.transaction_repository.get_transaction(id)?)
    }

    /// Current aggregate balance, always a full recomputation.
    pub fn balance(&self) -> Result<Balance, LedgerError> {
        self.balance_service.current_balance()
    }

    pub fn create_transaction(
        &self,
        command: CreateTransactionCommand,
    ) -> Result<Transaction, LedgerError> {
        validate_amount(command.amount)?;
        validate_description(&command.description)?;

        let _guard = self.write_lock.lock().unwrap();

        // Read, validate against the prospective total, only then write.
        let transactions = self.transaction_repository.list_transactions()?;
        let current_total = compute_total(&transactions);
        let attempted_change = command.kind.signed(command.amount);
        if current_total + attempted_change < 0.0 {
            return Err(LedgerError::BalanceViolation {
                current_total,
                attempted_change,
            });
        }

        let id = self.transaction_repository.next_transaction_id()?;
        let transaction = Transaction {
            id,
            kind: command.kind,
            amount: command.amount,
            description: command.description,
            timestamp: command.timestamp.unwrap_or_else(Utc::now),
            category: command.category.unwrap_or_default(),
            student: command.student.unwrap_or_default(),
            date: Some(command.date.unwrap_or_else(|| Utc::now().date_naive())),
        };

        self.transaction_repository.store_transaction(&transaction)?;

        info!(
            "created transaction {} ({} {:.2}), new balance {:.2}",
            transaction.id,
            transaction.kind,
            transaction.amount,
            current_total + attempted_change
        );
        Ok(transaction)
    }

    /// Partial update of an existing transaction. The hypothetical
    /// post-update total is checked before anything is written, so a
    /// rejected update leaves the record untouched.
    pub fn update_transaction(
        &self,
        id: u64,
        command: UpdateTransactionCommand,
    ) -> Result<Transaction, LedgerError> {
        if let Some(amount) = command.amount {
            validate_amount(amount)?;
        }
        if let Some(description) = &command.description {
            validate_description(description)?;
        }

        let _guard = self.write_lock.lock().unwrap();

        let transactions = self.transaction_repository.list_transactions()?;
        let existing = transactions
            .iter()
            .find(|t| t.id == id)
            .ok_or(LedgerError::NotFound {
                entity: "transaction",
                id,
            })?;

        let mut updated = existing.clone();
        if let Some(kind) = command.kind {
            updated.kind = kind;
        }
        if let Some(amount) = command.amount {
            updated.amount = amount;
        }
        if let Some(description) = command.description {
            updated.description = description;
        }
        if let Some(timestamp) = command.timestamp {
            updated.timestamp = timestamp;
        }

        let hypothetical_total = compute_total(&transactions)
            - existing.signed_amount()
            + updated.signed_amount();
        if hypothetical_total < 0.0 {
            return Err(LedgerError::BalanceViolation {
                current_total: compute_total(&transactions),
                attempted_change: updated.signed_amount() - existing.signed_amount(),
            });
        }

        self.transaction_repository.update_transaction(&updated)?;

        info!(
            "updated transaction {}, new balance {:.2}",
            updated.id, hypothetical_total
        );
        Ok(updated)
    }

    /// Delete a transaction. No balance floor check applies: removing a
    /// record may legally leave the total lower or higher.
    pub fn delete_transaction(&self, id: u64) -> Result<bool, LedgerError> {
        let _guard = self.write_lock.lock().unwrap();

        let deleted = self.transaction_repository.delete_transaction(id)?;
        if deleted {
            let balance = self.balance_service.current_balance()?;
            info!(
                "deleted transaction {}, new balance {:.2}",
                id, balance.current_total
            );
        }
        Ok(deleted)
    }

    /// Case-insensitive search over kind, description, amount, category,
    /// student, and business date. The kind matches on its whole label
    /// only; the free-text fields match on substrings.
    pub fn search_transactions(&self, text: &str) -> Result<Vec<Transaction>, LedgerError> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return self.list_transactions();
        }

        let matches = self
            .list_transactions()?
            .into_iter()
            .filter(|t| {
                t.kind.as_str() == needle
                    || t.description.to_lowercase().contains(&needle)
                    || t.category.to_lowercase().contains(&needle)
                    || t.student.to_lowercase().contains(&needle)
                    || format!("{:.2}", t.amount).contains(&needle)
                    || t.date.map(|d| d.to_string().contains(&needle)).unwrap_or(false)
            })
            .collect();
        Ok(matches)
    }

    /// Per-day credit/debit/net summary, ascending by date. Transactions
    /// without a business date fall back to their timestamp's date.
    pub fn daily_totals(&self) -> Result<Vec<DailyTotal>, LedgerError> {
        let mut by_date: BTreeMap<chrono::NaiveDate, (f64, f64)> = BTreeMap::new();

        for transaction in self.list_transactions()? {
            let date = transaction
                .date
                .unwrap_or_else(|| transaction.timestamp.date_naive());
            let entry = by_date.entry(date).or_insert((0.0, 0.0));
            match transaction.signed_amount() {
                change if change >= 0.0 => entry.0 += transaction.amount,
                _ => entry.1 += transaction.amount,
            }
        }

        Ok(by_date
            .into_iter()
            .map(|(date, (credited, debited))| DailyTotal {
                date,
                credited,
                debited,
                net: credited - debited,
            })
            .collect())
    }
}

fn validate_amount(amount: f64) -> Result<(), LedgerError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(LedgerError::InvalidInput(format!(
            "amount must be positive, got {amount}"
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), LedgerError> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(LedgerError::InvalidInput(format!(
            "description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TransactionKind;
    use crate::storage::memory::MemoryConnection;
    use chrono::NaiveDate;

    fn create_test_service() -> TransactionService<MemoryConnection> {
        let connection = Arc::new(MemoryConnection::new());
        let balance_service = BalanceService::new(connection.clone());
        TransactionService::new(connection, balance_service)
    }

    fn credit(amount: f64, description: &str) -> CreateTransactionCommand {
        CreateTransactionCommand::new(TransactionKind::Credit, amount, description)
    }

    fn debit(amount: f64, description: &str) -> CreateTransactionCommand {
        CreateTransactionCommand::new(TransactionKind::Debit, amount, description)
    }

    #[test]
    fn create_assigns_id_and_defaults() {
        let service = create_test_service();

        let transaction = service.create_transaction(credit(10.0, "Startkapital")).unwrap();

        assert_eq!(transaction.id, 1);
        assert_eq!(transaction.amount, 10.0);
        assert_eq!(transaction.description, "Startkapital");
        assert!(transaction.date.is_some());
        assert_eq!(transaction.category, "");
        assert_eq!(transaction.student, "");
    }

    #[test]
    fn balance_scenario_from_empty_store() {
        let service = create_test_service();

        service.create_transaction(credit(50.0, "seed")).unwrap();
        assert_eq!(service.balance().unwrap().current_total, 50.0);

        service.create_transaction(debit(12.5, "chalk")).unwrap();
        assert_eq!(service.balance().unwrap().current_total, 37.5);

        let err = service.create_transaction(debit(100.0, "trip")).unwrap_err();
        assert!(matches!(err, LedgerError::BalanceViolation { .. }));
        assert_eq!(service.balance().unwrap().current_total, 37.5);
        assert_eq!(service.list_transactions().unwrap().len(), 2);
    }

    #[test]
    fn delete_restores_the_pre_create_balance() {
        let service = create_test_service();

        service.create_transaction(credit(50.0, "seed")).unwrap();
        let before = service.balance().unwrap().current_total;

        let created = service.create_transaction(credit(20.0, "extra")).unwrap();
        assert!(service.delete_transaction(created.id).unwrap());

        assert_eq!(service.balance().unwrap().current_total, before);
    }

    #[test]
    fn delete_is_exempt_from_the_balance_floor() {
        let service = create_test_service();

        let seed = service.create_transaction(credit(50.0, "seed")).unwrap();
        service.create_transaction(debit(30.0, "paint")).unwrap();

        // Removing the credit leaves the total negative; that is legal.
        assert!(service.delete_transaction(seed.id).unwrap());
        assert_eq!(service.balance().unwrap().current_total, -30.0);
    }

    #[test]
    fn ids_are_strictly_increasing_and_never_reused() {
        let service = create_test_service();

        let first = service.create_transaction(credit(10.0, "a")).unwrap();
        service.delete_transaction(first.id).unwrap();
        let second = service.create_transaction(credit(10.0, "b")).unwrap();

        assert!(second.id > first.id);
    }

    #[test]
    fn create_rejects_non_positive_amounts() {
        let service = create_test_service();

        for amount in [0.0, -5.0] {
            let err = service.create_transaction(credit(amount, "bad")).unwrap_err();
            assert!(matches!(err, LedgerError::InvalidInput(_)));
        }
        assert!(service.list_transactions().unwrap().is_empty());
    }

    #[test]
    fn create_rejects_over_long_descriptions() {
        let service = create_test_service();

        let long = "x".repeat(MAX_DESCRIPTION_LEN + 1);
        let err = service.create_transaction(credit(10.0, &long)).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)));

        let at_limit = "x".repeat(MAX_DESCRIPTION_LEN);
        assert!(service.create_transaction(credit(10.0, &at_limit)).is_ok());
    }

    #[test]
    fn update_replaces_only_the_supplied_fields() {
        let service = create_test_service();

        let created = service.create_transaction(credit(40.0, "Kuchenverkauf")).unwrap();
        let updated = service
            .update_transaction(
                created.id,
                UpdateTransactionCommand {
                    amount: Some(45.0),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.amount, 45.0);
        assert_eq!(updated.description, "Kuchenverkauf");
        assert_eq!(updated.kind, TransactionKind::Credit);
        assert_eq!(service.balance().unwrap().current_total, 45.0);
    }

    #[test]
    fn update_rejects_a_hypothetical_negative_total_and_rolls_back() {
        let service = create_test_service();

        service.create_transaction(credit(50.0, "seed")).unwrap();
        let spent = service.create_transaction(debit(20.0, "chalk")).unwrap();

        let err = service
            .update_transaction(
                spent.id,
                UpdateTransactionCommand {
                    amount: Some(80.0),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::BalanceViolation { .. }));

        // The record must not be left in the invalid state.
        let unchanged = service.get_transaction(spent.id).unwrap().unwrap();
        assert_eq!(unchanged.amount, 20.0);
        assert_eq!(service.balance().unwrap().current_total, 30.0);
    }

    #[test]
    fn update_of_unknown_id_reports_not_found() {
        let service = create_test_service();

        let err = service
            .update_transaction(99, UpdateTransactionCommand::default())
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::NotFound {
                entity: "transaction",
                id: 99
            }
        ));
    }

    #[test]
    fn balance_equals_the_sum_rule_over_random_mutations() {
        let service = create_test_service();

        let mut expected = 0.0;
        let mut created_ids = Vec::new();
        for (kind, amount) in [
            (TransactionKind::Credit, 100.0),
            (TransactionKind::Debit, 33.25),
            (TransactionKind::Credit, 7.75),
            (TransactionKind::Debit, 12.0),
        ] {
            let tx = service
                .create_transaction(CreateTransactionCommand::new(kind, amount, "t"))
                .unwrap();
            expected += kind.signed(amount);
            created_ids.push(tx.id);
        }

        service.delete_transaction(created_ids[1]).unwrap();
        expected += 33.25;

        assert_eq!(service.balance().unwrap().current_total, expected);
    }

    #[test]
    fn search_matches_description_category_and_student() {
        let service = create_test_service();

        let mut cmd = credit(10.0, "Kekse für die Pause");
        cmd.category = Some("Verpflegung".to_string());
        cmd.student = Some("Mia".to_string());
        service.create_transaction(cmd).unwrap();
        service.create_transaction(credit(20.0, "Startkapital")).unwrap();

        assert_eq!(service.search_transactions("kekse").unwrap().len(), 1);
        assert_eq!(service.search_transactions("verpflegung").unwrap().len(), 1);
        assert_eq!(service.search_transactions("mia").unwrap().len(), 1);
        assert_eq!(service.search_transactions("").unwrap().len(), 2);
        assert!(service.search_transactions("zzz").unwrap().is_empty());
    }

    #[test]
    fn search_matches_the_kind_by_whole_label_only() {
        let service = create_test_service();

        service.create_transaction(credit(50.0, "seed")).unwrap();
        service.create_transaction(debit(10.0, "chalk")).unwrap();

        assert_eq!(service.search_transactions("credit").unwrap().len(), 1);
        assert_eq!(service.search_transactions("DEBIT").unwrap().len(), 1);

        // Fragments of a kind label must not match every transaction
        // of that kind.
        assert!(service.search_transactions("red").unwrap().is_empty());
        assert!(service.search_transactions("bit").unwrap().is_empty());
    }

    #[test]
    fn daily_totals_partition_the_ledger() {
        let service = create_test_service();

        let day_one = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let day_two = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();

        let mut seed = credit(50.0, "seed");
        seed.date = Some(day_one);
        service.create_transaction(seed).unwrap();

        let mut chalk = debit(12.5, "chalk");
        chalk.date = Some(day_two);
        service.create_transaction(chalk).unwrap();

        let mut cake = credit(5.0, "cake");
        cake.date = Some(day_two);
        service.create_transaction(cake).unwrap();

        let totals = service.daily_totals().unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].date, day_one);
        assert_eq!(totals[0].net, 50.0);
        assert_eq!(totals[1].date, day_two);
        assert_eq!(totals[1].credited, 5.0);
        assert_eq!(totals[1].debited, 12.5);
        assert_eq!(totals[1].net, -7.5);

        let net_sum: f64 = totals.iter().map(|t| t.net).sum();
        assert_eq!(net_sum, service.balance().unwrap().current_total);
    }

    #[test]
    fn works_against_the_csv_backend_too() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let connection = Arc::new(crate::storage::csv::CsvConnection::new(temp_dir.path()).unwrap());
        let balance_service = BalanceService::new(connection.clone());
        let service = TransactionService::new(connection, balance_service);

        service.create_transaction(credit(50.0, "seed")).unwrap();
        service.create_transaction(debit(12.5, "chalk")).unwrap();
        let err = service.create_transaction(debit(100.0, "trip")).unwrap_err();

        assert!(matches!(err, LedgerError::BalanceViolation { .. }));
        assert_eq!(service.balance().unwrap().current_total, 37.5);
    }
}
