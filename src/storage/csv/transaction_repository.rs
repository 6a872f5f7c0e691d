//! CSV-backed transaction repository.
//!
//! Transactions live in `transactions.csv` under the connection's base
//! directory. Timestamps are stored as RFC 3339, business dates as ISO-8601;
//! absent optional fields come back as their defaults on read.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use csv::{Reader, Writer};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::domain::models::{Transaction, TransactionKind};
use crate::storage::traits::TransactionStore;

use super::connection::CsvConnection;

const FILE_NAME: &str = "transactions.csv";
const HEADER: &str = "id,kind,amount,description,timestamp,category,student,date\n";

/// CSV record structure for transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TransactionRecord {
    id: u64,
    kind: String,
    amount: f64,
    description: String,
    timestamp: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    student: String,
    #[serde(default)]
    date: String,
}

impl From<&Transaction> for TransactionRecord {
    fn from(transaction: &Transaction) -> Self {
        TransactionRecord {
            id: transaction.id,
            kind: transaction.kind.to_string(),
            amount: transaction.amount,
            description: transaction.description.clone(),
            timestamp: transaction.timestamp.to_rfc3339(),
            category: transaction.category.clone(),
            student: transaction.student.clone(),
            date: transaction
                .date
                .map(|d| d.to_string())
                .unwrap_or_default(),
        }
    }
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = anyhow::Error;

    fn try_from(record: TransactionRecord) -> Result<Self> {
        let kind: TransactionKind = record
            .kind
            .parse()
            .map_err(|e| anyhow::anyhow!("failed to parse transaction kind: {e}"))?;

        let timestamp = DateTime::parse_from_rfc3339(&record.timestamp)
            .with_context(|| format!("failed to parse timestamp '{}'", record.timestamp))?
            .with_timezone(&Utc);

        let date = if record.date.trim().is_empty() {
            None
        } else {
            Some(
                record
                    .date
                    .parse::<NaiveDate>()
                    .with_context(|| format!("failed to parse date '{}'", record.date))?,
            )
        };

        Ok(Transaction {
            id: record.id,
            kind,
            amount: record.amount,
            description: record.description,
            timestamp,
            category: record.category,
            student: record.student,
            date,
        })
    }
}

/// CSV-based transaction repository.
#[derive(Clone)]
pub struct TransactionRepository {
    connection: CsvConnection,
    // High-water mark for id assignment, seeded lazily from the file so ids
    // keep increasing across deletes within this connection's lifetime.
    next_id: Arc<Mutex<Option<u64>>>,
}

impl TransactionRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            connection,
            next_id: Arc::new(Mutex::new(None)),
        }
    }

    fn read_transactions(&self) -> Result<Vec<Transaction>> {
        self.connection.ensure_file_exists(FILE_NAME, HEADER)?;

        let file = File::open(self.connection.file_path(FILE_NAME))?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let mut transactions = Vec::new();
        for result in csv_reader.deserialize::<TransactionRecord>() {
            let record = result?;
            match Transaction::try_from(record) {
                Ok(transaction) => transactions.push(transaction),
                Err(e) => {
                    warn!("skipping unparsable transaction record: {e}");
                    continue;
                }
            }
        }

        Ok(transactions)
    }

    /// Write the full transaction set to a temp file, then atomically
    /// replace the original so readers never see a partial write.
    fn write_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        let file_path = self.connection.file_path(FILE_NAME);
        let temp_file_path = file_path.with_extension("csv.tmp");

        {
            let temp_file = File::create(&temp_file_path)?;
            let writer = BufWriter::new(temp_file);
            let mut csv_writer = Writer::from_writer(writer);

            for transaction in transactions {
                csv_writer.serialize(TransactionRecord::from(transaction))?;
            }

            csv_writer.flush()?;
        }

        std::fs::rename(&temp_file_path, &file_path)?;
        Ok(())
    }
}

impl TransactionStore for TransactionRepository {
    fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let mut transactions = self.read_transactions()?;
        transactions.sort_by_key(|t| t.id);
        Ok(transactions)
    }

    fn get_transaction(&self, id: u64) -> Result<Option<Transaction>> {
        let transactions = self.read_transactions()?;
        Ok(transactions.into_iter().find(|t| t.id == id))
    }

    fn store_transaction(&self, transaction: &Transaction) -> Result<()> {
        let mut transactions = self.read_transactions()?;
        transactions.push(transaction.clone());
        transactions.sort_by_key(|t| t.id);
        self.write_transactions(&transactions)
    }

    fn update_transaction(&self, transaction: &Transaction) -> Result<()> {
        let mut transactions = self.read_transactions()?;
        match transactions.iter_mut().find(|t| t.id == transaction.id) {
            Some(slot) => *slot = transaction.clone(),
            None => anyhow::bail!("transaction {} not found", transaction.id),
        }
        self.write_transactions(&transactions)
    }

    fn delete_transaction(&self, id: u64) -> Result<bool> {
        let mut transactions = self.read_transactions()?;
        let before = transactions.len();
        transactions.retain(|t| t.id != id);

        if transactions.len() == before {
            return Ok(false);
        }

        self.write_transactions(&transactions)?;
        Ok(true)
    }

    fn next_transaction_id(&self) -> Result<u64> {
        let mut guard = self.next_id.lock().unwrap();
        let next = match *guard {
            Some(reserved) => reserved,
            None => {
                let max_id = self
                    .read_transactions()?
                    .iter()
                    .map(|t| t.id)
                    .max()
                    .unwrap_or(0);
                max_id + 1
            }
        };
        *guard = Some(next + 1);
        Ok(next)
    }
}
