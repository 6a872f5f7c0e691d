//! CSV-backed savings goal repository, storing goals in `savings_goals.csv`.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::{Reader, Writer};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::domain::models::SavingsGoal;
use crate::storage::traits::SavingsGoalStore;

use super::connection::CsvConnection;

const FILE_NAME: &str = "savings_goals.csv";
const HEADER: &str = "id,name,amount,created_at\n";

/// CSV record structure for savings goals.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavingsGoalRecord {
    id: u64,
    name: String,
    amount: f64,
    created_at: String,
}

impl From<&SavingsGoal> for SavingsGoalRecord {
    fn from(goal: &SavingsGoal) -> Self {
        SavingsGoalRecord {
            id: goal.id,
            name: goal.name.clone(),
            amount: goal.amount,
            created_at: goal.created_at.to_rfc3339(),
        }
    }
}

impl TryFrom<SavingsGoalRecord> for SavingsGoal {
    type Error = anyhow::Error;

    fn try_from(record: SavingsGoalRecord) -> Result<Self> {
        let created_at = DateTime::parse_from_rfc3339(&record.created_at)
            .with_context(|| format!("failed to parse created_at '{}'", record.created_at))?
            .with_timezone(&Utc);

        Ok(SavingsGoal {
            id: record.id,
            name: record.name,
            amount: record.amount,
            created_at,
        })
    }
}

/// CSV-based savings goal repository.
#[derive(Clone)]
pub struct SavingsGoalRepository {
    connection: CsvConnection,
    next_id: Arc<Mutex<Option<u64>>>,
}

impl SavingsGoalRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            connection,
            next_id: Arc::new(Mutex::new(None)),
        }
    }

    fn read_goals(&self) -> Result<Vec<SavingsGoal>> {
        self.connection.ensure_file_exists(FILE_NAME, HEADER)?;

        let file = File::open(self.connection.file_path(FILE_NAME))?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let mut goals = Vec::new();
        for result in csv_reader.deserialize::<SavingsGoalRecord>() {
            let record = result?;
            match SavingsGoal::try_from(record) {
                Ok(goal) => goals.push(goal),
                Err(e) => {
                    warn!("skipping unparsable savings goal record: {e}");
                    continue;
                }
            }
        }

        Ok(goals)
    }

    fn write_goals(&self, goals: &[SavingsGoal]) -> Result<()> {
        let file_path = self.connection.file_path(FILE_NAME);
        let temp_file_path = file_path.with_extension("csv.tmp");

        {
            let temp_file = File::create(&temp_file_path)?;
            let writer = BufWriter::new(temp_file);
            let mut csv_writer = Writer::from_writer(writer);

            for goal in goals {
                csv_writer.serialize(SavingsGoalRecord::from(goal))?;
            }

            csv_writer.flush()?;
        }

        std::fs::rename(&temp_file_path, &file_path)?;
        Ok(())
    }
}

impl SavingsGoalStore for SavingsGoalRepository {
    fn list_goals(&self, limit: Option<usize>) -> Result<Vec<SavingsGoal>> {
        let mut goals = self.read_goals()?;
        goals.sort_by(|a, b| b.id.cmp(&a.id));
        if let Some(limit) = limit {
            goals.truncate(limit);
        }
        Ok(goals)
    }

    fn count_goals(&self) -> Result<usize> {
        Ok(self.read_goals()?.len())
    }

    fn store_goal(&self, goal: &SavingsGoal) -> Result<()> {
        let mut goals = self.read_goals()?;
        goals.push(goal.clone());
        goals.sort_by_key(|g| g.id);
        self.write_goals(&goals)
    }

    fn delete_goal(&self, id: u64) -> Result<bool> {
        let mut goals = self.read_goals()?;
        let before = goals.len();
        goals.retain(|g| g.id != id);

        if goals.len() == before {
            return Ok(false);
        }

        self.write_goals(&goals)?;
        Ok(true)
    }

    fn next_goal_id(&self) -> Result<u64> {
        let mut guard = self.next_id.lock().unwrap();
        let next = match *guard {
            Some(reserved) => reserved,
            None => self.read_goals()?.iter().map(|g| g.id).max().unwrap_or(0) + 1,
        };
        *guard = Some(next + 1);
        Ok(next)
    }
}
