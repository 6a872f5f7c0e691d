//! CSV connection: owns the base directory and bootstraps the per-entity
//! files with their headers.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::debug;

use crate::storage::traits::Connection;

/// CsvConnection manages file paths and ensures the CSV files exist.
/// Clones share the same base directory.
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new CSV connection rooted at `base_directory`, creating the
    /// directory if it does not exist yet.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub(crate) fn file_path(&self, file_name: &str) -> PathBuf {
        self.base_directory.join(file_name)
    }

    /// Ensure a CSV file exists with its header row.
    pub(crate) fn ensure_file_exists(&self, file_name: &str, header: &str) -> Result<()> {
        let file_path = self.file_path(file_name);

        if !file_path.exists() {
            fs::write(&file_path, header)?;
            debug!("created CSV file {:?}", file_path);
        }

        Ok(())
    }
}

impl Connection for CsvConnection {
    type TransactionRepository = super::transaction_repository::TransactionRepository;
    type SavingsGoalRepository = super::savings_goal_repository::SavingsGoalRepository;
    type StudentRepository = super::student_repository::StudentRepository;

    fn create_transaction_repository(&self) -> Self::TransactionRepository {
        super::transaction_repository::TransactionRepository::new(self.clone())
    }

    fn create_savings_goal_repository(&self) -> Self::SavingsGoalRepository {
        super::savings_goal_repository::SavingsGoalRepository::new(self.clone())
    }

    fn create_student_repository(&self) -> Self::StudentRepository {
        super::student_repository::StudentRepository::new(self.clone())
    }
}
