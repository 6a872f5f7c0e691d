//! Savings goal management.
//!
//! The class keeps a short wishlist of things to save for. At most three
//! goals may exist at once; deleting one frees a slot immediately.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use log::info;

use crate::domain::commands::savings_goals::CreateSavingsGoalCommand;
use crate::domain::models::SavingsGoal;
use crate::error::LedgerError;
use crate::storage::traits::{Connection, SavingsGoalStore};

/// Upper bound on concurrently live goals.
pub const MAX_SAVINGS_GOALS: usize = 3;

#[derive(Clone)]
pub struct SavingsGoalService<C: Connection> {
    goal_repository: C::SavingsGoalRepository,
    write_lock: Arc<Mutex<()>>,
}

impl<C: Connection> SavingsGoalService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        let goal_repository = connection.create_savings_goal_repository();
        Self {
            goal_repository,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Goals most-recent-first. `limit` defaults to the registry capacity.
    pub fn list_goals(&self, limit: Option<usize>) -> Result<Vec<SavingsGoal>, LedgerError> {
        Ok(self
            .goal_repository
            .list_goals(Some(limit.unwrap_or(MAX_SAVINGS_GOALS)))?)
    }

    pub fn count_goals(&self) -> Result<usize, LedgerError> {
        Ok(self.goal_repository.count_goals()?)
    }

    pub fn create_goal(
        &self,
        command: CreateSavingsGoalCommand,
    ) -> Result<SavingsGoal, LedgerError> {
        let name = command.name.trim().to_string();
        if name.is_empty() {
            return Err(LedgerError::InvalidInput(
                "goal name must not be empty".to_string(),
            ));
        }
        if !command.amount.is_finite() || command.amount < 0.0 {
            return Err(LedgerError::InvalidInput(format!(
                "goal amount must not be negative, got {}",
                command.amount
            )));
        }

        let _guard = self.write_lock.lock().unwrap();

        // Capacity is checked against live goals only, so a deleted goal
        // frees its slot right away.
        if self.goal_repository.count_goals()? >= MAX_SAVINGS_GOALS {
            return Err(LedgerError::CapacityExceeded {
                max: MAX_SAVINGS_GOALS,
            });
        }

        let goal = SavingsGoal {
            id: self.goal_repository.next_goal_id()?,
            name,
            amount: command.amount,
            created_at: command.created_at.unwrap_or_else(Utc::now),
        };
        self.goal_repository.store_goal(&goal)?;

        info!("created savings goal {} ({})", goal.id, goal.name);
        Ok(goal)
    }

    pub fn delete_goal(&self, id: u64) -> Result<bool, LedgerError> {
        let _guard = self.write_lock.lock().unwrap();

        let deleted = self.goal_repository.delete_goal(id)?;
        if deleted {
            info!("deleted savings goal {id}");
        }
        Ok(deleted)
    }
}
