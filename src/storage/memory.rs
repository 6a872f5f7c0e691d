//! # In-Memory Storage Backend
//!
//! Keeps every collection in RAM behind a mutex. Useful for tests and for
//! running without any durable state. The id counters are per-kind atomics
//! that only ever move forward, so ids are never reused within a connection's
//! lifetime even after deletes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;

use crate::domain::models::{SavingsGoal, Student, Transaction};
use crate::storage::traits::{
    Connection, SavingsGoalStore, StudentStore, TransactionStore,
};

#[derive(Default)]
struct MemoryState {
    transactions: Mutex<Vec<Transaction>>,
    goals: Mutex<Vec<SavingsGoal>>,
    students: Mutex<Vec<Student>>,
    next_transaction_id: AtomicU64,
    next_goal_id: AtomicU64,
    next_student_id: AtomicU64,
}

impl MemoryState {
    fn new() -> Self {
        Self {
            next_transaction_id: AtomicU64::new(1),
            next_goal_id: AtomicU64::new(1),
            next_student_id: AtomicU64::new(1),
            ..Default::default()
        }
    }
}

/// In-memory storage connection. Clones share the same underlying state.
#[derive(Clone)]
pub struct MemoryConnection {
    state: Arc<MemoryState>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self {
            state: Arc::new(MemoryState::new()),
        }
    }
}

impl Default for MemoryConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl Connection for MemoryConnection {
    type TransactionRepository = MemoryTransactionRepository;
    type SavingsGoalRepository = MemorySavingsGoalRepository;
    type StudentRepository = MemoryStudentRepository;

    fn create_transaction_repository(&self) -> Self::TransactionRepository {
        MemoryTransactionRepository {
            state: self.state.clone(),
        }
    }

    fn create_savings_goal_repository(&self) -> Self::SavingsGoalRepository {
        MemorySavingsGoalRepository {
            state: self.state.clone(),
        }
    }

    fn create_student_repository(&self) -> Self::StudentRepository {
        MemoryStudentRepository {
            state: self.state.clone(),
        }
    }
}

#[derive(Clone)]
pub struct MemoryTransactionRepository {
    state: Arc<MemoryState>,
}

impl TransactionStore for MemoryTransactionRepository {
    fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let mut transactions = self.state.transactions.lock().unwrap().clone();
        transactions.sort_by_key(|t| t.id);
        Ok(transactions)
    }

    fn get_transaction(&self, id: u64) -> Result<Option<Transaction>> {
        let transactions = self.state.transactions.lock().unwrap();
        Ok(transactions.iter().find(|t| t.id == id).cloned())
    }

    fn store_transaction(&self, transaction: &Transaction) -> Result<()> {
        let mut transactions = self.state.transactions.lock().unwrap();
        transactions.push(transaction.clone());
        Ok(())
    }

    fn update_transaction(&self, transaction: &Transaction) -> Result<()> {
        let mut transactions = self.state.transactions.lock().unwrap();
        match transactions.iter_mut().find(|t| t.id == transaction.id) {
            Some(slot) => {
                *slot = transaction.clone();
                Ok(())
            }
            None => anyhow::bail!("transaction {} not found", transaction.id),
        }
    }

    fn delete_transaction(&self, id: u64) -> Result<bool> {
        let mut transactions = self.state.transactions.lock().unwrap();
        let before = transactions.len();
        transactions.retain(|t| t.id != id);
        Ok(transactions.len() < before)
    }

    fn next_transaction_id(&self) -> Result<u64> {
        Ok(self.state.next_transaction_id.fetch_add(1, Ordering::SeqCst))
    }
}

#[derive(Clone)]
pub struct MemorySavingsGoalRepository {
    state: Arc<MemoryState>,
}

impl SavingsGoalStore for MemorySavingsGoalRepository {
    fn list_goals(&self, limit: Option<usize>) -> Result<Vec<SavingsGoal>> {
        let mut goals = self.state.goals.lock().unwrap().clone();
        goals.sort_by(|a, b| b.id.cmp(&a.id));
        if let Some(limit) = limit {
            goals.truncate(limit);
        }
        Ok(goals)
    }

    fn count_goals(&self) -> Result<usize> {
        Ok(self.state.goals.lock().unwrap().len())
    }

    fn store_goal(&self, goal: &SavingsGoal) -> Result<()> {
        let mut goals = self.state.goals.lock().unwrap();
        goals.push(goal.clone());
        Ok(())
    }

    fn delete_goal(&self, id: u64) -> Result<bool> {
        let mut goals = self.state.goals.lock().unwrap();
        let before = goals.len();
        goals.retain(|g| g.id != id);
        Ok(goals.len() < before)
    }

    fn next_goal_id(&self) -> Result<u64> {
        Ok(self.state.next_goal_id.fetch_add(1, Ordering::SeqCst))
    }
}

#[derive(Clone)]
pub struct MemoryStudentRepository {
    state: Arc<MemoryState>,
}

impl StudentStore for MemoryStudentRepository {
    fn list_students(&self) -> Result<Vec<Student>> {
        let mut students = self.state.students.lock().unwrap().clone();
        students.sort_by_key(|s| s.id);
        Ok(students)
    }

    fn store_student(&self, student: &Student) -> Result<()> {
        let mut students = self.state.students.lock().unwrap();
        students.push(student.clone());
        Ok(())
    }

    fn delete_student(&self, id: u64) -> Result<bool> {
        let mut students = self.state.students.lock().unwrap();
        let before = students.len();
        students.retain(|s| s.id != id);
        Ok(students.len() < before)
    }

    fn next_student_id(&self) -> Result<u64> {
        Ok(self.state.next_student_id.fetch_add(1, Ordering::SeqCst))
    }
}
