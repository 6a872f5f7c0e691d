//! Storage backends and the storage-port traits they implement.

pub mod csv;
pub mod memory;
pub mod traits;

pub use csv::CsvConnection;
pub use memory::MemoryConnection;
pub use traits::{Connection, SavingsGoalStore, StudentStore, TransactionStore};
