//! Table storage for parsed log entries.
//!
//! Every backend implements [`LogStore`]; the ingestion loop and the report
//! only ever talk to the trait, so the in-memory table and the SQLite file
//! are interchangeable.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use thiserror::Error;

use crate::models::{Aggregate, AggregateRow, LogEntry};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A single row was refused; the rest of the batch is unaffected.
    #[error("insert rejected for {ip}: {reason}", ip = .entry.ip_address)]
    InsertRejected {
        entry: Box<LogEntry>,
        reason: String,
    },

    /// The backing medium could not be opened, written or queried.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] rusqlite::Error),
}

pub trait LogStore {
    /// Drops every stored row and recreates the empty table.
    fn reset(&mut self) -> Result<(), StoreError>;

    /// Appends one entry.
    fn insert(&mut self, entry: &LogEntry) -> Result<(), StoreError>;

    /// Makes every inserted row durable and visible to [`LogStore::query`].
    fn commit(&mut self) -> Result<(), StoreError>;

    /// Runs one aggregation over the committed rows, ordered by count
    /// descending and then by key ascending.
    fn query(&self, aggregate: Aggregate) -> Result<Vec<AggregateRow>, StoreError>;

    fn row_count(&self) -> Result<usize, StoreError>;
}

fn check_shape(entry: &LogEntry) -> Result<(), StoreError> {
    entry
        .validate()
        .map_err(|reason| StoreError::InsertRejected {
            entry: Box::new(entry.clone()),
            reason,
        })
}
