use crate::{
    analytics::rank,
    models::{AUTH_FAILURE_STATUS, Aggregate, AggregateRow, LogEntry},
    store::{LogStore, StoreError, check_shape},
};

/// In-process table. Inserts stay pending until [`LogStore::commit`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    identifier: String,
    rows: Vec<LogEntry>,
    pending: Vec<LogEntry>,
}

impl MemoryStore {
    pub fn reset_and_open(identifier: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            ..Self::default()
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl LogStore for MemoryStore {
    fn reset(&mut self) -> Result<(), StoreError> {
        self.rows.clear();
        self.pending.clear();
        tracing::debug!(store = %self.identifier, "memory table reset");
        Ok(())
    }

    fn insert(&mut self, entry: &LogEntry) -> Result<(), StoreError> {
        check_shape(entry)?;
        self.pending.push(entry.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.rows.append(&mut self.pending);
        Ok(())
    }

    fn query(&self, aggregate: Aggregate) -> Result<Vec<AggregateRow>, StoreError> {
        let rows = self.rows.iter();
        Ok(match aggregate {
            Aggregate::ActivityPerIp => rank(rows.map(|e| (e.ip_address.as_str(), 1))),
            Aggregate::MostAccessed => rank(rows.map(|e| (e.resource.as_str(), 1))),
            Aggregate::SuspiciousActivity => rank(rows.map(|e| {
                (
                    e.ip_address.as_str(),
                    u64::from(e.status_code == AUTH_FAILURE_STATUS),
                )
            })),
        })
    }

    fn row_count(&self) -> Result<usize, StoreError> {
        Ok(self.rows.len())
    }
}
