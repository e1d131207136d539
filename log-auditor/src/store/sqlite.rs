//! SQLite backend using rusqlite.
//!
//! The store identity is the database path; `:memory:` opens a private
//! in-memory database.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, params};

use crate::{
    models::{AUTH_FAILURE_STATUS, Aggregate, AggregateRow, LogEntry},
    store::{LogStore, StoreError, check_shape},
};

const RESET_SCHEMA: &str = "
    DROP TABLE IF EXISTS logs;
    CREATE TABLE logs (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        date        TEXT    NOT NULL,
        time        TEXT    NOT NULL,
        ip_address  TEXT    NOT NULL,
        status_code INTEGER NOT NULL,
        size        TEXT    NOT NULL,
        method      TEXT    NOT NULL,
        resource    TEXT    NOT NULL,
        error       TEXT    NOT NULL
    );
";

const INSERT_ENTRY: &str = "
    INSERT INTO logs (date, time, ip_address, status_code, size, method, resource, error)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
";

fn aggregate_sql(aggregate: Aggregate) -> String {
    match aggregate {
        Aggregate::ActivityPerIp => "
            SELECT ip_address, COUNT(*) AS request_count FROM logs
            GROUP BY ip_address
            ORDER BY request_count DESC, ip_address ASC"
            .to_string(),
        Aggregate::MostAccessed => "
            SELECT resource, COUNT(*) AS accessed_count FROM logs
            GROUP BY resource
            ORDER BY accessed_count DESC, resource ASC"
            .to_string(),
        Aggregate::SuspiciousActivity => format!(
            "
            SELECT ip_address,
                   SUM(CASE WHEN status_code = {AUTH_FAILURE_STATUS} THEN 1 ELSE 0 END) AS failed_accessed
            FROM logs
            GROUP BY ip_address
            ORDER BY failed_accessed DESC, ip_address ASC"
        ),
    }
}

/// Log table in a SQLite database. Inserts share one transaction that stays
/// open until [`LogStore::commit`]; dropping the store first rolls it back.
pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Opens (creating if missing) the database at `path` and resets the log table.
    pub fn reset_and_open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;
        let mut store = Self { conn, path };
        store.reset()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn begin_if_idle(&self) -> Result<(), StoreError> {
        if self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN")?;
        }
        Ok(())
    }
}

impl LogStore for SqliteStore {
    fn reset(&mut self) -> Result<(), StoreError> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("ROLLBACK")?;
        }
        self.conn.execute_batch(RESET_SCHEMA)?;
        tracing::debug!(path = %self.path.display(), "log table reset");
        Ok(())
    }

    fn insert(&mut self, entry: &LogEntry) -> Result<(), StoreError> {
        check_shape(entry)?;
        self.begin_if_idle()?;
        let mut stmt = self.conn.prepare_cached(INSERT_ENTRY)?;
        stmt.execute(params![
            entry.date_text(),
            entry.time_text(),
            entry.ip_address.as_str(),
            entry.status_code,
            entry.size,
            entry.method,
            entry.resource.as_str(),
            entry.error,
        ])
        .map_err(|e| StoreError::InsertRejected {
            entry: Box::new(entry.clone()),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT")?;
        }
        Ok(())
    }

    fn query(&self, aggregate: Aggregate) -> Result<Vec<AggregateRow>, StoreError> {
        let mut stmt = self.conn.prepare(&aggregate_sql(aggregate))?;
        let rows = stmt
            .query_map([], |row| {
                let count: i64 = row.get(1)?;
                Ok(AggregateRow::new(
                    row.get::<_, String>(0)?,
                    u64::try_from(count).unwrap_or_default(),
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn row_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM logs", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}
