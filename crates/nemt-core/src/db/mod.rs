//! Database layer for the transport stores.

mod schema;
mod drivers;
mod patients;
mod routes;
mod vehicles;

pub use schema::*;

use rusqlite::types::ToSqlOutput;
use rusqlite::{Connection, Row, ToSql};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// Binds a `u64` as the signed integer with the same bits.
///
/// SQLite integers are `i64`, so ids and clock values above `i64::MAX` are
/// stored as negatives and come back unchanged through [`u64_at`]. Columns
/// holding these values are only ever compared for equality.
pub(crate) struct SqlU64(pub u64);

impl ToSql for SqlU64 {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0 as i64))
    }
}

/// Read a column written through [`SqlU64`].
pub(crate) fn u64_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    row.get::<_, i64>(idx).map(|v| v as u64)
}

/// Database connection wrapper.
///
/// Every entity collection lives in its own table with its own id sequence.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        debug!(path = %path.display(), "opened transport database");
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        debug!("transport schema initialized");
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Id of the row just inserted on this connection.
    fn last_id(conn: &Connection) -> u64 {
        // AUTOINCREMENT rowids start at 1
        conn.last_insert_rowid() as u64
    }
}
