//! SQLite connection handle (one per caller; lightweight for CLI usage).
//!
//! Every device/thread opens its own `DbPool`; the connection is released
//! when the handle goes out of scope.

use crate::config::DEFAULT_BUSY_TIMEOUT_MS;
use rusqlite::{Connection, Result};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS);

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    pub fn new(path: &str) -> Result<Self> {
        Self::open(path, DEFAULT_BUSY_TIMEOUT)
    }

    /// Open the database with WAL journaling and the given busy timeout.
    pub fn open(path: &str, busy_timeout: Duration) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        conn.busy_timeout(busy_timeout)?;
        // journal_mode returns a row, so it cannot go through execute_batch
        let mode: String = conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        debug!(
            path,
            journal_mode = %mode,
            timeout_ms = busy_timeout.as_millis() as u64,
            "opened database"
        );
        Ok(Self { conn })
    }
}
