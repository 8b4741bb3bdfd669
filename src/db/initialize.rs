use crate::db::migrate::run_pending_migrations;
use crate::errors::{AppError, AppResult};
use rusqlite::Connection;
use tracing::debug;

/// Bring the agenda and check-in schema up to date.
/// All tables, indexes and triggers come from migrations; returns how many ran.
pub fn init_db(conn: &Connection) -> AppResult<usize> {
    let applied =
        run_pending_migrations(conn).map_err(|e| AppError::Migration(e.to_string()))?;
    debug!(applied, "schema ready");
    Ok(applied)
}
