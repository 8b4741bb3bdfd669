//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use crate::models::slot::SlotKey;
use rusqlite::ErrorCode;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(rusqlite::Error),

    /// Busy/locked after the configured timeout. Safe to retry.
    #[error("Database busy, retry later: {0}")]
    StorageBusy(String),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Input errors
    // ---------------------------
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ---------------------------
    // Agenda / check-in errors
    // ---------------------------
    #[error("No agenda item for {0}")]
    NotFound(SlotKey),

    #[error("No agenda item with id {0}")]
    ItemIdNotFound(i64),

    #[error("An agenda item already occupies {0}")]
    DuplicateSlot(SlotKey),

    #[error("Agenda item {0} is not open for check-in")]
    ItemNotCheckable(SlotKey),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Output
    // ---------------------------
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        match e.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => {
                AppError::StorageBusy(e.to_string())
            }
            _ => AppError::Db(e),
        }
    }
}

impl AppError {
    /// True for failures where the caller may re-invoke the same operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::StorageBusy(_))
    }
}

/// True when the error is a UNIQUE (or PRIMARY KEY) constraint violation.
pub fn is_unique_violation(e: &rusqlite::Error) -> bool {
    match e {
        rusqlite::Error::SqliteFailure(err, _) => {
            err.code == ErrorCode::ConstraintViolation
                && (err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
        }
        _ => false,
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(code: i32) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(code), None)
    }

    #[test]
    fn busy_and_locked_are_retryable() {
        let busy: AppError = failure(rusqlite::ffi::SQLITE_BUSY).into();
        let locked: AppError = failure(rusqlite::ffi::SQLITE_LOCKED).into();
        assert!(busy.is_retryable());
        assert!(locked.is_retryable());
    }

    #[test]
    fn other_db_errors_are_not_retryable() {
        let err: AppError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, AppError::Db(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn unique_violation_is_detected() {
        let unique = failure(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE);
        let check = failure(rusqlite::ffi::SQLITE_CONSTRAINT_CHECK);
        assert!(is_unique_violation(&unique));
        assert!(!is_unique_violation(&check));
    }
}
