use crate::core::catalog::AgendaCatalog;
use crate::core::validate::{validate_slot, validate_user_id};
use crate::db::pool::DbPool;
use crate::db::queries::{
    count_checkins_for_slot, find_checkin, find_checkin_by_id, insert_checkin_if_open,
    load_checkins_by_user,
};
use crate::errors::{AppError, AppResult, is_unique_violation};
use crate::models::checkin::{CheckInOutcome, CheckInRecord};
use crate::models::slot::SlotKey;
use rusqlite::Connection;
use tracing::{debug, info, warn};

/// Admits or rejects check-in attempts and persists accepted ones once.
///
/// The UNIQUE index on `(user_id, day, item_index, is_parallel)` decides
/// concurrent duplicates: the first insert wins, later ones fail the
/// constraint and are answered with the stored record. There is no
/// application-level lock and no internal retry.
pub struct CheckInLedger<'a> {
    conn: &'a Connection,
    catalog: AgendaCatalog<'a>,
}

impl<'a> CheckInLedger<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self {
            conn: &pool.conn,
            catalog: AgendaCatalog::new(pool),
        }
    }

    pub fn check_in(
        &self,
        user_id: &str,
        day: &str,
        item_index: i64,
        is_parallel: bool,
    ) -> AppResult<CheckInOutcome> {
        self.check_in_slot(user_id, &SlotKey::new(day, item_index, is_parallel))
    }

    pub fn check_in_slot(&self, user_id: &str, slot: &SlotKey) -> AppResult<CheckInOutcome> {
        validate_user_id(user_id)?;
        validate_slot(slot)?;

        //
        // 1. Resolve the item
        //
        let Some(item) = self.catalog.find_item(slot)? else {
            debug!(user_id, slot = %slot.label(), "check-in rejected: no such item");
            return Ok(CheckInOutcome::ItemNotFound);
        };

        //
        // 2. Must be active and require check-in
        //
        if !item.is_checkable() {
            debug!(
                user_id,
                slot = %slot.label(),
                is_active = item.is_active,
                requires_check_in = item.requires_check_in,
                "check-in rejected: item not checkable"
            );
            return Ok(CheckInOutcome::ItemNotCheckable);
        }

        //
        // 3. Insert; the statement re-checks the item flags atomically
        //
        let outcome = match insert_checkin_if_open(self.conn, user_id, slot) {
            Ok(Some(id)) => {
                let rec = find_checkin_by_id(self.conn, id)?.ok_or_else(|| {
                    AppError::Other(format!("check-in {} missing right after insert", id))
                })?;
                CheckInOutcome::Accepted(rec)
            }
            // The item changed between step 1 and the insert.
            Ok(None) => match self.catalog.find_item(slot)? {
                None => CheckInOutcome::ItemNotFound,
                Some(_) => CheckInOutcome::ItemNotCheckable,
            },
            //
            // 4. Duplicate → hand back the stored record
            //
            Err(e) if is_unique_violation(&e) => {
                let rec = find_checkin(self.conn, user_id, slot)?.ok_or_else(|| {
                    AppError::Other(format!(
                        "check-in for '{}' at {} rejected as duplicate but not found",
                        user_id, slot
                    ))
                })?;
                CheckInOutcome::AlreadyCheckedIn(rec)
            }
            Err(e) => {
                let err = AppError::from(e);
                warn!(
                    user_id,
                    slot = %slot.label(),
                    retryable = err.is_retryable(),
                    error = %err,
                    "check-in write failed"
                );
                return Err(err);
            }
        };

        info!(
            user_id,
            slot = %slot.label(),
            outcome = outcome.as_str(),
            record_id = ?outcome.record().map(|r| r.id),
            "check-in processed"
        );
        Ok(outcome)
    }

    pub fn find(&self, user_id: &str, slot: &SlotKey) -> AppResult<Option<CheckInRecord>> {
        validate_user_id(user_id)?;
        validate_slot(slot)?;
        find_checkin(self.conn, user_id, slot)
    }

    /// All of one attendee's check-ins, oldest first.
    pub fn records_for_user(&self, user_id: &str) -> AppResult<Vec<CheckInRecord>> {
        validate_user_id(user_id)?;
        load_checkins_by_user(self.conn, user_id)
    }

    pub fn count_for_slot(&self, slot: &SlotKey) -> AppResult<i64> {
        validate_slot(slot)?;
        count_checkins_for_slot(self.conn, slot)
    }
}
