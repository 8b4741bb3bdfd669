use crate::errors::{AppError, AppResult};
use crate::models::agenda_item::{AgendaItem, NewAgendaItem};
use crate::models::checkin::CheckInRecord;
use crate::models::slot::SlotKey;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const AGENDA_COLUMNS: &str = "id, day, item_index, is_parallel, time, title,
     requires_check_in, is_active, created_at, updated_at";

const CHECKIN_COLUMNS: &str = "id, user_id, day, item_index, is_parallel, checked_in_at";

fn parse_ts(raw: String) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(AppError::Other(format!("Invalid timestamp: {}", raw))),
            )
        })
}

pub fn map_agenda_row(row: &Row) -> Result<AgendaItem> {
    Ok(AgendaItem {
        id: row.get("id")?,
        day: row.get("day")?,
        item_index: row.get("item_index")?,
        is_parallel: row.get("is_parallel")?,
        time: row.get("time")?,
        title: row.get("title")?,
        requires_check_in: row.get("requires_check_in")?,
        is_active: row.get("is_active")?,
        created_at: parse_ts(row.get("created_at")?)?,
        updated_at: parse_ts(row.get("updated_at")?)?,
    })
}

pub fn map_checkin_row(row: &Row) -> Result<CheckInRecord> {
    Ok(CheckInRecord {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        day: row.get("day")?,
        item_index: row.get("item_index")?,
        is_parallel: row.get("is_parallel")?,
        checked_in_at: parse_ts(row.get("checked_in_at")?)?,
    })
}

// ---------------------------------------------------------------------------
// agenda
// ---------------------------------------------------------------------------

pub fn find_agenda_by_slot(conn: &Connection, slot: &SlotKey) -> AppResult<Option<AgendaItem>> {
    let sql = format!(
        "SELECT {AGENDA_COLUMNS} FROM agenda
         WHERE day = ?1 AND item_index = ?2 AND is_parallel = ?3"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let item = stmt
        .query_row(
            params![slot.day, slot.item_index, slot.is_parallel],
            map_agenda_row,
        )
        .optional()?;
    Ok(item)
}

pub fn find_agenda_by_id(conn: &Connection, id: i64) -> AppResult<Option<AgendaItem>> {
    let sql = format!("SELECT {AGENDA_COLUMNS} FROM agenda WHERE id = ?1");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([id], map_agenda_row).optional()?)
}

/// Raw insert; the caller inspects the error for slot uniqueness violations.
pub fn insert_agenda(conn: &Connection, item: &NewAgendaItem) -> Result<i64> {
    conn.execute(
        "INSERT INTO agenda (day, item_index, is_parallel, time, title, requires_check_in, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            item.slot.day,
            item.slot.item_index,
            item.slot.is_parallel,
            item.time,
            item.title,
            item.requires_check_in,
            item.is_active,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Overwrite the editable fields of an item. Returns the number of rows touched.
pub fn update_agenda(conn: &Connection, id: i64, item: &NewAgendaItem) -> Result<usize> {
    conn.execute(
        "UPDATE agenda
         SET day = ?1, item_index = ?2, is_parallel = ?3,
             time = ?4, title = ?5, requires_check_in = ?6
         WHERE id = ?7",
        params![
            item.slot.day,
            item.slot.item_index,
            item.slot.is_parallel,
            item.time,
            item.title,
            item.requires_check_in,
            id,
        ],
    )
}

pub fn set_agenda_active(conn: &Connection, id: i64, active: bool) -> Result<usize> {
    conn.execute(
        "UPDATE agenda SET is_active = ?1 WHERE id = ?2",
        params![active, id],
    )
}

/// One page of a day's agenda in layout order, strictly after `after`.
pub fn load_agenda_page(
    conn: &Connection,
    day: &str,
    active_only: bool,
    after: Option<(i64, bool)>,
    limit: usize,
) -> AppResult<Vec<AgendaItem>> {
    let sql = format!(
        "SELECT {AGENDA_COLUMNS} FROM agenda
         WHERE day = ?1
           AND (?2 = 0 OR is_active = 1)
           AND (?3 = 0 OR item_index > ?4 OR (item_index = ?4 AND is_parallel > ?5))
         ORDER BY item_index ASC, is_parallel ASC
         LIMIT ?6"
    );
    let (has_cursor, cur_index, cur_parallel) = match after {
        Some((i, p)) => (true, i, p),
        None => (false, 0, false),
    };

    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(
        params![
            day,
            active_only,
            has_cursor,
            cur_index,
            cur_parallel,
            limit as i64
        ],
        map_agenda_row,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Distinct day labels, in the order they first appeared in the catalog.
pub fn load_days(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT day FROM agenda
         GROUP BY day
         ORDER BY MIN(id) ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// agenda_checkins
// ---------------------------------------------------------------------------

/// Insert a check-in row, copying the slot key from the catalog row, only if
/// that row is currently active and requires check-in. Validation and write
/// happen in one statement.
///
/// Returns `Ok(None)` when no open catalog row matched. A duplicate surfaces as
/// a UNIQUE constraint error from `idx_checkins_user_slot`.
pub fn insert_checkin_if_open(
    conn: &Connection,
    user_id: &str,
    slot: &SlotKey,
) -> Result<Option<i64>> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO agenda_checkins (user_id, day, item_index, is_parallel)
         SELECT ?1, day, item_index, is_parallel
           FROM agenda
          WHERE day = ?2 AND item_index = ?3 AND is_parallel = ?4
            AND is_active = 1 AND requires_check_in = 1",
    )?;
    let changed = stmt.execute(params![user_id, slot.day, slot.item_index, slot.is_parallel])?;

    if changed == 0 {
        Ok(None)
    } else {
        Ok(Some(conn.last_insert_rowid()))
    }
}

pub fn find_checkin(
    conn: &Connection,
    user_id: &str,
    slot: &SlotKey,
) -> AppResult<Option<CheckInRecord>> {
    let sql = format!(
        "SELECT {CHECKIN_COLUMNS} FROM agenda_checkins
         WHERE user_id = ?1 AND day = ?2 AND item_index = ?3 AND is_parallel = ?4"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rec = stmt
        .query_row(
            params![user_id, slot.day, slot.item_index, slot.is_parallel],
            map_checkin_row,
        )
        .optional()?;
    Ok(rec)
}

pub fn find_checkin_by_id(conn: &Connection, id: i64) -> AppResult<Option<CheckInRecord>> {
    let sql = format!("SELECT {CHECKIN_COLUMNS} FROM agenda_checkins WHERE id = ?1");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([id], map_checkin_row).optional()?)
}

pub fn load_checkins_by_user(conn: &Connection, user_id: &str) -> AppResult<Vec<CheckInRecord>> {
    let sql = format!(
        "SELECT {CHECKIN_COLUMNS} FROM agenda_checkins
         WHERE user_id = ?1
         ORDER BY checked_in_at ASC, id ASC"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map([user_id], map_checkin_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_checkins_for_slot(conn: &Connection, slot: &SlotKey) -> AppResult<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM agenda_checkins
         WHERE day = ?1 AND item_index = ?2 AND is_parallel = ?3",
        params![slot.day, slot.item_index, slot.is_parallel],
        |row| row.get(0),
    )?;
    Ok(n)
}
