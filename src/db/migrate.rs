use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result, Transaction, TransactionBehavior};
use tracing::info;

/// Ensure that the `log` table exists. It doubles as the migration registry.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Check if a migration id is already recorded in `log`.
fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Create the `agenda` catalog table and its slot uniqueness index.
fn create_agenda_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS agenda (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            day               TEXT NOT NULL,
            item_index        INTEGER NOT NULL,
            is_parallel       INTEGER NOT NULL DEFAULT 0 CHECK(is_parallel IN (0,1)),
            time              TEXT NOT NULL DEFAULT '',
            title             TEXT NOT NULL DEFAULT '',
            requires_check_in INTEGER NOT NULL DEFAULT 1 CHECK(requires_check_in IN (0,1)),
            is_active         INTEGER NOT NULL DEFAULT 1 CHECK(is_active IN (0,1)),
            created_at        TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            updated_at        TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_agenda_slot
            ON agenda(day, item_index, is_parallel);

        CREATE TRIGGER IF NOT EXISTS trg_agenda_updated_at
        AFTER UPDATE ON agenda
        FOR EACH ROW
        WHEN NEW.updated_at = OLD.updated_at
        BEGIN
            UPDATE agenda
               SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = NEW.id;
        END;
        "#,
    )?;
    Ok(())
}

/// Create the `agenda_checkins` ledger table.
///
/// The unique index on `(user_id, day, item_index, is_parallel)` is the
/// serialization point for concurrent check-ins.
fn create_checkins_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS agenda_checkins (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id       TEXT NOT NULL,
            day           TEXT NOT NULL,
            item_index    INTEGER NOT NULL,
            is_parallel   INTEGER NOT NULL DEFAULT 0 CHECK(is_parallel IN (0,1)),
            checked_in_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            updated_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_checkins_user_slot
            ON agenda_checkins(user_id, day, item_index, is_parallel);
        CREATE INDEX IF NOT EXISTS idx_checkins_slot
            ON agenda_checkins(day, item_index, is_parallel);
        CREATE INDEX IF NOT EXISTS idx_checkins_user
            ON agenda_checkins(user_id);

        CREATE TRIGGER IF NOT EXISTS trg_checkins_immutable
        BEFORE UPDATE ON agenda_checkins
        BEGIN
            SELECT RAISE(ABORT, 'check-in records are immutable');
        END;
        "#,
    )?;
    Ok(())
}

type Migration = (&'static str, &'static str, fn(&Connection) -> Result<()>);

const MIGRATIONS: &[Migration] = &[
    (
        "20240301_0001_create_agenda",
        "Created agenda table with slot uniqueness index",
        create_agenda_table,
    ),
    (
        "20240301_0002_create_agenda_checkins",
        "Created agenda_checkins table with per-user slot uniqueness",
        create_checkins_table,
    ),
];

/// Public entry point: run all pending migrations.
///
/// Called by db::init_db() and `db --migrate`. Returns how many ran.
/// Each migration holds the write lock while it checks its marker, so
/// concurrent runs apply and record it once.
pub fn run_pending_migrations(conn: &Connection) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for (version, message, apply) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }

        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
        // another process may have applied it while we waited for the lock
        if is_applied(&tx, version)? {
            continue;
        }
        apply(&tx)?;
        mark_applied(&tx, version, message)?;
        tx.commit()?;

        info!(version, "migration applied");
        success(format!("Migration applied: {}", version));
        applied += 1;
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::DbPool;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(run_pending_migrations(&conn).unwrap(), MIGRATIONS.len());
        assert_eq!(run_pending_migrations(&conn).unwrap(), 0);

        let n: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(n as usize, MIGRATIONS.len());
    }

    #[test]
    fn checkin_rows_reject_updates() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        conn.execute(
            "INSERT INTO agenda_checkins (user_id, day, item_index, is_parallel)
             VALUES ('A', 'Day 1', 1, 0)",
            [],
        )
        .unwrap();

        let res = conn.execute("UPDATE agenda_checkins SET user_id = 'B'", []);
        assert!(res.is_err());
    }

    #[test]
    fn concurrent_runs_record_each_migration_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("migrate.sqlite").to_string_lossy().to_string();
        // create the file and the log table up front
        ensure_log_table(&DbPool::new(&path).unwrap().conn).unwrap();

        const RUNNERS: usize = 4;
        let barrier = Arc::new(Barrier::new(RUNNERS));
        let handles: Vec<_> = (0..RUNNERS)
            .map(|_| {
                let path = path.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let pool = DbPool::new(&path).unwrap();
                    barrier.wait();
                    run_pending_migrations(&pool.conn).unwrap()
                })
            })
            .collect();

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, MIGRATIONS.len());

        let conn = DbPool::new(&path).unwrap().conn;
        let n: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(n as usize, MIGRATIONS.len());
    }
}
