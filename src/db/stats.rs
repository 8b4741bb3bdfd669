use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

fn count(pool: &DbPool, sql: &str) -> rusqlite::Result<i64> {
    pool.conn.query_row(sql, [], |row| row.get(0))
}

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) CATALOG
    //
    let items = count(pool, "SELECT COUNT(*) FROM agenda")?;
    let active = count(pool, "SELECT COUNT(*) FROM agenda WHERE is_active = 1")?;
    let days = count(pool, "SELECT COUNT(DISTINCT day) FROM agenda")?;
    println!(
        "{}• Agenda items:{} {}{}{} ({} active, {} days)",
        CYAN, RESET, GREEN, items, RESET, active, days
    );

    //
    // 3) LEDGER
    //
    let checkins = count(pool, "SELECT COUNT(*) FROM agenda_checkins")?;
    let attendees = count(pool, "SELECT COUNT(DISTINCT user_id) FROM agenda_checkins")?;
    println!(
        "{}• Check-ins:{} {}{}{} from {} attendees",
        CYAN, RESET, GREEN, checkins, RESET, attendees
    );

    //
    // 4) LAST CHECK-IN
    //
    let last: Option<String> = pool
        .conn
        .query_row(
            "SELECT checked_in_at FROM agenda_checkins ORDER BY checked_in_at DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    println!(
        "{}• Last check-in:{} {}",
        CYAN,
        RESET,
        last.unwrap_or_else(|| format!("{GREY}--{RESET}"))
    );

    println!();
    Ok(())
}
