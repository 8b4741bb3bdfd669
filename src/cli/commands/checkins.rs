use crate::cli::commands::checkin::describe;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ledger::CheckInLedger;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::slot::SlotKey;
use crate::ui::messages::{header, info};
use serde_json::json;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Checkins {
        user,
        day,
        index,
        parallel,
        json,
    } = cmd
    else {
        return Ok(());
    };

    let pool = DbPool::open(&cfg.database, cfg.busy_timeout())?;
    let ledger = CheckInLedger::new(&pool);

    match (user, day, index) {
        (Some(user), _, _) => {
            let records = ledger.records_for_user(user)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                info(format!("No check-ins for {}.", user));
            } else {
                header(format!("Check-ins for {}", user));
                for rec in &records {
                    println!("- {} | {}", rec.slot().label(), describe(rec));
                }
            }
        }
        (None, Some(day), Some(index)) => {
            let slot = SlotKey::new(day.clone(), *index, *parallel);
            let n = ledger.count_for_slot(&slot)?;
            if *json {
                println!("{}", json!({ "slot": slot, "count": n }));
            } else {
                println!("{}: {} check-ins", slot.label(), n);
            }
        }
        _ => {
            return Err(AppError::InvalidInput(
                "use --user U or --day D --index N [--parallel]".into(),
            ));
        }
    }

    Ok(())
}
