use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ledger::CheckInLedger;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::checkin::{CheckInOutcome, CheckInRecord};
use crate::models::slot::SlotKey;
use crate::ui::messages::{info, success};

pub fn describe(rec: &CheckInRecord) -> String {
    format!(
        "record #{} at {}",
        rec.id,
        rec.checked_in_at.format("%Y-%m-%d %H:%M:%S%.3f UTC")
    )
}

/// Handle `checkin USER --day D --index N [--parallel]`.
///
/// `Accepted` and `AlreadyCheckedIn` both exit 0; an unknown or closed item
/// is reported as an error so scripts can branch on the exit code.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Checkin { user, slot, json } = cmd else {
        return Ok(());
    };

    let key = SlotKey::new(slot.day.clone(), slot.index, slot.parallel);

    let pool = DbPool::open(&cfg.database, cfg.busy_timeout())?;
    let outcome = CheckInLedger::new(&pool).check_in_slot(user, &key)?;

    if *json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }

    match outcome {
        CheckInOutcome::Accepted(rec) => {
            if !*json {
                success(format!(
                    "Accepted: {} checked in to {} ({})",
                    user,
                    key,
                    describe(&rec)
                ));
            }
            Ok(())
        }
        CheckInOutcome::AlreadyCheckedIn(rec) => {
            if !*json {
                info(format!(
                    "AlreadyCheckedIn: {} was already checked in to {} ({})",
                    user,
                    key,
                    describe(&rec)
                ));
            }
            Ok(())
        }
        CheckInOutcome::ItemNotFound => Err(AppError::NotFound(key)),
        CheckInOutcome::ItemNotCheckable => Err(AppError::ItemNotCheckable(key)),
    }
}
