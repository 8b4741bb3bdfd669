//! Input checks shared by the catalog and the ledger. They run before any
//! storage access.

use crate::errors::{AppError, AppResult};
use crate::models::slot::SlotKey;

pub fn validate_user_id(user_id: &str) -> AppResult<()> {
    if user_id.trim().is_empty() {
        return Err(AppError::InvalidInput("user id must not be empty".into()));
    }
    Ok(())
}

pub fn validate_slot(slot: &SlotKey) -> AppResult<()> {
    if slot.day.trim().is_empty() {
        return Err(AppError::InvalidInput("day must not be empty".into()));
    }
    if slot.item_index < 0 {
        return Err(AppError::InvalidInput(format!(
            "item index must be >= 0 (got {})",
            slot.item_index
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_user() {
        assert!(matches!(
            validate_user_id("   "),
            Err(AppError::InvalidInput(_))
        ));
        assert!(validate_user_id("attendee-42").is_ok());
    }

    #[test]
    fn rejects_blank_day_and_negative_index() {
        assert!(validate_slot(&SlotKey::new("", 1, false)).is_err());
        assert!(validate_slot(&SlotKey::new("Day 1", -1, false)).is_err());
        assert!(validate_slot(&SlotKey::new("Day 1", 0, true)).is_ok());
    }
}
