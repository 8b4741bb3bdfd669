use super::slot::SlotKey;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One attendee check-in. The slot key is copied from the agenda item at
/// check-in time, not referenced, so later catalog edits leave it intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInRecord {
    pub id: i64,
    pub user_id: String,
    pub day: String,
    pub item_index: i64,
    pub is_parallel: bool,
    pub checked_in_at: DateTime<Utc>,
}

impl CheckInRecord {
    pub fn slot(&self) -> SlotKey {
        SlotKey::new(self.day.clone(), self.item_index, self.is_parallel)
    }
}

/// Result of a check-in attempt. `AlreadyCheckedIn` is a normal outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "record")]
pub enum CheckInOutcome {
    Accepted(CheckInRecord),
    AlreadyCheckedIn(CheckInRecord),
    ItemNotFound,
    ItemNotCheckable,
}

impl CheckInOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckInOutcome::Accepted(_) => "accepted",
            CheckInOutcome::AlreadyCheckedIn(_) => "already_checked_in",
            CheckInOutcome::ItemNotFound => "item_not_found",
            CheckInOutcome::ItemNotCheckable => "item_not_checkable",
        }
    }

    pub fn record(&self) -> Option<&CheckInRecord> {
        match self {
            CheckInOutcome::Accepted(r) | CheckInOutcome::AlreadyCheckedIn(r) => Some(r),
            _ => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, CheckInOutcome::Accepted(_))
    }
}
