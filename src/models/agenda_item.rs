use super::slot::SlotKey;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgendaItem {
    pub id: i64,
    pub day: String,             // ⇔ agenda.day (TEXT, free label)
    pub item_index: i64,         // ⇔ agenda.item_index
    pub is_parallel: bool,       // ⇔ agenda.is_parallel (0/1)
    pub time: String,            // ⇔ agenda.time
    pub title: String,           // ⇔ agenda.title
    pub requires_check_in: bool, // ⇔ agenda.requires_check_in (0/1)
    pub is_active: bool,         // ⇔ agenda.is_active (0/1)
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AgendaItem {
    pub fn slot(&self) -> SlotKey {
        SlotKey::new(self.day.clone(), self.item_index, self.is_parallel)
    }

    /// Both flags must be set for the ledger to admit a check-in.
    pub fn is_checkable(&self) -> bool {
        self.requires_check_in && self.is_active
    }
}

/// Fields supplied by the organizer when creating an item.
#[derive(Debug, Clone)]
pub struct NewAgendaItem {
    pub slot: SlotKey,
    pub time: String,
    pub title: String,
    pub requires_check_in: bool,
    pub is_active: bool,
}

impl NewAgendaItem {
    /// Active item that requires check-in.
    pub fn checkable(slot: SlotKey, time: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slot,
            time: time.into(),
            title: title.into(),
            requires_check_in: true,
            is_active: true,
        }
    }
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct AgendaItemPatch {
    pub day: Option<String>,
    pub item_index: Option<i64>,
    pub is_parallel: Option<bool>,
    pub time: Option<String>,
    pub title: Option<String>,
    pub requires_check_in: Option<bool>,
}

impl AgendaItemPatch {
    pub fn is_empty(&self) -> bool {
        self.day.is_none()
            && self.item_index.is_none()
            && self.is_parallel.is_none()
            && self.time.is_none()
            && self.title.is_none()
            && self.requires_check_in.is_none()
    }

    /// Apply the patch on top of an existing item, returning the resulting fields.
    pub fn merge(&self, item: &AgendaItem) -> NewAgendaItem {
        NewAgendaItem {
            slot: SlotKey::new(
                self.day.clone().unwrap_or_else(|| item.day.clone()),
                self.item_index.unwrap_or(item.item_index),
                self.is_parallel.unwrap_or(item.is_parallel),
            ),
            time: self.time.clone().unwrap_or_else(|| item.time.clone()),
            title: self.title.clone().unwrap_or_else(|| item.title.clone()),
            requires_check_in: self.requires_check_in.unwrap_or(item.requires_check_in),
            is_active: item.is_active,
        }
    }
}
