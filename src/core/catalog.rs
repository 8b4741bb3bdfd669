use crate::core::validate::validate_slot;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{
    find_agenda_by_id, find_agenda_by_slot, insert_agenda, load_agenda_page, load_days,
    set_agenda_active, update_agenda,
};
use crate::errors::{AppError, AppResult, is_unique_violation};
use crate::models::agenda_item::{AgendaItem, AgendaItemPatch, NewAgendaItem};
use crate::models::slot::SlotKey;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::collections::VecDeque;
use tracing::{debug, info};

const PAGE_SIZE: usize = 32;

/// Source of truth for which agenda slots exist and which accept check-ins.
///
/// Every read goes to storage; nothing is cached, so a `set_active` is seen by
/// the very next lookup on any handle.
pub struct AgendaCatalog<'a> {
    conn: &'a Connection,
}

impl<'a> AgendaCatalog<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { conn: &pool.conn }
    }

    /// Lookup by slot key; `AppError::NotFound` when no item occupies it.
    pub fn get_item(&self, slot: &SlotKey) -> AppResult<AgendaItem> {
        self.find_item(slot)?.ok_or_else(|| AppError::NotFound(slot.clone()))
    }

    pub fn find_item(&self, slot: &SlotKey) -> AppResult<Option<AgendaItem>> {
        validate_slot(slot)?;
        find_agenda_by_slot(self.conn, slot)
    }

    pub fn get_by_id(&self, id: i64) -> AppResult<AgendaItem> {
        find_agenda_by_id(self.conn, id)?.ok_or(AppError::ItemIdNotFound(id))
    }

    /// Active items of `day`, by `item_index` with parallel items after their
    /// shared index. The sequence is lazy and reads current state page by page.
    pub fn list_active(&self, day: &str) -> ActiveItems<'a> {
        ActiveItems::new(self.conn, day)
    }

    /// Every item of `day`, active or not, in the same order as `list_active`.
    pub fn list_day(&self, day: &str) -> AppResult<Vec<AgendaItem>> {
        let mut out = Vec::new();
        let mut cursor = None;
        loop {
            let page = load_agenda_page(self.conn, day, false, cursor, PAGE_SIZE)?;
            let last = page.last().map(|i| (i.item_index, i.is_parallel));
            let full = page.len() == PAGE_SIZE;
            out.extend(page);
            match last {
                Some(c) if full => cursor = Some(c),
                _ => break,
            }
        }
        Ok(out)
    }

    pub fn days(&self) -> AppResult<Vec<String>> {
        load_days(self.conn)
    }

    /// Create an item. A write onto an occupied slot is `DuplicateSlot`.
    pub fn create_item(&self, item: &NewAgendaItem) -> AppResult<AgendaItem> {
        validate_slot(&item.slot)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let id = insert_agenda(&tx, item).map_err(|e| slot_error(e, &item.slot))?;
        ttlog(
            &tx,
            "agenda_add",
            &item.slot.label(),
            &format!("Added '{}' (id {})", item.title, id),
        )?;
        tx.commit()?;

        info!(id, slot = %item.slot.label(), "agenda item created");
        self.get_by_id(id)
    }

    /// Apply a partial update. Moving an item onto an occupied slot is
    /// `DuplicateSlot`; the active flag is only changed through `set_active`.
    pub fn update_item(&self, id: i64, patch: &AgendaItemPatch) -> AppResult<AgendaItem> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let current = find_agenda_by_id(&tx, id)?.ok_or(AppError::ItemIdNotFound(id))?;
        if patch.is_empty() {
            return Ok(current);
        }

        let merged = patch.merge(&current);
        validate_slot(&merged.slot)?;

        update_agenda(&tx, id, &merged).map_err(|e| slot_error(e, &merged.slot))?;
        ttlog(
            &tx,
            "agenda_edit",
            &merged.slot.label(),
            &format!("Edited id {} (was {})", id, current.slot().label()),
        )?;
        tx.commit()?;

        info!(id, slot = %merged.slot.label(), "agenda item updated");
        self.get_by_id(id)
    }

    /// Open or close an item for check-in.
    pub fn set_active(&self, id: i64, active: bool) -> AppResult<AgendaItem> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        if set_agenda_active(&tx, id, active)? == 0 {
            return Err(AppError::ItemIdNotFound(id));
        }
        let (op, verb) = if active {
            ("agenda_activate", "Activated")
        } else {
            ("agenda_deactivate", "Deactivated")
        };
        ttlog(&tx, op, &id.to_string(), &format!("{} item {}", verb, id))?;
        tx.commit()?;

        info!(id, active, "agenda item activation changed");
        self.get_by_id(id)
    }
}

fn slot_error(e: rusqlite::Error, slot: &SlotKey) -> AppError {
    if is_unique_violation(&e) {
        AppError::DuplicateSlot(slot.clone())
    } else {
        e.into()
    }
}

/// Lazy, finite, restartable walk over a day's active items.
///
/// Pages are fetched with a keyset cursor on `(item_index, is_parallel)`, so
/// items activated or deactivated while iterating are seen as of the page
/// that reaches them.
pub struct ActiveItems<'a> {
    conn: &'a Connection,
    day: String,
    page_size: usize,
    cursor: Option<(i64, bool)>,
    buffer: VecDeque<AgendaItem>,
    exhausted: bool,
}

impl<'a> ActiveItems<'a> {
    fn new(conn: &'a Connection, day: &str) -> Self {
        Self {
            conn,
            day: day.to_string(),
            page_size: PAGE_SIZE,
            cursor: None,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Rewind to the start; the next item re-queries storage.
    pub fn restart(&mut self) {
        self.cursor = None;
        self.buffer.clear();
        self.exhausted = false;
    }

    fn fill(&mut self) -> AppResult<()> {
        let page = load_agenda_page(self.conn, &self.day, true, self.cursor, self.page_size)?;
        debug!(day = %self.day, rows = page.len(), "fetched agenda page");
        if page.len() < self.page_size {
            self.exhausted = true;
        }
        self.buffer.extend(page);
        Ok(())
    }
}

impl Iterator for ActiveItems<'_> {
    type Item = AppResult<AgendaItem>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() && !self.exhausted {
            if let Err(e) = self.fill() {
                self.exhausted = true;
                return Some(Err(e));
            }
        }

        let item = self.buffer.pop_front()?;
        self.cursor = Some((item.item_index, item.is_parallel));
        Some(Ok(item))
    }
}
