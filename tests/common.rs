#![allow(dead_code)]
use agenda_checkin::core::catalog::AgendaCatalog;
use agenda_checkin::db::initialize::init_db;
use agenda_checkin::db::pool::DbPool;
use agenda_checkin::models::agenda_item::{AgendaItem, NewAgendaItem};
use agenda_checkin::models::slot::SlotKey;
use assert_cmd::{Command, cargo_bin_cmd};
use tempfile::TempDir;

/// A migrated database file living in its own temp dir.
pub struct TestDb {
    dir: TempDir,
    pub path: String,
}

impl TestDb {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir
            .path()
            .join("agenda-checkin.sqlite")
            .to_string_lossy()
            .to_string();

        let pool = DbPool::new(&path).expect("open db");
        init_db(&pool.conn).expect("init db");

        Self { dir, path }
    }

    /// A fresh handle, as a separate device would open it.
    pub fn open(&self) -> DbPool {
        DbPool::new(&self.path).expect("open db")
    }

    pub fn home(&self) -> &std::path::Path {
        self.dir.path()
    }
}

/// Binary under test with HOME pointed at the temp dir, so no real config is read.
pub fn rti(db: &TestDb) -> Command {
    let mut cmd = cargo_bin_cmd!("agenda-checkin");
    cmd.env("HOME", db.home())
        .env("APPDATA", db.home())
        .env_remove("RUST_LOG")
        .args(["--db", &db.path]);
    cmd
}

pub fn add_item(pool: &DbPool, day: &str, index: i64, parallel: bool, title: &str) -> AgendaItem {
    AgendaCatalog::new(pool)
        .create_item(&NewAgendaItem::checkable(
            SlotKey::new(day, index, parallel),
            "09:00",
            title,
        ))
        .expect("create agenda item")
}
