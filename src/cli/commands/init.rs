use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped with --test)
///  - the SQLite database and all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;

    println!("⚙️  Initializing agenda-checkin…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database    : {}", &cfg.database);

    let pool = DbPool::open(&cfg.database, cfg.busy_timeout())?;
    init_db(&pool.conn)?;

    ttlog(
        &pool.conn,
        "init",
        "",
        &format!("Database initialized at {}", &cfg.database),
    )?;

    success(format!("Database initialized at {}", &cfg.database));
    Ok(())
}
