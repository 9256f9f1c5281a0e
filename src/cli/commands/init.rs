use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database and all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;

    println!("⚙️  Initializing DailyTap…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Database   : {}", &cfg.database);

    // DbPool::new runs the migrations
    let pool = DbPool::new(&cfg.database)?;

    if pool.migrations_applied > 0 {
        println!("✅ Applied {} database migration(s).", pool.migrations_applied);
    }
    println!("✅ Database initialized at {}", &cfg.database);

    ttlog_quiet(
        &pool.conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {}", &cfg.database),
    );

    println!("🎉 DailyTap initialization completed! Next: `dailytap setup`");
    Ok(())
}
