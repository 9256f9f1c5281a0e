use rusqlite::{Connection, OptionalExtension, Result};

/// Ordered schema migrations: (version, description, sql).
/// A migration is applied once; its version is recorded in the `log` table.
const MIGRATIONS: &[(&str, &str, &str)] = &[
    (
        "20250301_0001_create_events",
        "Created events table",
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id    TEXT PRIMARY KEY,
            name  TEXT NOT NULL,
            icon  TEXT NOT NULL DEFAULT '',
            ord   INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_events_ord ON events(ord);
        "#,
    ),
    (
        "20250301_0002_create_logs",
        "Created logs table",
        r#"
        CREATE TABLE IF NOT EXISTS logs (
            id          TEXT PRIMARY KEY,
            date        TEXT NOT NULL,
            event_name  TEXT NOT NULL,
            time        TEXT NOT NULL,
            status      TEXT NOT NULL DEFAULT 'normal' CHECK(status IN ('normal','skipped')),
            synced      INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_logs_date ON logs(date);
        CREATE INDEX IF NOT EXISTS idx_logs_synced ON logs(synced);
        "#,
    ),
    (
        "20250301_0003_create_metadata",
        "Created metadata table",
        r#"
        CREATE TABLE IF NOT EXISTS metadata (
            key    TEXT PRIMARY KEY,
            value  TEXT
        );
        "#,
    ),
];

/// Ensure that the `log` table exists.
/// It doubles as the migration ledger, so it is created before anything else.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, version: &str, description: &str, sql: &str) -> Result<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, description],
    )?;

    tx.commit()
}

/// Public entry point: run all pending migrations.
/// Returns how many were applied; printing it is left to the CLI.
///
/// Called by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for (version, description, sql) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }
        apply(conn, version, description, sql)?;
        applied += 1;
    }

    Ok(applied)
}
