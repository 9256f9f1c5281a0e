//! SQLite connection wrapper (lightweight, one connection per process).

use crate::db::initialize::init_db;
use crate::errors::AppResult;
use rusqlite::Connection;
use std::path::Path;

pub struct DbPool {
    pub conn: Connection,
    /// Migrations applied while opening this connection.
    pub migrations_applied: usize,
}

impl DbPool {
    /// Open the database file and make sure the schema is current.
    /// A file that cannot be opened (permissions, corruption) surfaces as
    /// `StorageUnavailable` here rather than on first use.
    pub fn new(path: &str) -> AppResult<Self> {
        let conn = Connection::open(Path::new(path))?;
        conn.query_row("PRAGMA schema_version;", [], |row| row.get::<_, i64>(0))?;
        let migrations_applied = init_db(&conn)?;
        Ok(Self {
            conn,
            migrations_applied,
        })
    }

    /// Private in-memory store, used by tests and dry runs.
    pub fn in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        let migrations_applied = init_db(&conn)?;
        Ok(Self {
            conn,
            migrations_applied,
        })
    }

    /// Helper to execute a closure with a mutable connection reference.
    pub fn with_conn<F, T>(&mut self, func: F) -> rusqlite::Result<T>
    where
        F: FnOnce(&mut Connection) -> rusqlite::Result<T>,
    {
        func(&mut self.conn)
    }
}
