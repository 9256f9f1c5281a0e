//! Key/value metadata (destination config, cursor, rollover date, structure hash).

use crate::db::queries::get_all_events;
use crate::errors::AppResult;
use crate::models::meta;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeMap;

/// Missing keys (and keys stored as NULL) yield `None`, not an error.
pub fn get_meta(conn: &Connection, key: &str) -> AppResult<Option<String>> {
    let value: Option<Option<String>> = conn
        .query_row("SELECT value FROM metadata WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(value.flatten())
}

pub fn set_meta(conn: &Connection, key: &str, value: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO metadata (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn get_all_meta(conn: &Connection) -> AppResult<BTreeMap<String, String>> {
    let mut stmt = conn.prepare("SELECT key, value FROM metadata ORDER BY key ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        ))
    })?;

    let mut out = BTreeMap::new();
    for r in rows {
        let (k, v) = r?;
        out.insert(k, v);
    }
    Ok(out)
}

/// A non-blank metadata value, trimmed.
pub fn get_non_blank(conn: &Connection, key: &str) -> AppResult<Option<String>> {
    Ok(get_meta(conn, key)?
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}

/// Destination (sheet link, script url) when both values are present.
pub fn destination(conn: &Connection) -> AppResult<Option<(String, String)>> {
    let sheet = get_non_blank(conn, meta::SHEET_LINK)?;
    let url = get_non_blank(conn, meta::SCRIPT_URL)?;
    Ok(sheet.zip(url))
}

/// Setup is complete once a destination is stored and the roster is not empty.
pub fn is_setup_complete(conn: &Connection) -> AppResult<bool> {
    Ok(destination(conn)?.is_some() && !get_all_events(conn)?.is_empty())
}
