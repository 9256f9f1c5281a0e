use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::event::Event;
use crate::models::log_entry::{LogEntry, LogStatus, LogTime};
use chrono::NaiveDate;
use rusqlite::{Connection, Result, Row, params};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

fn map_event(row: &Row) -> Result<Event> {
    Ok(Event {
        id: row.get("id")?,
        name: row.get("name")?,
        icon: row.get("icon")?,
        order: row.get::<_, i64>("ord")? as usize,
    })
}

/// All events, ascending by `order`. Empty when nothing is configured.
pub fn get_all_events(conn: &Connection) -> AppResult<Vec<Event>> {
    let mut stmt = conn.prepare("SELECT id, name, icon, ord FROM events ORDER BY ord ASC")?;
    let rows = stmt.query_map([], map_event)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Replace the whole roster in one transaction.
/// `order` is reassigned from list position, both in the store and in `events`.
pub fn save_all_events(pool: &mut DbPool, events: &mut [Event]) -> AppResult<()> {
    for (idx, ev) in events.iter_mut().enumerate() {
        ev.order = idx;
    }

    pool.with_conn(|conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM events", [])?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO events (id, name, icon, ord) VALUES (?1, ?2, ?3, ?4)")?;
            for ev in events.iter() {
                stmt.execute(params![ev.id, ev.name, ev.icon, ev.order as i64])?;
            }
        }
        tx.commit()
    })?;

    Ok(())
}

/// Single-event upsert keyed by id. Does not touch the order of other events.
pub fn save_event(conn: &Connection, ev: &Event) -> AppResult<()> {
    conn.execute(
        "INSERT INTO events (id, name, icon, ord) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET name = excluded.name, icon = excluded.icon, ord = excluded.ord",
        params![ev.id, ev.name, ev.icon, ev.order as i64],
    )?;
    Ok(())
}

pub fn delete_event(conn: &Connection, id: &str) -> AppResult<()> {
    conn.execute("DELETE FROM events WHERE id = ?1", [id])?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Logs
// ---------------------------------------------------------------------------

fn conversion_error(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(err))
}

pub fn map_log(row: &Row) -> Result<LogEntry> {
    let date_str: String = row.get("date")?;
    let time_str: String = row.get("time")?;
    let status_str: String = row.get("status")?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_error(1, AppError::InvalidDate(date_str.clone())))?;

    let time = LogTime::parse(&time_str)
        .ok_or_else(|| conversion_error(3, AppError::InvalidTime(time_str.clone())))?;

    let status = LogStatus::from_db_str(&status_str).ok_or_else(|| {
        conversion_error(
            4,
            AppError::InvalidInput(format!("Invalid log status: {}", status_str)),
        )
    })?;

    Ok(LogEntry {
        id: row.get("id")?,
        date,
        event_name: row.get("event_name")?,
        time,
        status,
        synced: row.get::<_, i32>("synced")? == 1,
    })
}

fn collect_logs(conn: &Connection, sql: &str, param: Option<&str>) -> AppResult<Vec<LogEntry>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = match param {
        Some(p) => stmt.query_map([p], map_log)?,
        None => stmt.query_map([], map_log)?,
    };

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// All logs recorded for `date`, in no particular order.
pub fn get_logs_for_date(conn: &Connection, date: &NaiveDate) -> AppResult<Vec<LogEntry>> {
    let date_str = date.format("%Y-%m-%d").to_string();
    collect_logs(
        conn,
        "SELECT id, date, event_name, time, status, synced FROM logs WHERE date = ?1",
        Some(date_str.as_str()),
    )
}

/// Idempotent upsert keyed by `id`.
pub fn save_log(conn: &Connection, log: &LogEntry) -> AppResult<()> {
    conn.execute(
        "INSERT INTO logs (id, date, event_name, time, status, synced)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(id) DO UPDATE SET
             date = excluded.date,
             event_name = excluded.event_name,
             time = excluded.time,
             status = excluded.status,
             synced = excluded.synced",
        params![
            log.id,
            log.date_str(),
            log.event_name,
            log.time_str(),
            log.status.to_db_str(),
            if log.synced { 1 } else { 0 },
        ],
    )?;
    Ok(())
}

pub fn get_unsynced_logs(conn: &Connection) -> AppResult<Vec<LogEntry>> {
    collect_logs(
        conn,
        "SELECT id, date, event_name, time, status, synced FROM logs
         WHERE synced = 0
         ORDER BY date ASC, rowid ASC",
        None,
    )
}

pub fn count_unsynced(conn: &Connection) -> AppResult<i64> {
    let n = conn.query_row("SELECT COUNT(*) FROM logs WHERE synced = 0", [], |row| {
        row.get(0)
    })?;
    Ok(n)
}

/// Flag the given logs as synced. Unknown ids are ignored.
pub fn mark_logs_synced(pool: &mut DbPool, ids: &[String]) -> AppResult<()> {
    pool.with_conn(|conn| {
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare("UPDATE logs SET synced = 1 WHERE id = ?1")?;
            for id in ids {
                stmt.execute([id])?;
            }
        }
        tx.commit()
    })?;
    Ok(())
}

/// Delete every log of `date`. Returns the number of removed rows.
pub fn clear_logs_for_date(conn: &Connection, date: &NaiveDate) -> AppResult<usize> {
    let n = conn.execute(
        "DELETE FROM logs WHERE date = ?1",
        [date.format("%Y-%m-%d").to_string()],
    )?;
    Ok(n)
}
