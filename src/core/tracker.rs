//! Daily progression through the roster.
//!
//! A [`DayTracker`] is the single owner of the in-memory view of "today":
//! the ordered roster, the logs recorded for the active date, and the cursor
//! pointing at the next event to tap. Every mutating call writes to the
//! store first, in one transaction, and only then updates memory. A failed
//! write leaves both sides as they were.
//!
//! Cursor states are `0..=N` with `N = events.len()` meaning "all done".
//! Taps and skips only move it forward by one; a backfill recomputes it as
//! the index of the lowest-ordered event without a log today.

use crate::core::clock::{Clock, SystemClock};
use crate::db::log::ttlog_quiet;
use crate::db::meta::{get_meta, set_meta};
use crate::db::pool::DbPool;
use crate::db::queries::{clear_logs_for_date, get_all_events, get_logs_for_date, save_log};
use crate::errors::{AppError, AppResult};
use crate::models::event::Event;
use crate::models::log_entry::LogEntry;
use crate::models::meta;
use crate::utils::time::parse_time;
use chrono::NaiveDate;

/// Completion for the active date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub logged: usize,
    pub total: usize,
}

impl Progress {
    /// 0 when no events are configured; never above 100.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        ((self.logged as f64 / self.total as f64) * 100.0).min(100.0)
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.logged >= self.total
    }
}

/// What `edit_or_backfill` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// An entry already existed today and was corrected in place.
    Updated(LogEntry),
    /// A new entry was created and the cursor recomputed.
    Backfilled(LogEntry),
}

pub struct DayTracker<C: Clock = SystemClock> {
    clock: C,
    today: NaiveDate,
    events: Vec<Event>,
    today_logs: Vec<LogEntry>,
    current_index: usize,
}

impl<C: Clock> DayTracker<C> {
    /// Load the roster and today's state, rolling the day over when the
    /// stored `last_logged_date` is not today (or was never written).
    pub fn initialize_for_today(pool: &DbPool, clock: C) -> AppResult<Self> {
        let mut tracker = Self {
            today: clock.today(),
            clock,
            events: Vec::new(),
            today_logs: Vec::new(),
            current_index: 0,
        };
        tracker.reload(pool)?;
        Ok(tracker)
    }

    /// Drop the in-memory view and rebuild it from the store.
    /// Needed after the roster is edited or another session touched the data.
    pub fn reload(&mut self, pool: &DbPool) -> AppResult<()> {
        self.today = self.clock.today();
        self.events = get_all_events(&pool.conn)?;

        let last_date = get_meta(&pool.conn, meta::LAST_LOGGED_DATE)?;
        if last_date.as_deref() != Some(self.today_str().as_str()) {
            self.rollover(pool, last_date.as_deref())?;
            return Ok(());
        }

        let stored = get_meta(&pool.conn, meta::LAST_EVENT_INDEX)?
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);

        self.current_index = stored.min(self.events.len());
        self.today_logs = get_logs_for_date(&pool.conn, &self.today)?;
        Ok(())
    }

    /// For long-lived sessions: roll over if the clock moved to a new day
    /// since the session was loaded. Returns true when a rollover happened.
    pub fn check_date_change(&mut self, pool: &DbPool) -> AppResult<bool> {
        let now = self.clock.today();
        if now == self.today {
            return Ok(false);
        }

        let previous = self.today_str();
        self.today = now;
        self.rollover(pool, Some(&previous))?;
        Ok(true)
    }

    fn rollover(&mut self, pool: &DbPool, previous: Option<&str>) -> AppResult<()> {
        let today = self.today_str();

        let tx = pool.conn.unchecked_transaction()?;
        set_meta(&tx, meta::LAST_EVENT_INDEX, "0")?;
        set_meta(&tx, meta::LAST_LOGGED_DATE, &today)?;
        tx.commit()?;

        // Older logs stay in the store; they are simply not "today" anymore.
        self.current_index = 0;
        self.today_logs.clear();

        ttlog_quiet(
            &pool.conn,
            "rollover",
            &today,
            &format!("New day (previous: {})", previous.unwrap_or("none")),
        );
        Ok(())
    }

    /// Record the current event at the current time.
    /// Returns `None` (and changes nothing) when every event is already done.
    pub fn log_current(&mut self, pool: &DbPool) -> AppResult<Option<LogEntry>> {
        let Some(event) = self.current_event() else {
            return Ok(None);
        };

        let entry = LogEntry::logged(self.today, &event.name, self.clock.now_time());
        self.record(pool, entry, "tap").map(Some)
    }

    /// Mark the current event as skipped. Same guard as [`Self::log_current`].
    pub fn skip_current(&mut self, pool: &DbPool) -> AppResult<Option<LogEntry>> {
        let Some(event) = self.current_event() else {
            return Ok(None);
        };

        let entry = LogEntry::skipped(self.today, &event.name);
        self.record(pool, entry, "skip").map(Some)
    }

    fn record(&mut self, pool: &DbPool, entry: LogEntry, operation: &str) -> AppResult<LogEntry> {
        let next = self.current_index + 1;

        let tx = pool.conn.unchecked_transaction()?;
        save_log(&tx, &entry)?;
        set_meta(&tx, meta::LAST_EVENT_INDEX, &next.to_string())?;
        tx.commit()?;

        self.today_logs.push(entry.clone());
        self.current_index = next;

        ttlog_quiet(
            &pool.conn,
            operation,
            &entry.event_name,
            &format!("{} {}", entry.date_str(), entry.time_str()),
        );
        Ok(entry)
    }

    /// Set the time of `event_name` for today.
    ///
    /// An existing entry is corrected in place and flagged for re-sync.
    /// Otherwise a new entry is created and the cursor moves to the first
    /// roster event that still has no log today.
    pub fn edit_or_backfill(
        &mut self,
        pool: &DbPool,
        event_name: &str,
        time: &str,
    ) -> AppResult<EditOutcome> {
        let name = event_name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput("Event name is required".into()));
        }
        if time.trim().is_empty() {
            return Err(AppError::InvalidInput("Time is required".into()));
        }
        let at = parse_time(time.trim()).ok_or_else(|| AppError::InvalidTime(time.into()))?;

        if !self.events.iter().any(|e| e.name == name) {
            return Err(AppError::UnknownEvent(name.to_string()));
        }

        if let Some(pos) = self.today_logs.iter().position(|l| l.event_name == name) {
            let mut updated = self.today_logs[pos].clone();
            updated.retime(at);
            save_log(&pool.conn, &updated)?;

            self.today_logs[pos] = updated.clone();
            ttlog_quiet(&pool.conn, "edit", name, &format!("Corrected to {}", at.format("%H:%M")));
            return Ok(EditOutcome::Updated(updated));
        }

        let entry = LogEntry::logged(self.today, name, at);
        let next = self.first_gap(name);

        let tx = pool.conn.unchecked_transaction()?;
        save_log(&tx, &entry)?;
        set_meta(&tx, meta::LAST_EVENT_INDEX, &next.to_string())?;
        tx.commit()?;

        self.today_logs.push(entry.clone());
        self.current_index = next;

        ttlog_quiet(&pool.conn, "edit", name, &format!("Backfilled at {}", at.format("%H:%M")));
        Ok(EditOutcome::Backfilled(entry))
    }

    /// Index of the first roster event without a log today, counting
    /// `also_logged` as logged. `N` when every event has one.
    fn first_gap(&self, also_logged: &str) -> usize {
        self.events
            .iter()
            .position(|ev| {
                ev.name != also_logged && !self.today_logs.iter().any(|l| l.event_name == ev.name)
            })
            .unwrap_or(self.events.len())
    }

    /// Explicit user reset: forget everything logged today and start over.
    /// Returns the number of deleted logs.
    pub fn reset_today(&mut self, pool: &DbPool) -> AppResult<usize> {
        let tx = pool.conn.unchecked_transaction()?;
        let removed = clear_logs_for_date(&tx, &self.today)?;
        set_meta(&tx, meta::LAST_EVENT_INDEX, "0")?;
        tx.commit()?;

        self.current_index = 0;
        self.today_logs.clear();

        ttlog_quiet(
            &pool.conn,
            "reset",
            &self.today_str(),
            &format!("Removed {} log(s)", removed),
        );
        Ok(removed)
    }

    pub fn progress(&self) -> Progress {
        Progress {
            logged: self.today_logs.len(),
            total: self.events.len(),
        }
    }

    /// The event due next, or `None` once the day is complete.
    pub fn current_event(&self) -> Option<&Event> {
        self.events.get(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_day_complete(&self) -> bool {
        self.current_index >= self.events.len()
    }

    /// Today's logs in roster order; logs of events no longer in the roster last.
    pub fn history(&self) -> Vec<(&LogEntry, Option<&Event>)> {
        let mut out: Vec<(&LogEntry, Option<&Event>)> = self
            .today_logs
            .iter()
            .map(|l| (l, self.events.iter().find(|e| e.name == l.event_name)))
            .collect();
        out.sort_by_key(|(_, ev)| ev.map(|e| e.order).unwrap_or(usize::MAX));
        out
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn today_logs(&self) -> &[LogEntry] {
        &self.today_logs
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn today_str(&self) -> String {
        self.today.format("%Y-%m-%d").to_string()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
