//! Source of "today" and "now" for the tracker.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::cell::Cell;

pub trait Clock {
    /// Current local calendar day.
    fn today(&self) -> NaiveDate;

    /// Current local wall-clock time, truncated to the minute.
    fn now_time(&self) -> NaiveTime;
}

/// The machine's local clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        crate::utils::date::today()
    }

    fn now_time(&self) -> NaiveTime {
        truncate_to_minute(Local::now().time())
    }
}

/// A manually driven clock.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    /// `date` at `time`; both in `YYYY-MM-DD` / `HH:MM` form.
    pub fn at(date: &str, time: &str) -> Option<Self> {
        let d = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        let t = NaiveTime::parse_from_str(time, "%H:%M").ok()?;
        Some(Self::new(d.and_time(t)))
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(now);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.now.get().date()
    }

    fn now_time(&self) -> NaiveTime {
        truncate_to_minute(self.now.get().time())
    }
}

fn truncate_to_minute(t: NaiveTime) -> NaiveTime {
    t.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}
