use chrono::{NaiveDate, NaiveTime};
use std::fmt;
use uuid::Uuid;

/// Sentinel stored in `logs.time` for skipped events.
pub const SKIPPED: &str = "SKIPPED";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStatus {
    Normal,
    Skipped,
}

impl LogStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            LogStatus::Normal => "normal",
            LogStatus::Skipped => "skipped",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(LogStatus::Normal),
            "skipped" => Some(LogStatus::Skipped),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, LogStatus::Skipped)
    }
}

/// Either a wall-clock `HH:MM` or the `SKIPPED` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTime {
    At(NaiveTime),
    Skipped,
}

impl LogTime {
    pub fn parse(s: &str) -> Option<Self> {
        if s == SKIPPED {
            return Some(LogTime::Skipped);
        }
        NaiveTime::parse_from_str(s, "%H:%M").ok().map(LogTime::At)
    }
}

impl fmt::Display for LogTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogTime::At(t) => write!(f, "{}", t.format("%H:%M")),
            LogTime::Skipped => f.write_str(SKIPPED),
        }
    }
}

/// One recorded occurrence of an event on a given day.
///
/// `event_name` is a snapshot of the event's name at logging time; logs are
/// matched to the roster by name, never by event id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: String,
    pub date: NaiveDate,
    pub event_name: String,
    pub time: LogTime,
    pub status: LogStatus,
    pub synced: bool,
}

impl LogEntry {
    pub fn logged(date: NaiveDate, event_name: &str, time: NaiveTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            event_name: event_name.to_string(),
            time: LogTime::At(time),
            status: LogStatus::Normal,
            synced: false,
        }
    }

    pub fn skipped(date: NaiveDate, event_name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            event_name: event_name.to_string(),
            time: LogTime::Skipped,
            status: LogStatus::Skipped,
            synced: false,
        }
    }

    /// Correct the time of an existing entry; it needs to be pushed again.
    pub fn retime(&mut self, time: NaiveTime) {
        self.time = LogTime::At(time);
        self.status = LogStatus::Normal;
        self.synced = false;
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn time_str(&self) -> String {
        self.time.to_string()
    }
}
