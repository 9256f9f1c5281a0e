//! JSON body posted to the webhook.

use crate::models::log_entry::LogEntry;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncPayload {
    /// Destination identifier (the spreadsheet link).
    pub sheet: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// Event name → `HH:MM` or `SKIPPED`, only for events logged that day.
    pub events: BTreeMap<String, String>,
    /// Full roster in tap order; the remote side derives its columns from it.
    pub structure: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<bool>,
}

impl SyncPayload {
    pub fn for_date(
        sheet: &str,
        date: &NaiveDate,
        events: BTreeMap<String, String>,
        structure: &[String],
    ) -> Self {
        Self {
            sheet: sheet.to_string(),
            date: date.format("%Y-%m-%d").to_string(),
            events,
            structure: structure.to_vec(),
            test: None,
        }
    }

    /// Connection test: empty events and roster, flagged as a test.
    pub fn connection_test(sheet: &str, date: &NaiveDate) -> Self {
        Self {
            sheet: sheet.to_string(),
            date: date.format("%Y-%m-%d").to_string(),
            events: BTreeMap::new(),
            structure: Vec::new(),
            test: Some(true),
        }
    }
}

/// Group logs by day: date → (event name → time or SKIPPED).
/// When a day holds several entries for one name, the last one wins.
pub fn partition_by_date(logs: &[LogEntry]) -> BTreeMap<NaiveDate, BTreeMap<String, String>> {
    let mut out: BTreeMap<NaiveDate, BTreeMap<String, String>> = BTreeMap::new();
    for log in logs {
        out.entry(log.date)
            .or_default()
            .insert(log.event_name.clone(), log.time_str());
    }
    out
}
