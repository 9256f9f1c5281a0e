//! ANSI color helper utilities for terminal output.

use crate::sync::SyncStatus;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Color of the sync indicator.
pub fn color_for_status(status: SyncStatus) -> &'static str {
    match status {
        SyncStatus::Synced => GREEN,
        SyncStatus::Error => RED,
        SyncStatus::Syncing => CYAN,
        SyncStatus::Offline => YELLOW,
        SyncStatus::Idle => RESET,
    }
}

/// Skipped entries are greyed out in the history.
pub fn colorize_log_time(value: &str, skipped: bool) -> String {
    if skipped {
        format!("{GREY}{value}{RESET}")
    } else {
        format!("{GREEN}{value}{RESET}")
    }
}
