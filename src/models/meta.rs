//! Well-known keys of the `metadata` table.
//! The table itself has no schema beyond string keys.

pub const SHEET_LINK: &str = "sheet_link";
pub const SCRIPT_URL: &str = "script_url";
pub const LAST_LOGGED_DATE: &str = "last_logged_date";
pub const LAST_EVENT_INDEX: &str = "last_event_index";
pub const EVENT_STRUCTURE_HASH: &str = "event_structure_hash";
