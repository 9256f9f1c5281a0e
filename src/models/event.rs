use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-defined daily activity, tapped once per day in roster order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,    // ⇔ events.id (TEXT, uuid v4)
    pub name: String,  // ⇔ events.name, also the column header on the remote sheet
    pub icon: String,  // ⇔ events.icon (cosmetic only)
    pub order: usize,  // ⇔ events.ord (0-based, contiguous after every save)
}

impl Event {
    /// Builds a fresh event with a new id.
    /// `order` is left at 0: the replace-all save reassigns it from list position.
    pub fn new(name: &str, icon: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            icon: icon.to_string(),
            order: 0,
        }
    }
}

/// Roster view: event names in tap order.
pub fn roster_names(events: &[Event]) -> Vec<String> {
    events.iter().map(|e| e.name.clone()).collect()
}
