use crate::core::structure::events_hash;
use crate::db::log::ttlog_quiet;
use crate::db::meta::{get_meta, set_meta};
use crate::db::pool::DbPool;
use crate::db::queries::{get_all_events, save_all_events};
use crate::errors::{AppError, AppResult};
use crate::models::event::Event;
use crate::models::meta;

/// Result of persisting a roster, as seen by the remote table layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureChange {
    /// First roster ever saved, or same set of names as before.
    Unchanged,
    /// The set of names differs from the previously stored one; the remote
    /// side will open a new tab on the next sync.
    Changed { old: String, new: String },
}

impl StructureChange {
    pub fn is_changed(&self) -> bool {
        matches!(self, StructureChange::Changed { .. })
    }
}

/// Persist `events` as the whole roster and refresh the structure hash.
pub fn store_roster(pool: &mut DbPool, events: &mut [Event]) -> AppResult<StructureChange> {
    let old = get_meta(&pool.conn, meta::EVENT_STRUCTURE_HASH)?;
    let new = events_hash(events);

    save_all_events(pool, events)?;
    set_meta(&pool.conn, meta::EVENT_STRUCTURE_HASH, &new)?;

    Ok(match old {
        Some(old) if old != new => StructureChange::Changed { old, new },
        _ => StructureChange::Unchanged,
    })
}

fn clean_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Event name is required".into()));
    }
    Ok(name.to_string())
}

/// Working copy of the roster for settings-style edits.
/// Nothing touches the store until [`RosterEditor::save`].
#[derive(Debug, Clone, Default)]
pub struct RosterEditor {
    events: Vec<Event>,
}

impl RosterEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(pool: &DbPool) -> AppResult<Self> {
        Ok(Self {
            events: get_all_events(&pool.conn)?,
        })
    }

    fn position(&self, name: &str) -> AppResult<usize> {
        let name = name.trim();
        self.events
            .iter()
            .position(|e| e.name == name)
            .ok_or_else(|| AppError::UnknownEvent(name.to_string()))
    }

    fn ensure_unique(&self, name: &str) -> AppResult<()> {
        if self.events.iter().any(|e| e.name == name) {
            return Err(AppError::DuplicateEvent(name.to_string()));
        }
        Ok(())
    }

    /// Append a new event at the end of the roster.
    pub fn add(&mut self, name: &str, icon: &str) -> AppResult<&Event> {
        let name = clean_name(name)?;
        self.ensure_unique(&name)?;

        let mut ev = Event::new(&name, icon);
        ev.order = self.events.len();
        self.events.push(ev);

        let last = self.events.len() - 1;
        Ok(&self.events[last])
    }

    /// Rename an event. Logs already recorded keep the old name.
    pub fn rename(&mut self, old: &str, new: &str) -> AppResult<()> {
        let idx = self.position(old)?;
        let new = clean_name(new)?;
        if self.events[idx].name == new {
            return Ok(());
        }
        self.ensure_unique(&new)?;
        self.events[idx].name = new;
        Ok(())
    }

    pub fn set_icon(&mut self, name: &str, icon: &str) -> AppResult<()> {
        let idx = self.position(name)?;
        self.events[idx].icon = icon.to_string();
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> AppResult<Event> {
        let idx = self.position(name)?;
        Ok(self.events.remove(idx))
    }

    /// Move an event to `position` (0-based, clamped to the roster end).
    pub fn move_to(&mut self, name: &str, position: usize) -> AppResult<()> {
        let idx = self.position(name)?;
        let ev = self.events.remove(idx);
        let target = position.min(self.events.len());
        self.events.insert(target, ev);
        Ok(())
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Replace the stored roster with this one.
    pub fn save(mut self, pool: &mut DbPool) -> AppResult<StructureChange> {
        let change = store_roster(pool, &mut self.events)?;

        let names: Vec<&str> = self.events.iter().map(|e| e.name.as_str()).collect();
        ttlog_quiet(&pool.conn, "event_roster", "", &names.join(" → "));
        Ok(change)
    }
}
