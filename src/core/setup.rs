use crate::core::roster::{RosterEditor, StructureChange};
use crate::db::log::ttlog_quiet;
use crate::db::meta::set_meta;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::meta;
use chrono::NaiveDate;

/// Validated destination of the sync webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub sheet_link: String,
    pub script_url: String,
}

impl Destination {
    /// Both values are required; surrounding blanks are dropped.
    pub fn new(sheet_link: &str, script_url: &str) -> AppResult<Self> {
        let sheet_link = sheet_link.trim();
        let script_url = script_url.trim();

        if sheet_link.is_empty() {
            return Err(AppError::InvalidInput("Sheet link is required".into()));
        }
        if script_url.is_empty() {
            return Err(AppError::InvalidInput("Script URL is required".into()));
        }
        if !script_url.starts_with("http://") && !script_url.starts_with("https://") {
            return Err(AppError::InvalidInput(format!(
                "Script URL must start with http:// or https:// ({})",
                script_url
            )));
        }

        Ok(Self {
            sheet_link: sheet_link.to_string(),
            script_url: script_url.to_string(),
        })
    }

    fn persist(&self, pool: &DbPool) -> AppResult<()> {
        set_meta(&pool.conn, meta::SHEET_LINK, &self.sheet_link)?;
        set_meta(&pool.conn, meta::SCRIPT_URL, &self.script_url)?;
        Ok(())
    }
}

pub struct SetupLogic;

impl SetupLogic {
    /// First-run setup: destination, roster, structure hash and a fresh day.
    /// Everything is validated before anything is written.
    pub fn save_setup(
        pool: &mut DbPool,
        destination: &Destination,
        roster: RosterEditor,
        today: NaiveDate,
    ) -> AppResult<()> {
        if roster.is_empty() {
            return Err(AppError::InvalidInput(
                "At least one event is required".into(),
            ));
        }

        destination.persist(pool)?;
        let count = roster.events().len();
        roster.save(pool)?;

        set_meta(
            &pool.conn,
            meta::LAST_LOGGED_DATE,
            &today.format("%Y-%m-%d").to_string(),
        )?;
        set_meta(&pool.conn, meta::LAST_EVENT_INDEX, "0")?;

        ttlog_quiet(
            &pool.conn,
            "setup",
            &destination.sheet_link,
            &format!("Setup complete with {} event(s)", count),
        );
        Ok(())
    }

    /// Settings save: destination plus the (possibly edited) roster.
    pub fn save_settings(
        pool: &mut DbPool,
        destination: &Destination,
        roster: RosterEditor,
    ) -> AppResult<StructureChange> {
        destination.persist(pool)?;
        let change = roster.save(pool)?;

        ttlog_quiet(
            &pool.conn,
            "settings",
            &destination.sheet_link,
            if change.is_changed() {
                "Settings saved, event structure changed"
            } else {
                "Settings saved"
            },
        );
        Ok(change)
    }

    /// Only the destination changes; the roster and its hash are untouched.
    pub fn save_destination(pool: &DbPool, destination: &Destination) -> AppResult<()> {
        destination.persist(pool)?;
        ttlog_quiet(&pool.conn, "settings", &destination.sheet_link, "Destination updated");
        Ok(())
    }
}

