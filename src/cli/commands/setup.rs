use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::roster::RosterEditor;
use crate::core::setup::{Destination, SetupLogic};
use crate::db::meta::is_setup_complete;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use crate::utils::date;

/// First-run setup. Running it again replaces destination and events
/// and restarts today from the first event.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Setup {
        sheet,
        url,
        events,
        icon,
    } = cmd
    {
        //
        // 1. Validate everything before touching the store
        //
        let destination = Destination::new(sheet, url)?;

        let icon = icon.as_deref().unwrap_or(&cfg.default_icon);
        let mut roster = RosterEditor::new();
        for name in events {
            roster.add(name, icon)?;
        }

        //
        // 2. Persist
        //
        let mut pool = DbPool::new(&cfg.database)?;
        if is_setup_complete(&pool.conn)? {
            warning("Setup was already completed; destination and events are replaced.");
        }

        let count = roster.events().len();
        SetupLogic::save_setup(&mut pool, &destination, roster, date::today())?;

        success(format!(
            "Setup complete: {} event(s), syncing to {}",
            count, destination.sheet_link
        ));
    }

    Ok(())
}
