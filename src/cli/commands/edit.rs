use crate::cli::commands::status::print_progress;
use crate::cli::commands::sync::after_change;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::SystemClock;
use crate::core::tracker::{DayTracker, EditOutcome};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Edit { event, time } = cmd {
        let mut pool = DbPool::new(&cfg.database)?;
        let mut tracker = DayTracker::initialize_for_today(&pool, SystemClock)?;

        match tracker.edit_or_backfill(&pool, event, time)? {
            EditOutcome::Updated(entry) => success(format!(
                "Event time saved ✓  {} corrected to {}",
                entry.event_name,
                entry.time_str()
            )),
            EditOutcome::Backfilled(entry) => success(format!(
                "Event time saved ✓  {} logged at {}",
                entry.event_name,
                entry.time_str()
            )),
        }

        print_progress(&tracker);

        after_change(cfg, &mut pool)?;
    }

    Ok(())
}
