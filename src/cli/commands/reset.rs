use crate::cli::commands::ask_confirmation;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::SystemClock;
use crate::core::tracker::DayTracker;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Reset { yes } = cmd {
        let pool = DbPool::new(&cfg.database)?;
        let mut tracker = DayTracker::initialize_for_today(&pool, SystemClock)?;

        if !*yes {
            let prompt = format!(
                "Reset today's progress ({})? This deletes {} log(s) for today",
                tracker.today_str(),
                tracker.today_logs().len()
            );
            if !ask_confirmation(&prompt) {
                info("Reset cancelled.");
                return Ok(());
            }
        }

        let removed = tracker.reset_today(&pool)?;
        success(format!("Today's progress reset ({} log(s) removed)", removed));
    }

    Ok(())
}
