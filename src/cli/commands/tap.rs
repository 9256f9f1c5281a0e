use crate::cli::commands::status::print_progress;
use crate::cli::commands::sync::after_change;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::SystemClock;
use crate::core::tracker::DayTracker;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{hint, info, success};

const TAP_MESSAGES: [&str; 6] = [
    "Boom! Logged 😄",
    "Done & dusted ✨",
    "Nailed it! 🎯",
    "You're on fire! 🔥",
    "Quick tap! ⚡",
    "Logged like a pro 💪",
];

const SKIP_MESSAGES: [&str; 3] = [
    "Event skipped. Moving on 🚀",
    "Skipped! Next up ➡️",
    "No worries, skipped! 👍",
];

/// Handle `tap` and `skip`: record the current event and advance.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let skip = match cmd {
        Commands::Tap => false,
        Commands::Skip => true,
        _ => return Ok(()),
    };

    let mut pool = DbPool::new(&cfg.database)?;
    let mut tracker = DayTracker::initialize_for_today(&pool, SystemClock)?;

    if tracker.events().is_empty() {
        hint("No events configured. Run `dailytap setup` first.");
        return Ok(());
    }

    let recorded = if skip {
        tracker.skip_current(&pool)?
    } else {
        tracker.log_current(&pool)?
    };

    let Some(entry) = recorded else {
        info("All done for today! 🎉 Use `dailytap edit` to correct a time.");
        return Ok(());
    };

    // Rotate through the messages as the day goes on
    let n = tracker.today_logs().len();
    let message = if skip {
        SKIP_MESSAGES[n % SKIP_MESSAGES.len()]
    } else {
        TAP_MESSAGES[n % TAP_MESSAGES.len()]
    };
    success(format!("{}  {} · {}", message, entry.event_name, entry.time_str()));

    print_progress(&tracker);

    after_change(cfg, &mut pool)
}
