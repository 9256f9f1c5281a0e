use crate::cli::parser::{Commands, EventAction};
use crate::config::Config;
use crate::core::clock::SystemClock;
use crate::core::roster::{RosterEditor, StructureChange};
use crate::core::tracker::DayTracker;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{hint, success, warning};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Event { action } = cmd {
        let mut pool = DbPool::new(&cfg.database)?;

        let mut roster = RosterEditor::load(&pool)?;

        let done = match action {
            EventAction::List => return list(&pool),
            EventAction::Add { name, icon } => {
                let icon = icon.as_deref().unwrap_or(&cfg.default_icon);
                let ev = roster.add(name, icon)?;
                format!("Added {} {}", ev.icon, ev.name)
            }
            EventAction::Rename { old, new } => {
                roster.rename(old, new)?;
                format!("Renamed '{}' to '{}'", old.trim(), new.trim())
            }
            EventAction::Icon { name, icon } => {
                roster.set_icon(name, icon)?;
                format!("Icon of '{}' set to {}", name.trim(), icon)
            }
            EventAction::Remove { name } => {
                let ev = roster.remove(name)?;
                format!("Removed {} {}", ev.icon, ev.name)
            }
            EventAction::Move { name, position } => {
                if *position == 0 {
                    return Err(AppError::InvalidInput(
                        "Positions start at 1".to_string(),
                    ));
                }
                roster.move_to(name, position - 1)?;
                format!("Moved '{}' to position {}", name.trim(), position)
            }
        };

        if let StructureChange::Changed { .. } = roster.save(&mut pool)? {
            warning("Events changed! A new tab will be created in the sheet on the next sync.");
        }

        success(done);
    }

    Ok(())
}

fn list(pool: &DbPool) -> AppResult<()> {
    let tracker = DayTracker::initialize_for_today(pool, SystemClock)?;

    if tracker.events().is_empty() {
        hint("No events configured. Use `dailytap setup` or `dailytap event add`.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        Column::new("#", 3),
        Column::new("", 2),
        Column::new("Icon", 4),
        Column::new("Event", 30),
        Column::new("Today", 8),
    ]);

    for (i, ev) in tracker.events().iter().enumerate() {
        let marker = if i == tracker.current_index() { "▶" } else { "" };
        let today = tracker
            .today_logs()
            .iter()
            .find(|l| l.event_name == ev.name)
            .map(|l| l.time_str())
            .unwrap_or_default();

        table.add_row(vec![
            (i + 1).to_string(),
            marker.to_string(),
            ev.icon.clone(),
            ev.name.clone(),
            today,
        ]);
    }

    print!("{}", table.render());
    Ok(())
}
