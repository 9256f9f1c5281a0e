use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::{Clock, SystemClock};
use crate::core::tracker::DayTracker;
use crate::db::meta::destination;
use crate::db::pool::DbPool;
use crate::db::queries::count_unsynced;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, hint};
use crate::utils::colors::{GREY, RESET, colorize_log_time};
use crate::utils::date::describe_day;
use crate::utils::table::{Column, Table};
use crate::utils::time::progress_bar;
use serde::Serialize;

const BAR_WIDTH: usize = 20;

#[derive(Serialize)]
struct HistoryRow<'a> {
    event: &'a str,
    time: String,
    skipped: bool,
    synced: bool,
}

#[derive(Serialize)]
struct StatusReport<'a> {
    date: String,
    logged: usize,
    total: usize,
    percentage: f64,
    next: Option<&'a str>,
    history: Vec<HistoryRow<'a>>,
    pending_sync: i64,
    sync_configured: bool,
}

/// Progress line plus what comes next.
pub(crate) fn print_progress<C: Clock>(tracker: &DayTracker<C>) {
    let progress = tracker.progress();
    println!(
        "{} {} of {} events ({:.0}%)",
        progress_bar(progress.percentage(), BAR_WIDTH),
        progress.logged,
        progress.total,
        progress.percentage()
    );

    match tracker.current_event() {
        Some(ev) => println!("👉 Next: {} {}", ev.icon, ev.name),
        None if progress.total > 0 => println!("🎉 All done for today!"),
        None => {}
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status { json } = cmd {
        let pool = DbPool::new(&cfg.database)?;
        let tracker = DayTracker::initialize_for_today(&pool, SystemClock)?;

        if *json {
            return print_json(&pool, &tracker);
        }

        header(describe_day(&tracker.today()));

        if tracker.events().is_empty() {
            hint("No events configured. Run `dailytap setup` first.");
            return Ok(());
        }

        print_progress(&tracker);

        //
        // Today's history, in roster order
        //
        let history = tracker.history();
        if !history.is_empty() {
            println!();
            let mut table = Table::new(vec![
                Column::new("Icon", 4),
                Column::new("Event", 30),
                Column::new("Time", 8),
            ]);
            for (log, ev) in &history {
                table.add_row(vec![
                    ev.map(|e| e.icon.clone()).unwrap_or_default(),
                    log.event_name.clone(),
                    log.time_str(),
                ]);
            }

            // Colors are applied per line so the cell padding stays right
            let rendered = table.render();
            let mut lines = rendered.lines();
            if let Some(head) = lines.next() {
                println!("{}{}{}", GREY, head, RESET);
            }
            for ((log, _), line) in history.iter().zip(lines) {
                println!("{}", colorize_log_time(line, log.status.is_skipped()));
            }
        }

        //
        // Sync queue
        //
        println!();
        let pending = count_unsynced(&pool.conn)?;
        match destination(&pool.conn)? {
            Some((sheet, _)) => println!("🔄 Sync: {} pending log(s) → {}", pending, sheet),
            None => println!("🔄 Sync: not configured ({} pending log(s))", pending),
        }
    }

    Ok(())
}

fn print_json<C: Clock>(pool: &DbPool, tracker: &DayTracker<C>) -> AppResult<()> {
    let progress = tracker.progress();
    let report = StatusReport {
        date: tracker.today_str(),
        logged: progress.logged,
        total: progress.total,
        percentage: progress.percentage(),
        next: tracker.current_event().map(|e| e.name.as_str()),
        history: tracker
            .history()
            .into_iter()
            .map(|(log, _)| HistoryRow {
                event: &log.event_name,
                time: log.time_str(),
                skipped: log.status.is_skipped(),
                synced: log.synced,
            })
            .collect(),
        pending_sync: count_unsynced(&pool.conn)?,
        sync_configured: destination(&pool.conn)?.is_some(),
    };

    let out = serde_json::to_string_pretty(&report).map_err(|e| AppError::Other(e.to_string()))?;
    println!("{}", out);
    Ok(())
}
