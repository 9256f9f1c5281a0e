use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::meta::{destination, get_meta};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::meta;
use crate::sync::connectivity::SystemConnectivity;
use crate::sync::manager::NoBackgroundRetry;
use crate::sync::transport::HttpTransport;
use crate::sync::{RequestOutcome, SyncManager, SyncOutcome, SyncStatus};
use crate::ui::messages::{error, hint, info, success, warning};
use crate::utils::colors::{RESET, color_for_status};

/// Manager wired to the real network, probing the stored webhook host.
pub(crate) fn manager(
    cfg: &Config,
    pool: &DbPool,
) -> AppResult<SyncManager<HttpTransport, SystemConnectivity>> {
    let url = get_meta(&pool.conn, meta::SCRIPT_URL)?;
    let transport = HttpTransport::new(cfg.request_timeout())?;
    let connectivity = SystemConnectivity::for_endpoint(url.as_deref(), cfg.request_timeout());
    Ok(SyncManager::new(transport, connectivity))
}

/// Called after every local change when `auto_sync` is on.
/// A failed delivery only warns: the logs stay queued for the next cycle.
pub(crate) fn after_change(cfg: &Config, pool: &mut DbPool) -> AppResult<()> {
    if !cfg.auto_sync {
        return Ok(());
    }

    let manager = manager(cfg, pool)?;
    match manager.request_sync(pool, &NoBackgroundRetry)? {
        RequestOutcome::Scheduled => info("Sync scheduled."),
        RequestOutcome::Ran(outcome) => report(&outcome, true),
    }
    Ok(())
}

fn indicator(status: SyncStatus) -> String {
    format!("{}{}{}", color_for_status(status), status.icon(), RESET)
}

/// Print one line for a sync outcome. `quiet` hides the uneventful ones.
pub(crate) fn report(outcome: &SyncOutcome, quiet: bool) {
    match outcome {
        SyncOutcome::AlreadySyncing => info("A sync is already running."),
        SyncOutcome::NotConfigured => {
            if !quiet {
                hint("Sync destination not configured. Run `dailytap setup` first.");
            }
        }
        SyncOutcome::NothingToSync => {
            if !quiet {
                success("Nothing to sync, everything is up to date.");
            }
        }
        SyncOutcome::Synced { logs, dates } => success(format!(
            "{} Synced {} log(s) over {} day(s).",
            indicator(SyncStatus::Synced),
            logs,
            dates
        )),
        SyncOutcome::Failed { status, reason } => {
            let msg = format!(
                "{} Sync failed ({}): {}. Logs are kept and will be sent on the next sync.",
                indicator(*status),
                status.label(),
                reason
            );
            if quiet {
                warning(msg);
            } else {
                error(msg);
            }
        }
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sync = cmd {
        let mut pool = DbPool::new(&cfg.database)?;
        let manager = manager(cfg, &pool)?;

        if destination(&pool.conn)?.is_some() && manager.init_status() == SyncStatus::Offline {
            warning("No network path to the webhook host; trying anyway.");
        }

        let outcome = manager.sync_now(&mut pool)?;
        report(&outcome, false);

        if let SyncOutcome::Failed { reason, .. } = outcome {
            return Err(AppError::Transport(reason));
        }
    }

    Ok(())
}
