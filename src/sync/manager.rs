//! Sync cycle: drain every unsynced log to the webhook, one request per day.
//!
//! Delivery is at-least-once. A cycle marks logs as synced only after every
//! day's request went through; if any request fails, nothing is marked and
//! the whole set is sent again on the next cycle. The remote side upserts
//! by (date, event name), so a resend overwrites identical cells.
//!
//! There is no retry loop here. Cycles are started by the caller: a manual
//! sync, the device coming back online, or a deferred background retry.

use crate::db::log::ttlog_quiet;
use crate::db::meta::destination;
use crate::db::pool::DbPool;
use crate::db::queries::{get_all_events, get_unsynced_logs, mark_logs_synced};
use crate::errors::{AppError, AppResult};
use crate::models::event::roster_names;
use crate::sync::connectivity::Connectivity;
use crate::sync::payload::{SyncPayload, partition_by_date};
use crate::sync::status::{StatusHandle, SyncStatus};
use crate::sync::transport::{Delivery, Transport};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Another cycle was running; this call did nothing.
    AlreadySyncing,
    /// No destination stored yet. Not an error.
    NotConfigured,
    NothingToSync,
    Synced { logs: usize, dates: usize },
    /// A delivery failed; no log was marked. `status` is `Offline` or `Error`.
    Failed { status: SyncStatus, reason: String },
}

/// Platform hook able to run a sync later (e.g. when the network returns).
pub trait BackgroundRetry {
    /// True when a deferred sync was registered.
    fn register(&self) -> bool;
}

/// No deferred mechanism available: callers fall back to an immediate cycle.
pub struct NoBackgroundRetry;

impl BackgroundRetry for NoBackgroundRetry {
    fn register(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Scheduled,
    Ran(SyncOutcome),
}

pub struct SyncManager<T: Transport, N: Connectivity> {
    transport: T,
    connectivity: N,
    status: StatusHandle,
}

impl<T: Transport, N: Connectivity> SyncManager<T, N> {
    pub fn new(transport: T, connectivity: N) -> Self {
        Self::with_status(transport, connectivity, StatusHandle::new())
    }

    /// Share an existing status handle (e.g. one the UI already observes).
    pub fn with_status(transport: T, connectivity: N, status: StatusHandle) -> Self {
        Self {
            transport,
            connectivity,
            status,
        }
    }

    pub fn status(&self) -> StatusHandle {
        self.status.clone()
    }

    pub fn current_status(&self) -> SyncStatus {
        self.status.get()
    }

    /// Startup status: `Offline` without a network path, `Idle` otherwise.
    pub fn init_status(&self) -> SyncStatus {
        let status = if self.connectivity.is_online() {
            SyncStatus::Idle
        } else {
            SyncStatus::Offline
        };
        self.status.set(status);
        status
    }

    /// Connectivity came back: reset the indicator and drain the queue.
    pub fn handle_online(&self, pool: &mut DbPool) -> AppResult<SyncOutcome> {
        self.status.set(SyncStatus::Idle);
        self.sync_now(pool)
    }

    pub fn handle_offline(&self) {
        self.status.set(SyncStatus::Offline);
    }

    /// Prefer a deferred background retry; run a cycle now if none is available.
    pub fn request_sync(
        &self,
        pool: &mut DbPool,
        retry: &dyn BackgroundRetry,
    ) -> AppResult<RequestOutcome> {
        if retry.register() {
            return Ok(RequestOutcome::Scheduled);
        }
        Ok(RequestOutcome::Ran(self.sync_now(pool)?))
    }

    /// Run one sync cycle. A call made while a cycle is running is a no-op.
    ///
    /// Storage failures are returned as errors (status `Error`); delivery
    /// failures are reported through [`SyncOutcome::Failed`].
    pub fn sync_now(&self, pool: &mut DbPool) -> AppResult<SyncOutcome> {
        if !self.status.try_begin() {
            return Ok(SyncOutcome::AlreadySyncing);
        }

        match self.run_cycle(pool) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.status.set(SyncStatus::Error);
                Err(e)
            }
        }
    }

    fn run_cycle(&self, pool: &mut DbPool) -> AppResult<SyncOutcome> {
        let Some((sheet, url)) = destination(&pool.conn)? else {
            self.status.set(SyncStatus::Idle);
            return Ok(SyncOutcome::NotConfigured);
        };

        let unsynced = get_unsynced_logs(&pool.conn)?;
        if unsynced.is_empty() {
            self.status.set(SyncStatus::Synced);
            return Ok(SyncOutcome::NothingToSync);
        }

        let by_date = partition_by_date(&unsynced);
        let structure = roster_names(&get_all_events(&pool.conn)?);

        for (date, events) in by_date.iter() {
            let payload = SyncPayload::for_date(&sheet, date, events.clone(), &structure);

            if let Delivery::TransportFailed(reason) = self.transport.send(&url, &payload) {
                let status = if self.connectivity.is_online() {
                    SyncStatus::Error
                } else {
                    SyncStatus::Offline
                };
                self.status.set(status);

                ttlog_quiet(
                    &pool.conn,
                    "sync_failed",
                    &payload.date,
                    &format!("{} unsynced log(s) kept: {}", unsynced.len(), reason),
                );
                return Ok(SyncOutcome::Failed { status, reason });
            }
        }

        let ids: Vec<String> = unsynced.iter().map(|l| l.id.clone()).collect();
        mark_logs_synced(pool, &ids)?;
        self.status.set(SyncStatus::Synced);

        ttlog_quiet(
            &pool.conn,
            "sync",
            &url,
            &format!("{} log(s) over {} day(s)", ids.len(), by_date.len()),
        );

        Ok(SyncOutcome::Synced {
            logs: ids.len(),
            dates: by_date.len(),
        })
    }

    /// Send a test payload to `endpoint`.
    ///
    /// `Delivered` only proves the request was not rejected at transport
    /// level; whether the remote script processed it cannot be observed.
    pub fn test_connection(
        &self,
        endpoint: &str,
        sheet: &str,
        today: NaiveDate,
    ) -> AppResult<Delivery> {
        test_connection(&self.transport, endpoint, sheet, today)
    }
}

/// Check the webhook without a manager (e.g. during setup, before saving).
pub fn test_connection<T: Transport>(
    transport: &T,
    endpoint: &str,
    sheet: &str,
    today: NaiveDate,
) -> AppResult<Delivery> {
    let endpoint = endpoint.trim();
    let sheet = sheet.trim();
    if endpoint.is_empty() || sheet.is_empty() {
        return Err(AppError::InvalidInput(
            "Both the sheet link and the script URL are required".into(),
        ));
    }

    Ok(transport.send(endpoint, &SyncPayload::connection_test(sheet, &today)))
}
