use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    Idle,
    Syncing,
    Synced,
    Offline,
    Error,
}

impl SyncStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SyncStatus::Idle => "Ready",
            SyncStatus::Syncing => "Syncing...",
            SyncStatus::Synced => "Synced",
            SyncStatus::Offline => "Offline",
            SyncStatus::Error => "Sync failed",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SyncStatus::Syncing => "↻",
            SyncStatus::Synced => "✓",
            SyncStatus::Error => "!",
            SyncStatus::Idle | SyncStatus::Offline => "○",
        }
    }
}

/// Shared, cloneable view of the sync status.
/// The manager writes it; the surrounding app reads it to drive its indicator.
#[derive(Debug, Clone, Default)]
pub struct StatusHandle {
    inner: Arc<Mutex<SyncStatus>>,
}

impl StatusHandle {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SyncStatus> {
        // A panicked writer cannot leave a half-written enum behind.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self) -> SyncStatus {
        *self.lock()
    }

    pub fn set(&self, status: SyncStatus) {
        *self.lock() = status;
    }

    /// Enter `Syncing` unless a cycle is already running.
    /// Returns false (and leaves the status alone) in that case.
    pub fn try_begin(&self) -> bool {
        let mut guard = self.lock();
        if *guard == SyncStatus::Syncing {
            return false;
        }
        *guard = SyncStatus::Syncing;
        true
    }
}
