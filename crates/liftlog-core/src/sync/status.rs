//! Shared sync status: the in-flight flag and last completion time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Shared between the engine, its background task, and status consumers.
///
/// The in-flight flag doubles as the mutual-exclusion lock for sync passes:
/// `try_begin` is a single compare-exchange, so two concurrent triggers can
/// never both enter a pass.
#[derive(Debug, Default)]
pub struct SyncStatusHandle {
    syncing: AtomicBool,
    last_sync_time: Mutex<Option<i64>>,
}

impl SyncStatusHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to begin a pass. Returns false if one is already running.
    pub fn try_begin(&self) -> bool {
        self.syncing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Mark the current pass as finished.
    pub fn end(&self) {
        self.syncing.store(false, Ordering::Release);
    }

    /// Whether a pass is currently running.
    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::Acquire)
    }

    /// Record when the last pass that processed at least one entry finished.
    pub fn set_last_sync_time(&self, timestamp: i64) {
        if let Ok(mut guard) = self.last_sync_time.lock() {
            *guard = Some(timestamp);
        }
    }

    /// Unix millis of the last pass that processed at least one entry.
    pub fn last_sync_time(&self) -> Option<i64> {
        self.last_sync_time.lock().ok().and_then(|guard| *guard)
    }
}
