//! Shared dashboard state, replaced wholesale on every accepted refresh.
//!
//! Refreshes can overlap (the background poller plus manual refreshes), and
//! responses may arrive out of order. Each refresh takes a sequence number
//! from [`DashboardStore::issue`]; a result is applied only if its number is
//! still the latest one issued, so a slow, older response can never
//! overwrite newer data.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::record::Record;
use crate::services::dashboard::DashboardView;

/// Point-in-time copy of the dashboard state.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    /// True until the first refresh attempt has finished.
    pub loading: bool,
    /// Number of refreshes applied so far.
    pub generation: u64,
    pub refreshed_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub view: DashboardView,
    #[serde(skip)]
    pub records: Vec<Record>,
}

impl Default for DashboardSnapshot {
    fn default() -> Self {
        Self {
            loading: true,
            generation: 0,
            refreshed_at: None,
            view: DashboardView::default(),
            records: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct DashboardStore {
    issued: AtomicU64,
    recent_limit: usize,
    current: RwLock<DashboardSnapshot>,
}

impl DashboardStore {
    pub fn new(recent_limit: usize) -> Self {
        Self {
            issued: AtomicU64::new(0),
            recent_limit,
            current: RwLock::new(DashboardSnapshot::default()),
        }
    }

    /// Reserve the sequence number for a new refresh.
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Latest sequence number handed out.
    pub fn latest_issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Replace the dashboard with `records` if `seq` is still the latest
    /// refresh. Returns whether the records were applied.
    pub fn apply(&self, seq: u64, records: Vec<Record>) -> bool {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);

        let latest = self.latest_issued();
        if seq != latest {
            tracing::debug!(seq, latest, "Discarding stale refresh result");
            return false;
        }

        let view = DashboardView::build(&records, self.recent_limit);
        *current = DashboardSnapshot {
            loading: false,
            generation: current.generation + 1,
            refreshed_at: Some(Utc::now()),
            view,
            records,
        };
        true
    }

    /// Clear the initial loading flag. Called after every refresh attempt,
    /// successful or not.
    pub fn mark_loaded(&self) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        current.loading = false;
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loading(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .loading
    }
}
