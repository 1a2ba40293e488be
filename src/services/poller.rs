//! Background refresh loop.
//!
//! Refreshes once at start-up and then on a fixed interval. The fetch is
//! awaited inside the loop and missed ticks are skipped, so the poller
//! never has two requests of its own in flight. Failures are logged and
//! leave the displayed data as it was.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::errors::AppError;
use crate::services::store::DashboardStore;
use crate::services::upstream;

/// Outcome of a single refresh attempt that reached the upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub seq: u64,
    pub applied: bool,
    pub records: usize,
}

/// Fetch the upstream records once and hand them to the store.
///
/// The loading flag is cleared whatever the result: an applied result clears
/// it together with the new data, otherwise it is cleared on its own. On
/// error the data is left untouched and the error is returned to the caller.
pub async fn refresh_once(
    client: &Client,
    url: &str,
    store: &DashboardStore,
) -> Result<RefreshOutcome, AppError> {
    let seq = store.issue();
    let records = match upstream::fetch_records(client, url).await {
        Ok(records) => records,
        Err(e) => {
            store.mark_loaded();
            return Err(e);
        }
    };

    let count = records.len();
    let applied = store.apply(seq, records);
    if !applied {
        store.mark_loaded();
    }

    Ok(RefreshOutcome {
        seq,
        applied,
        records: count,
    })
}

/// Handle for the running poll loop.
///
/// Call [`PollerHandle::shutdown`] to stop the loop and wait for it. Dropping
/// the handle without shutting down aborts the task.
pub struct PollerHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Stop the timer and wait for the loop to exit.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Poller task ended abnormally");
            }
        }
        tracing::info!("Poller stopped");
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Spawn the poll loop on the current tokio runtime.
pub fn start(
    client: Client,
    url: String,
    interval: Duration,
    store: Arc<DashboardStore>,
) -> PollerHandle {
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    tracing::info!(%url, interval_secs = interval.as_secs_f64(), "Poller started");
    let task = tokio::spawn(poll_loop(client, url, interval, store, shutdown_rx));

    PollerHandle {
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    }
}

async fn poll_loop(
    client: Client,
    url: String,
    interval: Duration,
    store: Arc<DashboardStore>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = &mut shutdown_rx => break,
            // The first tick completes immediately, giving the initial refresh.
            _ = ticker.tick() => {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = refresh_once(&client, &url, &store) => log_outcome(result),
                }
            }
        }
    }
}

fn log_outcome(result: Result<RefreshOutcome, AppError>) {
    match result {
        Ok(outcome) if outcome.applied => {
            tracing::info!(seq = outcome.seq, records = outcome.records, "Dashboard refreshed");
        }
        Ok(outcome) => {
            tracing::debug!(seq = outcome.seq, "Refresh superseded by a newer request");
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                upstream = e.is_upstream(),
                "Error fetching dashboard data"
            );
        }
    }
}
