//! Dashboard routes: aggregated statistics for the overview page.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::{ApiResponse, AppError};
use crate::models::record::Record;
use crate::models::stats::Stats;
use crate::services::poller;
use crate::services::store::DashboardSnapshot;
use crate::AppState;

/// GET /api/v1/dashboard: cards, charts and recent activity.
pub async fn overview(State(state): State<AppState>) -> Json<ApiResponse<DashboardSnapshot>> {
    ApiResponse::success(state.store.snapshot())
}

/// GET /api/v1/dashboard/stats: aggregated decision statistics.
pub async fn stats(State(state): State<AppState>) -> Result<Json<ApiResponse<Stats>>, AppError> {
    let snapshot = state.store.snapshot();
    if snapshot.loading {
        return Err(AppError::Unavailable);
    }
    Ok(ApiResponse::success(snapshot.view.stats))
}

/// GET /api/v1/dashboard/records: raw rows from the last accepted refresh.
pub async fn records(State(state): State<AppState>) -> Json<ApiResponse<Vec<Record>>> {
    ApiResponse::success(state.store.snapshot().records)
}

/// Result of a manual refresh.
#[derive(Debug, Serialize)]
pub struct RefreshResult {
    pub applied: bool,
    pub generation: u64,
    pub stats: Stats,
}

/// POST /api/v1/dashboard/refresh: fetch from the upstream now.
pub async fn refresh(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RefreshResult>>, AppError> {
    let outcome =
        poller::refresh_once(&state.http, &state.config.upstream_url, &state.store).await?;
    tracing::info!(
        seq = outcome.seq,
        applied = outcome.applied,
        records = outcome.records,
        "Manual refresh completed"
    );

    let snapshot = state.store.snapshot();
    Ok(ApiResponse::success(RefreshResult {
        applied: outcome.applied,
        generation: snapshot.generation,
        stats: snapshot.view.stats,
    }))
}
