//! Health check endpoints for liveness and readiness probes.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::ApiResponse;
use crate::AppState;

/// Readiness probe detail.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub loaded: bool,
    pub generation: u64,
}

/// Liveness probe: always returns OK if the process is running.
pub async fn live() -> &'static str {
    "OK"
}

/// Readiness probe: reports whether the first refresh has completed.
pub async fn ready(State(state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
    let snapshot = state.store.snapshot();
    let status = if snapshot.loading { "loading" } else { "ok" };

    ApiResponse::success(HealthStatus {
        status: status.to_string(),
        loaded: !snapshot.loading,
        generation: snapshot.generation,
    })
}
