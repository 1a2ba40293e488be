//! Passthrough to the upstream sheet.
//!
//! Not used by the dashboard's own refresh path; it exists so a browser
//! client can read the sheet without talking to the third party directly.
//! Failures use the bare `{ "error": ... }` body, not the API envelope.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::upstream;
use crate::AppState;

/// GET /api/getData: relay the upstream JSON body.
pub async fn get_data(State(state): State<AppState>) -> Response {
    match upstream::fetch_json(&state.http, &state.config.upstream_url).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Proxy request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
