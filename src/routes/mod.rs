//! Route definitions for the CosmoHealth API.

pub mod dashboard;
pub mod health;
pub mod proxy;

use axum::http::{HeaderValue, Uri};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::errors::AppError;
use crate::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.frontend_url);

    let dashboard_routes = Router::new()
        .route("/dashboard", get(dashboard::overview))
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/dashboard/records", get(dashboard::records))
        .route("/dashboard/refresh", post(dashboard::refresh));

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/api/getData", get(proxy::get_data))
        .nest("/api/v1", dashboard_routes)
        .fallback(not_found)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

fn cors_layer(frontend_url: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match frontend_url.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            tracing::warn!(error = %e, frontend_url, "Invalid FRONTEND_URL, allowing any origin");
            layer.allow_origin(Any)
        }
    }
}
