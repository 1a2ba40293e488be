//! Unified error handling with consistent API response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Error detail in the API response envelope.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// Consistent JSON envelope for all API responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a successful result in the envelope.
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            data: Some(data),
            error: None,
        })
    }
}

/// Application error type mapping to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Upstream body is not JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Dashboard data not loaded yet")]
    Unavailable,
}

impl AppError {
    /// Check if this error originated at the upstream data source.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_) | Self::Decode(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Upstream(e) => {
                tracing::error!(error = %e, "Upstream request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "The data source could not be reached".to_string(),
                )
            }
            AppError::Decode(e) => {
                tracing::error!(error = %e, "Upstream body could not be decoded");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "The data source returned an unreadable response".to_string(),
                )
            }
            AppError::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "LOADING",
                "Dashboard data is still loading".to_string(),
            ),
        };

        let body = ApiResponse::<()> {
            data: None,
            error: Some(ApiError {
                code: code.to_string(),
                message,
            }),
        };

        (status, Json(body)).into_response()
    }
}
