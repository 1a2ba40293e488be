pub mod config;
pub mod errors;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use services::store::DashboardStore;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub http: reqwest::Client,
    pub store: Arc<DashboardStore>,
}

impl AppState {
    /// Build the state for `config`: one upstream client and an empty store.
    pub fn new(config: config::AppConfig) -> Result<Self, errors::AppError> {
        let http = services::upstream::build_client(config.upstream_timeout())?;
        let store = Arc::new(DashboardStore::new(config.recent_limit));
        Ok(Self {
            config,
            http,
            store,
        })
    }
}
