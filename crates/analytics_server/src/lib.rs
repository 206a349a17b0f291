//! Docs Analytics server library

pub mod api;
pub mod config;
pub mod error;
pub mod models;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

use analytics_store::{AnalyticsStore, StoreError};

// Re-export main types for external use
pub use api::*;
pub use config::*;
pub use error::ApiError;
pub use models::*;

pub const TRACK_ROUTE: &str = "/api/analytics/track";
pub const DATA_ROUTE: &str = "/api/analytics/data";

// Application state shared by all handlers. The store is created here and
// lives for as long as the process.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<AnalyticsStore>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, StoreError> {
        let store = AnalyticsStore::with_limits(config.store_limits())?;
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            config: Arc::new(config),
        })
    }
}

/// Build the application router with tracing and CORS layers
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route(TRACK_ROUTE, post(track_page_view))
        .route(DATA_ROUTE, get(get_analytics))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
