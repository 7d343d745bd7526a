//! HTTP surface of the jobswipe server.
//!
//! Routes:
//!
//! - `GET  /api/jobs` search with the cache-aside search cache
//! - `GET  /api/jobs/liked` right-swiped jobs, newest first
//! - `POST /api/jobs/{id}/swipe` record a swipe, body `{ "direction": "left" | "right" }`
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use jobswipe_client::JobSource;
use jobswipe_core::JobStore;
use tower_http::trace::TraceLayer;

use crate::services::{liked, search, swipe};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: JobStore,
    pub source: Arc<dyn JobSource>,
    /// Maximum age of a search cache entry that may still be served.
    pub cache_ttl: Duration,
}

impl AppState {
    pub fn new(store: JobStore, source: Arc<dyn JobSource>, cache_ttl: Duration) -> Self {
        Self { store, source, cache_ttl }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/jobs", get(search::search))
        .route("/api/jobs/liked", get(liked::liked))
        .route("/api/jobs/{id}/swipe", post(swipe::swipe))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
