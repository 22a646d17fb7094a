use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::Config;
use crate::server::*;

/// Shared, read-only request context.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/availability/resolve", post(resolve_availability))
        .route("/api/availability/check", post(check_booking))
        .route("/api/settings/validate", post(validate_settings))
        .route("/api/blocked-dates/range", post(block_range))
        .route("/api/blocked-dates/stats", post(blocked_date_stats))
        .route("/api/calendar/:year/:month", get(month_grid))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
