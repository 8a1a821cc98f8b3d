//! Axum router wiring.

use axum::{routing::get, Router};

use crate::{api, app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/flip-coins", get(api::flip_coins))
        .route("/flip-random", get(api::flip_random))
        .route("/reset-counters", get(api::reset_counters))
        .route("/current-counts", get(api::current_counts))
        .route("/flip-stats", get(api::flip_stats))
        .route("/health", get(ops::health))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
