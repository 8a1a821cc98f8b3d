//! Flip API endpoints.
//!
//! - `/flip-coins?times=N` : flip N coins
//! - `/flip-random`        : flip a random 1..=100 coins
//! - `/reset-counters`     : zero heads/tails/flips
//! - `/current-counts`     : cumulative counters
//! - `/flip-stats`         : counters plus percentages

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::app_state::AppState;
use crate::flip::INVALID_TIMES_MESSAGE;

pub async fn flip_coins(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let flips = state.flips();
    let raw = params.get("times").map(String::as_str);

    match flips.parse_times(raw) {
        Ok(times) => {
            let tally = flips.flip(times);
            tracing::debug!(times, heads = tally.heads, tails = tally.tails, "flipped coins");
            Json(tally).into_response()
        }
        Err(e) => {
            flips.record_error();
            tracing::warn!(
                times = ?raw,
                error = %e,
                code = e.client_code().as_str(),
                "rejected flip request"
            );
            (StatusCode::BAD_REQUEST, Json(json!({ "error": INVALID_TIMES_MESSAGE })))
                .into_response()
        }
    }
}

pub async fn flip_random(State(state): State<AppState>) -> impl IntoResponse {
    let out = state.flips().flip_random();
    tracing::debug!(
        times = out.tally.total(),
        heads = out.tally.heads,
        tails = out.tally.tails,
        "flipped random batch"
    );
    Json(out)
}

pub async fn reset_counters(State(state): State<AppState>) -> impl IntoResponse {
    state.flips().reset();
    tracing::info!("counters reset");
    (StatusCode::OK, "Counters have been reset.")
}

pub async fn current_counts(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.flips().current_counts())
}

pub async fn flip_stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.flips().stats())
}
