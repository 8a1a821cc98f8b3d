//! Operational HTTP endpoints.
//!
//! - `/health`  : runs the health check and mirrors it into `application_health`
//! - `/metrics` : Prometheus text format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::app_state::AppState;
use crate::health::HealthStatus;
use crate::obs::metrics::CONTENT_TYPE;

#[derive(Debug, Serialize)]
struct HealthBody {
    status: HealthStatus,
    timestamp: String,
}

pub async fn health(State(state): State<AppState>) -> Response {
    let check = state.health();
    let status = HealthStatus::from_healthy(check.is_healthy().await);
    state.flips().metrics().health.set(status.gauge_value());

    let code = match status {
        HealthStatus::Up => StatusCode::OK,
        HealthStatus::Down => {
            tracing::warn!(check = check.name(), "health check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    };
    let body = HealthBody {
        status,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    (code, Json(body)).into_response()
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let extra = state.metrics_extra();
    let body = state.registry().export_text(&extra);

    (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
}
