//! # Health Check Handlers
//!
//! Kubernetes-compatible probes for the server process. Liveness always
//! answers while the process runs; readiness checks the Postgres pool and
//! the broker connection before admitting traffic.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::web::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub checks: ReadinessChecks,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadinessChecks {
    pub database: bool,
    pub broker: bool,
}

/// Basic health check endpoint: GET /health
///
/// Returns OK whenever the process is running, even during graceful
/// shutdown.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// Kubernetes readiness probe: GET /health/ready
///
/// Verifies database connectivity and the broker connection; answers 503
/// with the per-dependency breakdown when either is down.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    let database = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(state.pool())
        .await
        .is_ok();
    let broker = state.dispatcher().broker().is_connected();

    let ready = database && broker;
    let response = ReadinessResponse {
        status: if ready { "ready" } else { "not_ready" }.to_string(),
        checks: ReadinessChecks { database, broker },
        timestamp: Utc::now(),
    };

    if ready {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
