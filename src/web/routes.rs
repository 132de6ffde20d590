//! # Web API Routes
//!
//! Route definitions for the operator API, organized by functionality.

use axum::routing::{get, post};
use axum::Router;

use crate::web::handlers;
use crate::web::state::AppState;

/// Task lifecycle and control routes
pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/task/create", post(handlers::tasks::create_task))
        .route("/task/all", get(handlers::tasks::list_tasks))
        .route("/task/stats", get(handlers::tasks::task_stats))
        .route(
            "/task/{id}",
            get(handlers::tasks::task_logs).delete(handlers::tasks::delete_task),
        )
        .route("/task/{id}/cancel", post(handlers::tasks::cancel_task))
        .route("/task/{id}/pause", post(handlers::tasks::pause_task))
        .route("/task/{id}/resume", post(handlers::tasks::resume_task))
        .route("/task/{id}/restart", post(handlers::tasks::restart_task))
}

/// Health check routes for monitoring and Kubernetes probes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness_check))
}
