//! # Operator Web API
//!
//! REST endpoints for task submission, inspection, and control, plus the
//! health probes. Follows a thin-handler layout: handlers validate and
//! translate, the models and dispatcher do the work.

use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

pub mod handlers;
pub mod response_types;
pub mod routes;
pub mod state;

pub use response_types::{ApiError, ApiResult, MessageResponse};
pub use state::AppState;

/// Create the web application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let common_middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors);

    let app = Router::new()
        .merge(routes::task_routes())
        .merge(routes::health_routes())
        .layer(common_middleware)
        .with_state(state);

    info!("🌐 API: Application router created");
    app
}
