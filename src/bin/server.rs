//! # Taskhelm Server
//!
//! The operator-facing process: serves the REST API, dispatches new tasks
//! to the worker pool, and runs the report reconciler that keeps the task
//! record store in sync with what workers actually did.
//!
//! ## Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin taskhelm-server
//!
//! # Run with a specific environment
//! TASKHELM_ENV=production cargo run --bin taskhelm-server
//! ```

use std::sync::Arc;

use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

use taskhelm::database::Database;
use taskhelm::logging::init_structured_logging;
use taskhelm::messaging::{Broker, TaskDispatcher};
use taskhelm::reconciler::ReportReconciler;
use taskhelm::web::{self, AppState};
use taskhelm::TaskhelmConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_structured_logging("taskhelm-server");

    info!("🚀 Starting Taskhelm Server...");
    info!("   Version: {}", env!("CARGO_PKG_VERSION"));
    info!(
        "   Build Mode: {}",
        if cfg!(debug_assertions) {
            "Debug"
        } else {
            "Release"
        }
    );

    let config = TaskhelmConfig::from_env()?;

    let database = Database::connect(&config.database).await?;
    database.migrate().await?;

    let broker = Arc::new(Broker::connect(&config.broker).await?);
    let dispatcher = TaskDispatcher::new(broker.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let reconciler =
        ReportReconciler::new(broker.clone(), database.pool().clone(), shutdown_rx);
    let reconciler_handle = tokio::spawn(reconciler.run());

    let state = AppState::new(database.pool().clone(), dispatcher);
    let app = web::create_app(state);

    let listener = tokio::net::TcpListener::bind(config.server.bind_address).await?;
    info!(
        bind_address = %config.server.bind_address,
        "🎉 Taskhelm Server started, press Ctrl+C to shutdown gracefully"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("🛑 Shutdown signal received, initiating graceful shutdown...");

    // Stop the reconciler after the API so in-flight requests still resolve
    let _ = shutdown_tx.send(true);
    match reconciler_handle.await {
        Ok(Ok(())) => info!("✅ Reconciler stopped"),
        Ok(Err(e)) => error!("Reconciler exited with error: {e}"),
        Err(e) => error!("Reconciler task failed: {e}"),
    }

    if let Err(e) = broker.close().await {
        error!("Failed to close broker connection cleanly: {e}");
    }
    database.close().await;

    info!("👋 Taskhelm Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received SIGTERM");
        },
    }
}
