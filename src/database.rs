//! # Database Connection Management
//!
//! Pool construction, embedded migrations, and health checking for the task
//! record store. The pool is created once per process and injected into the
//! components that need it.

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::Result;

/// Owned handle to the Postgres connection pool
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to Postgres with the configured pool size
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;

        info!(
            max_connections = config.max_connections,
            "💾 DATABASE: Connection pool established"
        );

        Ok(Self { pool })
    }

    /// Apply embedded migrations (idempotent)
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("💾 DATABASE: Migrations applied");
        Ok(())
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Verify the database responds to a trivial query
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close all pool connections
    pub async fn close(&self) {
        self.pool.close().await;
        info!("💾 DATABASE: Connection pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn connect_from_env() -> Result<Database> {
        let config = DatabaseConfig::from_env();
        Database::connect(&config).await
    }

    #[tokio::test]
    #[ignore = "requires Postgres running"]
    async fn test_connect_and_health_check() {
        let db = connect_from_env().await.expect("connect");
        db.health_check().await.expect("health check");
        db.close().await;
    }

    #[tokio::test]
    #[ignore = "requires Postgres running"]
    async fn test_migrations_are_idempotent() {
        let db = connect_from_env().await.expect("connect");
        db.migrate().await.expect("first run");
        db.migrate().await.expect("second run");
        db.close().await;
    }
}
