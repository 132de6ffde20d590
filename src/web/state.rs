//! Shared state for task API handlers.

use sqlx::PgPool;

use crate::messaging::TaskDispatcher;

/// State injected into every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pool: PgPool,
    dispatcher: TaskDispatcher,
}

impl AppState {
    pub fn new(pool: PgPool, dispatcher: TaskDispatcher) -> Self {
        Self { pool, dispatcher }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn dispatcher(&self) -> &TaskDispatcher {
        &self.dispatcher
    }
}
