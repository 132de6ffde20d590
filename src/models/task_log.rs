//! # Task Log Model
//!
//! Append-only audit trail of task lifecycle events. One row per applied
//! report (and one for creation), timestamped with the event time reported
//! by the worker rather than the wall clock at insert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor, PgPool};
use uuid::Uuid;

use super::task::TaskStatus;

/// A single task lifecycle event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaskLog {
    pub id: Uuid,
    pub task_id: Uuid,
    pub status: TaskStatus,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new log entry
#[derive(Debug, Clone)]
pub struct NewTaskLog {
    pub task_id: Uuid,
    pub status: TaskStatus,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl TaskLog {
    /// Append a log entry
    pub async fn create(
        executor: impl PgExecutor<'_>,
        entry: NewTaskLog,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO task_logs (id, task_id, status, message, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, task_id, status, message, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.task_id)
        .bind(entry.status)
        .bind(&entry.message)
        .bind(entry.created_at)
        .fetch_one(executor)
        .await
    }

    /// Full history for a task, oldest first
    pub async fn for_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT id, task_id, status, message, created_at
            FROM task_logs
            WHERE task_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await
    }
}

impl NewTaskLog {
    /// Build an entry stamped with the given event time
    pub fn new(
        task_id: Uuid,
        status: TaskStatus,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            task_id,
            status,
            message: message.into(),
            created_at,
        }
    }
}
