//! # Task Model
//!
//! The durable task record. Rows are created by the dispatcher side and
//! mutated only by the reconciler applying worker reports; workers never
//! touch this table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor, PgPool, Type};
use std::fmt;
use uuid::Uuid;

use crate::constants::progress;

/// Persisted lifecycle status of a task
///
/// Stored as TEXT and carried on the wire in SCREAMING_SNAKE_CASE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Created but not yet picked up by a worker
    #[sqlx(rename = "PENDING")]
    Pending,
    /// A worker is executing the task
    #[sqlx(rename = "IN_PROGRESS")]
    InProgress,
    /// Execution suspended by an operator
    #[sqlx(rename = "PAUSED")]
    Paused,
    /// Finished successfully
    #[sqlx(rename = "DONE")]
    Done,
    /// Finished with a failure
    #[sqlx(rename = "ERROR")]
    Error,
    /// Stopped by an operator
    #[sqlx(rename = "CANCELLED")]
    Cancelled,
}

impl TaskStatus {
    /// Check if this is a terminal status (no further transitions expected)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error | Self::Cancelled)
    }

    /// String form as persisted and as carried on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Paused => "PAUSED",
            Self::Done => "DONE",
            Self::Error => "ERROR",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "PAUSED" => Ok(Self::Paused),
            "DONE" => Ok(Self::Done),
            "ERROR" => Ok(Self::Error),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(format!("Invalid task status: {s}")),
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// A durable task record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub status: TaskStatus,
    pub progress: i32,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Insert a new PENDING task with a fresh id
    pub async fn create(pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO tasks (id, status, progress)
            VALUES ($1, $2, $3)
            RETURNING id, status, progress, error, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(TaskStatus::Pending)
        .bind(progress::INITIAL)
        .fetch_one(pool)
        .await
    }

    /// Look up a task by id
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, status, progress, error, created_at, updated_at FROM tasks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Page through tasks, newest first
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT id, status, progress, error, created_at, updated_at
            FROM tasks
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Total number of task rows
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks")
            .fetch_one(pool)
            .await
    }

    /// Delete a task, returning the deleted row; log entries cascade
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            DELETE FROM tasks
            WHERE id = $1
            RETURNING id, status, progress, error, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Set status, stamping `updated_at` with the report's event time
    pub async fn update_status(
        executor: impl PgExecutor<'_>,
        id: Uuid,
        status: TaskStatus,
        event_time: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE tasks SET status = $1, updated_at = $2 WHERE id = $3")
            .bind(status)
            .bind(event_time)
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Set status and progress together (PROGRESS reports)
    pub async fn update_progress(
        executor: impl PgExecutor<'_>,
        id: Uuid,
        status: TaskStatus,
        progress: i32,
        event_time: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE tasks SET status = $1, progress = $2, updated_at = $3 WHERE id = $4",
        )
        .bind(status)
        .bind(progress)
        .bind(event_time)
        .bind(id)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Set status and the failure message (ERROR reports)
    pub async fn update_error(
        executor: impl PgExecutor<'_>,
        id: Uuid,
        status: TaskStatus,
        error: &str,
        event_time: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE tasks SET status = $1, error = $2, updated_at = $3 WHERE id = $4")
            .bind(status)
            .bind(error)
            .bind(event_time)
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Reset progress to its initial value (RESTARTED reports); status is
    /// left untouched for the STARTED report that follows
    pub async fn reset_progress(
        executor: impl PgExecutor<'_>,
        id: Uuid,
        event_time: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE tasks SET progress = $1, updated_at = $2 WHERE id = $3")
            .bind(progress::INITIAL)
            .bind(event_time)
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_terminal_check() {
        assert!(TaskStatus::Done.is_terminal());
        assert!(TaskStatus::Error.is_terminal());
        assert!(TaskStatus::Cancelled.is_terminal());
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::InProgress.is_terminal());
        assert!(!TaskStatus::Paused.is_terminal());
    }

    #[test]
    fn test_status_string_conversion() {
        assert_eq!(TaskStatus::InProgress.to_string(), "IN_PROGRESS");
        assert_eq!("DONE".parse::<TaskStatus>().unwrap(), TaskStatus::Done);
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_status_serde() {
        let status = TaskStatus::InProgress;
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");

        let parsed: TaskStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, status);
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task {
            id: Uuid::new_v4(),
            status: TaskStatus::Pending,
            progress: 0,
            error: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(&task).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert_eq!(value["status"], "PENDING");
    }
}
