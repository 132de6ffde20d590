//! # Stats Rollup
//!
//! Read-side aggregation over a creation-time window. One grouped query
//! pulls per-task activity bounds, then a pure summarizer folds them into
//! counters and durations so the arithmetic is testable without a database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use super::task::TaskStatus;

/// Aggregated task counters and durations for a time window
///
/// Durations are in seconds. Duration accounting covers tasks that reached
/// DONE, ERROR, or CANCELLED; the average divides by the DONE count alone
/// and falls back to zero when there is nothing to divide by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStats {
    pub pending: i64,
    pub in_progress: i64,
    pub successful: i64,
    pub failed: i64,
    pub total: i64,
    pub average_duration: f64,
    pub max_duration: f64,
}

/// Per-task activity bounds within a window
///
/// `first_event` and `last_event` are NULL for tasks without log entries.
#[derive(Debug, Clone, FromRow)]
pub struct TaskActivityRow {
    pub status: TaskStatus,
    pub first_event: Option<DateTime<Utc>>,
    pub last_event: Option<DateTime<Utc>>,
}

impl TaskStats {
    /// Roll up stats for tasks created within `[from, to]` (inclusive)
    ///
    /// The window selects tasks by creation time; duration bounds come from
    /// each selected task's full log history, not just entries inside the
    /// window.
    pub async fn for_window(
        pool: &PgPool,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        let rows = sqlx::query_as::<_, TaskActivityRow>(
            r#"
            SELECT t.status,
                   MIN(l.created_at) AS first_event,
                   MAX(l.created_at) AS last_event
            FROM tasks t
            LEFT JOIN task_logs l ON l.task_id = t.id
            WHERE t.created_at >= $1 AND t.created_at <= $2
            GROUP BY t.id, t.status
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

        Ok(summarize(&rows))
    }
}

impl TaskActivityRow {
    /// Elapsed seconds between the task's first and last log entry
    fn duration_seconds(&self) -> Option<f64> {
        match (self.first_event, self.last_event) {
            (Some(first), Some(last)) => {
                Some((last - first).num_milliseconds() as f64 / 1000.0)
            }
            _ => None,
        }
    }
}

/// Fold per-task activity rows into window stats
pub fn summarize(rows: &[TaskActivityRow]) -> TaskStats {
    let mut stats = TaskStats {
        pending: 0,
        in_progress: 0,
        successful: 0,
        failed: 0,
        total: rows.len() as i64,
        average_duration: 0.0,
        max_duration: 0.0,
    };

    let mut total_durations = 0.0_f64;

    for row in rows {
        match row.status {
            TaskStatus::Pending => stats.pending += 1,
            TaskStatus::InProgress => stats.in_progress += 1,
            TaskStatus::Done => stats.successful += 1,
            TaskStatus::Error => stats.failed += 1,
            TaskStatus::Paused | TaskStatus::Cancelled => {}
        }

        // Duration accounting is limited to tasks that reached an end state
        if matches!(
            row.status,
            TaskStatus::Done | TaskStatus::Error | TaskStatus::Cancelled
        ) {
            if let Some(duration) = row.duration_seconds() {
                total_durations += duration;
                if duration > stats.max_duration {
                    stats.max_duration = duration;
                }
            }
        }
    }

    if stats.successful > 0 {
        stats.average_duration = total_durations / stats.successful as f64;
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn row(status: TaskStatus, duration_secs: Option<i64>) -> TaskActivityRow {
        let first = Utc::now();
        TaskActivityRow {
            status,
            first_event: duration_secs.map(|_| first),
            last_event: duration_secs.map(|secs| first + Duration::seconds(secs)),
        }
    }

    #[test]
    fn test_empty_window_is_all_zeros() {
        let stats = summarize(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.pending, 0);
        assert_eq!(stats.in_progress, 0);
        assert_eq!(stats.successful, 0);
        assert_eq!(stats.failed, 0);
        assert_eq!(stats.average_duration, 0.0);
        assert_eq!(stats.max_duration, 0.0);
    }

    #[test]
    fn test_counts_by_status() {
        let rows = vec![
            row(TaskStatus::Pending, None),
            row(TaskStatus::InProgress, Some(5)),
            row(TaskStatus::InProgress, Some(8)),
            row(TaskStatus::Done, Some(10)),
            row(TaskStatus::Error, Some(4)),
            row(TaskStatus::Cancelled, Some(2)),
        ];

        let stats = summarize(&rows);
        assert_eq!(stats.total, 6);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.in_progress, 2);
        assert_eq!(stats.successful, 1);
        assert_eq!(stats.failed, 1);
    }

    #[test]
    fn test_durations_cover_done_error_and_cancelled_only() {
        let rows = vec![
            // Active tasks never contribute to durations
            row(TaskStatus::InProgress, Some(100)),
            row(TaskStatus::Done, Some(10)),
            row(TaskStatus::Error, Some(20)),
            row(TaskStatus::Cancelled, Some(30)),
        ];

        let stats = summarize(&rows);
        assert_eq!(stats.max_duration, 30.0);
        // (10 + 20 + 30) seconds over one successful task
        assert_eq!(stats.average_duration, 60.0);
    }

    #[test]
    fn test_average_zero_without_successful_tasks() {
        let rows = vec![
            row(TaskStatus::Error, Some(15)),
            row(TaskStatus::Cancelled, Some(25)),
        ];

        let stats = summarize(&rows);
        assert_eq!(stats.successful, 0);
        assert_eq!(stats.average_duration, 0.0);
        assert_eq!(stats.max_duration, 25.0);
    }

    #[test]
    fn test_terminal_task_without_logs_is_counted_but_not_timed() {
        let rows = vec![row(TaskStatus::Done, None)];

        let stats = summarize(&rows);
        assert_eq!(stats.successful, 1);
        assert_eq!(stats.average_duration, 0.0);
        assert_eq!(stats.max_duration, 0.0);
    }
}
