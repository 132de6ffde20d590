//! # Report Reconciler
//!
//! Consumes worker lifecycle reports and folds them into the task store:
//! one report, one transaction, one appended log entry. Planning what a
//! report does to the store is a pure function over (current status,
//! report), so the whole mapping is testable without a database.
//!
//! Event time comes from the transport timestamp on the delivery, not the
//! local clock, which keeps duration rollups honest under delivery delay.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use lapin::{
    message::Delivery,
    options::{BasicAckOptions, BasicConsumeOptions, BasicQosOptions},
    types::FieldTable,
};
use sqlx::PgPool;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::messaging::{event_time_from_millis, Broker, MessagingError, MessagingResult, Report};
use crate::models::{NewTaskLog, Task, TaskLog, TaskStatus};

/// Store mutation a report translates to
#[derive(Debug, Clone, PartialEq)]
pub enum TaskUpdate {
    /// Set the status
    Status(TaskStatus),
    /// Set status and progress together
    StatusWithProgress(TaskStatus, i32),
    /// Set status and the failure message
    StatusWithError(TaskStatus, String),
    /// Reset progress to zero, leaving status for the STARTED that follows
    ProgressReset,
}

/// Planned effect of applying one report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportMutation {
    pub update: TaskUpdate,
    pub log_status: TaskStatus,
    pub log_message: String,
}

/// Translate a report into its store mutation
///
/// `current_status` is the task's persisted status before this report; it
/// only matters for RESTARTED, whose log entry carries the unchanged
/// status. Unknown report tags plan nothing.
pub fn mutation_for(current_status: TaskStatus, report: &Report) -> Option<ReportMutation> {
    let mutation = match report {
        Report::Started { .. } => ReportMutation {
            update: TaskUpdate::Status(TaskStatus::InProgress),
            log_status: TaskStatus::InProgress,
            log_message: "Task has started".to_string(),
        },
        Report::Progress { progress, .. } => ReportMutation {
            update: TaskUpdate::StatusWithProgress(TaskStatus::InProgress, *progress),
            log_status: TaskStatus::InProgress,
            log_message: format!("Task progress: {progress}%"),
        },
        Report::Paused { .. } => ReportMutation {
            update: TaskUpdate::Status(TaskStatus::Paused),
            log_status: TaskStatus::Paused,
            log_message: "Task has been paused".to_string(),
        },
        Report::Resumed { .. } => ReportMutation {
            update: TaskUpdate::Status(TaskStatus::InProgress),
            log_status: TaskStatus::InProgress,
            log_message: "Task has been resumed".to_string(),
        },
        Report::Completed { .. } => ReportMutation {
            update: TaskUpdate::Status(TaskStatus::Done),
            log_status: TaskStatus::Done,
            log_message: "Task has completed".to_string(),
        },
        Report::Cancelled { .. } => ReportMutation {
            update: TaskUpdate::Status(TaskStatus::Cancelled),
            log_status: TaskStatus::Cancelled,
            log_message: "Task has been cancelled".to_string(),
        },
        Report::Error { error, .. } => ReportMutation {
            update: TaskUpdate::StatusWithError(TaskStatus::Error, error.clone()),
            log_status: TaskStatus::Error,
            log_message: format!("Task has failed: {error}"),
        },
        Report::Restarted { .. } => ReportMutation {
            update: TaskUpdate::ProgressReset,
            log_status: current_status,
            log_message: "Task has been restarted".to_string(),
        },
        Report::Unknown => return None,
    };
    Some(mutation)
}

/// Consumer loop applying reports to the task store
pub struct ReportReconciler {
    broker: Arc<Broker>,
    pool: PgPool,
    shutdown: watch::Receiver<bool>,
}

impl ReportReconciler {
    pub fn new(broker: Arc<Broker>, pool: PgPool, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            broker,
            pool,
            shutdown,
        }
    }

    /// Consume the report queue until shutdown
    pub async fn run(mut self) -> MessagingResult<()> {
        let report_queue = self.broker.config().report_queue.clone();

        let channel = self.broker.create_channel().await?;
        channel
            .basic_qos(1, BasicQosOptions::default())
            .await
            .map_err(|e| MessagingError::channel(format!("failed to set QoS: {e}")))?;

        let mut consumer = channel
            .basic_consume(
                &report_queue,
                "taskhelm-reconciler",
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await
            .map_err(|e| MessagingError::consume(&report_queue, e.to_string()))?;

        info!(queue = %report_queue, "💾 RECONCILER: Listening for reports");

        loop {
            tokio::select! {
                delivery = consumer.next() => {
                    match delivery {
                        Some(Ok(delivery)) => self.handle_delivery(delivery, &report_queue).await?,
                        Some(Err(e)) => {
                            warn!(error = %e, "⚠️ RECONCILER: Report delivery error");
                        }
                        None => break,
                    }
                }
                _ = self.shutdown.changed() => break,
            }
        }

        info!("👋 RECONCILER: Stopped consuming reports");
        Ok(())
    }

    /// Apply one delivery, then acknowledge it
    ///
    /// Reports that cannot be applied (malformed body, unknown tag, absent
    /// task, storage failure) are logged and acknowledged anyway; requeuing
    /// them would poison the queue without making them applicable.
    async fn handle_delivery(
        &self,
        delivery: Delivery,
        report_queue: &str,
    ) -> MessagingResult<()> {
        match serde_json::from_slice::<Report>(&delivery.data) {
            Ok(report) => {
                let event_time = delivery
                    .properties
                    .timestamp()
                    .map(event_time_from_millis)
                    .unwrap_or_else(Utc::now);

                match Self::apply_report(&self.pool, &report, event_time).await {
                    Ok(true) => {
                        debug!(
                            report = report.kind(),
                            task_id = ?report.task_id(),
                            "💾 RECONCILER: Report applied"
                        );
                    }
                    Ok(false) => {
                        debug!(
                            report = report.kind(),
                            task_id = ?report.task_id(),
                            "💾 RECONCILER: Report had no matching task"
                        );
                    }
                    Err(e) => {
                        warn!(
                            report = report.kind(),
                            task_id = ?report.task_id(),
                            error = %e,
                            "⚠️ RECONCILER: Report application failed"
                        );
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "⚠️ RECONCILER: Malformed report dropped");
            }
        }

        delivery
            .ack(BasicAckOptions::default())
            .await
            .map_err(|e| MessagingError::consume(report_queue, format!("ack failed: {e}")))
    }

    /// Apply a report to the store in a single transaction
    ///
    /// Returns `false` when nothing was applied: an unknown tag, or a task
    /// id absent from the store.
    pub async fn apply_report(
        pool: &PgPool,
        report: &Report,
        event_time: DateTime<Utc>,
    ) -> MessagingResult<bool> {
        let Some(task_id) = report.task_id() else {
            warn!("⚠️ RECONCILER: Report with unknown tag ignored");
            return Ok(false);
        };

        let mut tx = pool.begin().await?;

        let Some(task) = Task::find_by_id(&mut *tx, task_id).await? else {
            return Ok(false);
        };

        let Some(mutation) = mutation_for(task.status, report) else {
            return Ok(false);
        };

        match &mutation.update {
            TaskUpdate::Status(status) => {
                Task::update_status(&mut *tx, task_id, *status, event_time).await?;
            }
            TaskUpdate::StatusWithProgress(status, progress) => {
                Task::update_progress(&mut *tx, task_id, *status, *progress, event_time).await?;
            }
            TaskUpdate::StatusWithError(status, error) => {
                Task::update_error(&mut *tx, task_id, *status, error, event_time).await?;
            }
            TaskUpdate::ProgressReset => {
                Task::reset_progress(&mut *tx, task_id, event_time).await?;
            }
        }

        TaskLog::create(
            &mut *tx,
            NewTaskLog::new(task_id, mutation.log_status, mutation.log_message, event_time),
        )
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}
