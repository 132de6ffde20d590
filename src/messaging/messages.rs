//! # Wire Messages
//!
//! JSON message types exchanged over the broker. Tags and field names are
//! part of the wire contract shared with operators and dashboards, so they
//! stay SCREAMING_SNAKE_CASE for tags and camelCase for fields.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message placed on the work queue to hand a task to a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStartMessage {
    pub task_id: Uuid,
}

impl TaskStartMessage {
    pub fn new(task_id: Uuid) -> Self {
        Self { task_id }
    }
}

/// Operator control command routed to the worker owning a task
///
/// The target task id travels as the routing key, not in the body.
/// Unrecognized command tags deserialize to `Unknown` so a worker can
/// acknowledge and discard them instead of poisoning the control queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    CancelTask,
    PauseTask,
    ResumeTask,
    RestartTask,
    #[serde(other)]
    Unknown,
}

/// Lifecycle report emitted by a worker onto the report queue
///
/// Unrecognized report tags deserialize to `Unknown`; the reconciler treats
/// them as anomalies with no store mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Report {
    #[serde(rename_all = "camelCase")]
    Started { task_id: Uuid },
    #[serde(rename_all = "camelCase")]
    Progress { task_id: Uuid, progress: i32 },
    #[serde(rename_all = "camelCase")]
    Paused { task_id: Uuid },
    #[serde(rename_all = "camelCase")]
    Resumed { task_id: Uuid },
    #[serde(rename_all = "camelCase")]
    Completed { task_id: Uuid },
    #[serde(rename_all = "camelCase")]
    Cancelled { task_id: Uuid },
    #[serde(rename_all = "camelCase")]
    Error { task_id: Uuid, error: String },
    #[serde(rename_all = "camelCase")]
    Restarted { task_id: Uuid },
    #[serde(other)]
    Unknown,
}

impl Report {
    pub fn started(task_id: Uuid) -> Self {
        Self::Started { task_id }
    }

    pub fn progress(task_id: Uuid, progress: i32) -> Self {
        Self::Progress { task_id, progress }
    }

    pub fn paused(task_id: Uuid) -> Self {
        Self::Paused { task_id }
    }

    pub fn resumed(task_id: Uuid) -> Self {
        Self::Resumed { task_id }
    }

    pub fn completed(task_id: Uuid) -> Self {
        Self::Completed { task_id }
    }

    pub fn cancelled(task_id: Uuid) -> Self {
        Self::Cancelled { task_id }
    }

    pub fn error(task_id: Uuid, error: impl Into<String>) -> Self {
        Self::Error {
            task_id,
            error: error.into(),
        }
    }

    pub fn restarted(task_id: Uuid) -> Self {
        Self::Restarted { task_id }
    }

    /// Task the report refers to, absent for unrecognized tags
    pub fn task_id(&self) -> Option<Uuid> {
        match self {
            Self::Started { task_id }
            | Self::Progress { task_id, .. }
            | Self::Paused { task_id }
            | Self::Resumed { task_id }
            | Self::Completed { task_id }
            | Self::Cancelled { task_id }
            | Self::Error { task_id, .. }
            | Self::Restarted { task_id } => Some(*task_id),
            Self::Unknown => None,
        }
    }

    /// Wire tag of this report, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Started { .. } => "STARTED",
            Self::Progress { .. } => "PROGRESS",
            Self::Paused { .. } => "PAUSED",
            Self::Resumed { .. } => "RESUMED",
            Self::Completed { .. } => "COMPLETED",
            Self::Cancelled { .. } => "CANCELLED",
            Self::Error { .. } => "ERROR",
            Self::Restarted { .. } => "RESTARTED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Whether this report ends the task's lifecycle on the worker
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed { .. } | Self::Cancelled { .. } | Self::Error { .. }
        )
    }
}

/// Current time as the epoch-millisecond transport timestamp
pub fn now_millis() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

/// Convert a transport timestamp back to an event time
///
/// Falls back to the current time for values outside chrono's range, so a
/// garbled timestamp degrades to receive time instead of dropping the report.
pub fn event_time_from_millis(timestamp_ms: u64) -> DateTime<Utc> {
    i64::try_from(timestamp_ms)
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_start_message_wire_shape() {
        let task_id = Uuid::new_v4();
        let json = serde_json::to_value(TaskStartMessage::new(task_id)).unwrap();
        assert_eq!(json["taskId"], task_id.to_string());

        let parsed: TaskStartMessage =
            serde_json::from_str(&format!("{{\"taskId\":\"{task_id}\"}}")).unwrap();
        assert_eq!(parsed.task_id, task_id);
    }

    #[test]
    fn test_command_wire_tags() {
        let json = serde_json::to_string(&Command::CancelTask).unwrap();
        assert_eq!(json, r#"{"type":"CANCEL_TASK"}"#);

        let parsed: Command = serde_json::from_str(r#"{"type":"PAUSE_TASK"}"#).unwrap();
        assert_eq!(parsed, Command::PauseTask);
    }

    #[test]
    fn test_unknown_command_tag_is_tolerated() {
        let parsed: Command = serde_json::from_str(r#"{"type":"DESTROY_TASK"}"#).unwrap();
        assert_eq!(parsed, Command::Unknown);
    }

    #[test]
    fn test_report_wire_shape() {
        let task_id = Uuid::new_v4();

        let json = serde_json::to_value(Report::progress(task_id, 40)).unwrap();
        assert_eq!(json["type"], "PROGRESS");
        assert_eq!(json["taskId"], task_id.to_string());
        assert_eq!(json["progress"], 40);

        let json = serde_json::to_value(Report::error(task_id, "boom")).unwrap();
        assert_eq!(json["type"], "ERROR");
        assert_eq!(json["error"], "boom");

        let json = serde_json::to_value(Report::started(task_id)).unwrap();
        assert_eq!(json["type"], "STARTED");
        assert!(json.get("progress").is_none());
    }

    #[test]
    fn test_report_round_trips_through_json() {
        let task_id = Uuid::new_v4();
        let report = Report::error(task_id, "Random task error occurred");

        let bytes = serde_json::to_vec(&report).unwrap();
        let parsed: Report = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, report);
        assert_eq!(parsed.task_id(), Some(task_id));
    }

    #[test]
    fn test_unknown_report_tag_is_tolerated() {
        let parsed: Report =
            serde_json::from_str(r#"{"type":"TELEMETRY","taskId":"not checked"}"#).unwrap();
        assert_eq!(parsed, Report::Unknown);
        assert_eq!(parsed.task_id(), None);
        assert_eq!(parsed.kind(), "UNKNOWN");
    }

    #[test]
    fn test_terminal_report_classification() {
        let task_id = Uuid::new_v4();
        assert!(Report::completed(task_id).is_terminal());
        assert!(Report::cancelled(task_id).is_terminal());
        assert!(Report::error(task_id, "x").is_terminal());
        assert!(!Report::started(task_id).is_terminal());
        assert!(!Report::progress(task_id, 50).is_terminal());
        assert!(!Report::restarted(task_id).is_terminal());
    }

    #[test]
    fn test_event_time_round_trip() {
        let millis = 1_700_000_000_000_u64;
        let event_time = event_time_from_millis(millis);
        assert_eq!(event_time.timestamp_millis() as u64, millis);
    }

    #[test]
    fn test_event_time_out_of_range_falls_back_to_now() {
        let before = Utc::now();

        // Larger than any i64 millisecond count; must not wrap into a
        // pre-epoch timestamp
        let event_time = event_time_from_millis(u64::MAX);
        assert!(event_time >= before);

        // Fits in i64 but lies beyond chrono's representable range
        let event_time = event_time_from_millis(i64::MAX as u64);
        assert!(event_time >= before);
    }
}
