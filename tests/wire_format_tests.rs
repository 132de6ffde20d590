//! Cross-process wire contract checks.
//!
//! The broker payloads and HTTP response bodies are consumed by dashboards
//! and scripts outside this crate, so these tests parse and emit raw JSON
//! fixtures exactly as the other side would, rather than round-tripping
//! through our own serializers.

use chrono::{TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;

use taskhelm::messaging::{Command, Report, TaskStartMessage};
use taskhelm::models::{Task, TaskLog, TaskStats, TaskStatus};

#[test]
fn all_command_tags_parse_from_raw_fixtures() {
    let fixtures = [
        (r#"{"type":"CANCEL_TASK"}"#, Command::CancelTask),
        (r#"{"type":"PAUSE_TASK"}"#, Command::PauseTask),
        (r#"{"type":"RESUME_TASK"}"#, Command::ResumeTask),
        (r#"{"type":"RESTART_TASK"}"#, Command::RestartTask),
    ];

    for (raw, expected) in fixtures {
        let parsed: Command = serde_json::from_str(raw).expect("command should parse");
        assert_eq!(parsed, expected, "fixture {raw}");
    }
}

#[test]
fn command_body_carries_only_the_tag() {
    // The target task id travels as the routing key, never in the body
    let value = serde_json::to_value(Command::RestartTask).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 1);
    assert_eq!(object["type"], "RESTART_TASK");
}

#[test]
fn report_fixtures_parse_with_extra_fields_ignored() {
    let task_id = Uuid::new_v4();
    let raw = format!(
        r#"{{"type":"PROGRESS","taskId":"{task_id}","progress":55,"workerId":"w-17"}}"#
    );

    let parsed: Report = serde_json::from_str(&raw).expect("report should parse");
    assert_eq!(parsed, Report::progress(task_id, 55));
}

#[test]
fn error_report_fixture_carries_the_failure_message() {
    let task_id = Uuid::new_v4();
    let raw = format!(
        r#"{{"type":"ERROR","taskId":"{task_id}","error":"Random task error occurred"}}"#
    );

    let parsed: Report = serde_json::from_str(&raw).expect("report should parse");
    assert_eq!(parsed, Report::error(task_id, "Random task error occurred"));
    assert!(parsed.is_terminal());
}

#[test]
fn unrecognized_report_tag_degrades_to_unknown() {
    let raw = r#"{"type":"HEARTBEAT","workerId":"w-17","load":0.4}"#;
    let parsed: Report = serde_json::from_str(raw).expect("tolerant parse");
    assert_eq!(parsed, Report::Unknown);
    assert_eq!(parsed.task_id(), None);
}

#[test]
fn task_start_message_matches_queue_payload() {
    let task_id = Uuid::new_v4();
    let raw = format!(r#"{{"taskId":"{task_id}"}}"#);

    let parsed: TaskStartMessage = serde_json::from_str(&raw).expect("parse");
    assert_eq!(parsed.task_id, task_id);
    assert_eq!(serde_json::to_value(parsed).unwrap(), json!({ "taskId": task_id }));
}

#[test]
fn task_row_exposes_camel_case_response_fields() {
    let created = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let task = Task {
        id: Uuid::new_v4(),
        status: TaskStatus::InProgress,
        progress: 40,
        error: None,
        created_at: created,
        updated_at: created,
    };

    let value = serde_json::to_value(&task).unwrap();
    let object = value.as_object().unwrap();
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec!["createdAt", "error", "id", "progress", "status", "updatedAt"]
    );
    assert_eq!(value["status"], "IN_PROGRESS");
    // A task with no failure still carries the field, as null
    assert!(value["error"].is_null());
}

#[test]
fn task_log_exposes_camel_case_response_fields() {
    let log = TaskLog {
        id: Uuid::new_v4(),
        task_id: Uuid::new_v4(),
        status: TaskStatus::Error,
        message: "Task has failed: Random task error occurred".to_string(),
        created_at: Utc::now(),
    };

    let value = serde_json::to_value(&log).unwrap();
    assert_eq!(value["taskId"], log.task_id.to_string());
    assert_eq!(value["status"], "ERROR");
    assert!(value.get("createdAt").is_some());
}

#[test]
fn stats_response_uses_snake_case_fields() {
    let stats = TaskStats {
        pending: 1,
        in_progress: 2,
        successful: 3,
        failed: 1,
        total: 8,
        average_duration: 12.5,
        max_duration: 30.0,
    };

    let value = serde_json::to_value(&stats).unwrap();
    let object = value.as_object().unwrap();
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "average_duration",
            "failed",
            "in_progress",
            "max_duration",
            "pending",
            "successful",
            "total",
        ]
    );
}
