//! # Task Handlers
//!
//! The operator-facing task API: creation, listing, stats, log history,
//! deletion, and the four control commands. Control endpoints validate the
//! persisted status before publishing, so an operator gets a 400 instead
//! of a command that would evaporate at the exchange anyway.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::constants::priority;
use crate::messaging::Command;
use crate::models::{NewTaskLog, Task, TaskLog, TaskStats, TaskStatus};
use crate::web::response_types::{ApiError, ApiResult, MessageResponse};
use crate::web::state::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTaskRequest {
    pub priority: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskResponse {
    pub task_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListTasksQuery {
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskListResponse {
    pub total: i64,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatsQuery {
    pub from: i64,
    pub to: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskLogsResponse {
    pub logs: Vec<TaskLog>,
}

/// POST /task/create
///
/// Creates a PENDING task, appends its creation log entry, and dispatches
/// it to the worker pool at the requested priority.
pub async fn create_task(
    State(state): State<AppState>,
    body: Option<Json<CreateTaskRequest>>,
) -> ApiResult<Json<CreateTaskResponse>> {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    let requested = request.priority.unwrap_or(priority::DEFAULT as i64);
    if !(priority::MIN as i64..=priority::MAX as i64).contains(&requested) {
        return Err(ApiError::bad_request(format!(
            "Priority must be between {} and {}",
            priority::MIN,
            priority::MAX
        )));
    }
    let task_priority = requested as u8;

    let task = Task::create(state.pool()).await?;
    TaskLog::create(
        state.pool(),
        NewTaskLog::new(
            task.id,
            TaskStatus::Pending,
            "Task has been created",
            task.created_at,
        ),
    )
    .await?;

    state.dispatcher().submit(task.id, task_priority).await?;

    info!(task_id = %task.id, priority = task_priority, "🌐 API: Task created");
    Ok(Json(CreateTaskResponse { task_id: task.id }))
}

/// GET /task/all?limit=&offset=
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<TaskListResponse>> {
    if query.limit < 0 || query.offset < 0 {
        return Err(ApiError::bad_request("Invalid pagination parameters"));
    }

    let total = Task::count(state.pool()).await?;
    let tasks = Task::list(state.pool(), query.limit, query.offset).await?;

    Ok(Json(TaskListResponse { total, tasks }))
}

/// GET /task/stats?from=&to=
///
/// Window bounds are epoch milliseconds on task creation time.
pub async fn task_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> ApiResult<Json<TaskStats>> {
    let from = DateTime::from_timestamp_millis(query.from)
        .ok_or_else(|| ApiError::bad_request("Invalid time window"))?;
    let to = DateTime::from_timestamp_millis(query.to)
        .ok_or_else(|| ApiError::bad_request("Invalid time window"))?;

    let stats = TaskStats::for_window(state.pool(), from, to).await?;
    Ok(Json(stats))
}

/// GET /task/{id}
///
/// Full log history for a task, oldest first.
pub async fn task_logs(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskLogsResponse>> {
    let logs = TaskLog::for_task(state.pool(), id).await?;
    if logs.is_empty() {
        return Err(ApiError::not_found("No logs for task has been found"));
    }
    Ok(Json(TaskLogsResponse { logs }))
}

/// DELETE /task/{id}
///
/// Removes the task and its log entries; a task still running is cancelled
/// on its worker so the execution does not keep ticking for a deleted row.
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let Some(task) = Task::delete(state.pool(), id).await? else {
        return Err(ApiError::not_found("Task not found"));
    };

    if !task.status.is_terminal() {
        state
            .dispatcher()
            .send_command(id, Command::CancelTask)
            .await?;
    }

    info!(task_id = %id, status = %task.status, "🌐 API: Task deleted");
    Ok(Json(MessageResponse::new("Task deleted")))
}

/// POST /task/{id}/cancel
pub async fn cancel_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let task = find_task(&state, id).await?;
    if task.status.is_terminal() {
        return Err(ApiError::bad_request(
            "Task is already completed and cannot be cancelled",
        ));
    }

    state
        .dispatcher()
        .send_command(id, Command::CancelTask)
        .await?;
    Ok(Json(MessageResponse::new("Task cancellation command sent")))
}

/// POST /task/{id}/pause
pub async fn pause_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let task = find_task(&state, id).await?;
    if task.status != TaskStatus::InProgress {
        return Err(ApiError::bad_request(
            "Task is not in progress and cannot be stopped",
        ));
    }

    state
        .dispatcher()
        .send_command(id, Command::PauseTask)
        .await?;
    Ok(Json(MessageResponse::new("Task pause command sent")))
}

/// POST /task/{id}/resume
pub async fn resume_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let task = find_task(&state, id).await?;
    if task.status != TaskStatus::Paused {
        return Err(ApiError::bad_request("Task is not paused"));
    }

    state
        .dispatcher()
        .send_command(id, Command::ResumeTask)
        .await?;
    Ok(Json(MessageResponse::new("Task resume command sent")))
}

/// POST /task/{id}/restart
///
/// Restart only makes sense while a worker owns the task; anything not
/// in progress or paused has no execution to restart.
pub async fn restart_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let task = find_task(&state, id).await?;
    if !matches!(task.status, TaskStatus::InProgress | TaskStatus::Paused) {
        return Err(ApiError::bad_request("Task cannot be restarted"));
    }

    state
        .dispatcher()
        .send_command(id, Command::RestartTask)
        .await?;
    Ok(Json(MessageResponse::new("Task restart command sent")))
}

async fn find_task(state: &AppState, id: Uuid) -> ApiResult<Task> {
    Task::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    #[test]
    fn test_create_response_wire_shape() {
        let task_id = Uuid::new_v4();
        let json = serde_json::to_value(CreateTaskResponse { task_id }).unwrap();
        assert_eq!(json["taskId"], task_id.to_string());
    }

    #[test]
    fn test_list_query_parses_from_uri() {
        let uri: Uri = "/task/all?limit=20&offset=40".parse().unwrap();
        let Query(query) = Query::<ListTasksQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(query.limit, 20);
        assert_eq!(query.offset, 40);
    }

    #[test]
    fn test_list_query_requires_both_parameters() {
        let uri: Uri = "/task/all?limit=20".parse().unwrap();
        assert!(Query::<ListTasksQuery>::try_from_uri(&uri).is_err());
    }

    #[test]
    fn test_stats_query_parses_epoch_millis() {
        let uri: Uri = "/task/stats?from=1700000000000&to=1700003600000"
            .parse()
            .unwrap();
        let Query(query) = Query::<StatsQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(query.from, 1_700_000_000_000);
        assert_eq!(query.to, 1_700_003_600_000);
    }
}
