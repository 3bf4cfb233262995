//! HTTP ingress layer
//!
//! Thin axum routing over [`TaskService`]; all task semantics live in the
//! core. Errors are reported as a small JSON body with a matching status
//! code.

use crate::service::{ResultLookup, TaskService};
use crate::task::{ParamMap, TaskStatus};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::error;

/// Submission request body
#[derive(Debug, Deserialize)]
pub struct TaskRequest {
    /// Task-type name
    #[serde(rename = "type")]
    pub task_type: String,

    /// Handler parameters
    #[serde(default)]
    pub params: ParamMap,
}

/// Identifier/status pair returned by submission and status queries
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: String,
    pub status: TaskStatus,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(code: StatusCode, message: &str) -> Response {
    (
        code,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Build the API router over the given service
pub fn router(service: TaskService) -> Router {
    Router::new()
        .route("/api/v1/tasks", post(create_task))
        .route("/api/v1/tasks/{task_id}", get(get_task_status))
        .route("/api/v1/tasks/{task_id}/result", get(get_task_result))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn create_task(
    State(service): State<TaskService>,
    Json(req): Json<TaskRequest>,
) -> Response {
    match service.submit(req.task_type, req.params).await {
        Ok(id) => (
            StatusCode::ACCEPTED,
            Json(TaskResponse {
                id,
                status: TaskStatus::Pending,
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to queue task: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to queue task")
        }
    }
}

async fn get_task_status(
    State(service): State<TaskService>,
    Path(task_id): Path<String>,
) -> Response {
    match service.status(&task_id).await {
        Some(status) => Json(TaskResponse {
            id: task_id,
            status,
        })
        .into_response(),
        None => error_response(StatusCode::NOT_FOUND, "Task not found"),
    }
}

async fn get_task_result(
    State(service): State<TaskService>,
    Path(task_id): Path<String>,
) -> Response {
    match service.result(&task_id).await {
        ResultLookup::Ready(record) => Json(record).into_response(),
        ResultLookup::NotReady(_) => {
            error_response(StatusCode::PRECONDITION_FAILED, "Task is not completed yet")
        }
        ResultLookup::NotFound => error_response(StatusCode::NOT_FOUND, "Task not found"),
    }
}
