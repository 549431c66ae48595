use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use stockroom_core::Caller;

use crate::dto::{CreateTaskRequest, TaskResponse, UpdateTaskRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_tasks_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let tasks = state
        .task_service
        .list()
        .await?
        .into_iter()
        .map(TaskResponse::from)
        .collect();

    Ok(Json(tasks))
}

pub async fn create_task_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(payload): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let task = state
        .task_service
        .create(&caller, payload.task.as_str())
        .await?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

pub async fn update_task_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(task_id): Path<i64>,
    Json(payload): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let task = state
        .task_service
        .update(&caller, task_id, payload.into())
        .await?;

    Ok(Json(TaskResponse::from(task)))
}

pub async fn delete_task_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(task_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.task_service.delete(&caller, task_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
