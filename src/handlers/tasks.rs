//! # Task API Handlers
//!
//! CRUD endpoints for tasks. Every endpoint requires an identity; anonymous
//! callers get a sign-in prompt instead of data. All queries are scoped to
//! the calling user's rows.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::auth::RequireIdentity;
use crate::error::ApiError;
use crate::models::{TaskWithRelations, task::Model as TaskModel};
use crate::query::filter::{FilterParams, TaskFilter};
use crate::repositories::{CreateTaskRequest, TaskRepository, UpdateTaskRequest};
use crate::server::AppState;

/// List the caller's tasks, newest first, optionally filtered
#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    params(FilterParams),
    responses(
        (status = 200, description = "The caller's tasks, newest first", body = Vec<TaskWithRelations>),
        (status = 401, description = "Sign-in required", body = ApiError)
    ),
    tag = "tasks"
)]
pub async fn list_tasks(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<TaskWithRelations>>, ApiError> {
    let repo = TaskRepository::new(&state.db);
    let tasks = repo.list_tasks(identity.user_id).await?;
    let filter = TaskFilter::from_params(&params);
    Ok(Json(filter.apply(tasks)))
}

/// Get one of the caller's tasks
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task id")),
    responses(
        (status = 200, description = "The task", body = TaskWithRelations),
        (status = 401, description = "Sign-in required", body = ApiError),
        (status = 404, description = "Task not found", body = ApiError)
    ),
    tag = "tasks"
)]
pub async fn get_task(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskWithRelations>, ApiError> {
    let repo = TaskRepository::new(&state.db);
    let task = repo
        .get_task_by_id(identity.user_id, id)
        .await?
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Task not found"))?;
    Ok(Json(task))
}

/// Create a task owned by the caller
#[utoipa::path(
    post,
    path = "/api/v1/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Created task", body = TaskModel),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 401, description = "Sign-in required", body = ApiError)
    ),
    tag = "tasks"
)]
pub async fn create_task(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    Json(request): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskModel>), ApiError> {
    let repo = TaskRepository::new(&state.db);
    let task = repo.create_task(identity.user_id, request).await?;
    tracing::info!(task_id = %task.id, "Created task");
    Ok((StatusCode::CREATED, Json(task)))
}

/// Apply a partial update to one of the caller's tasks
#[utoipa::path(
    patch,
    path = "/api/v1/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task id")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Updated task", body = TaskModel),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 401, description = "Sign-in required", body = ApiError),
        (status = 404, description = "Task not found", body = ApiError)
    ),
    tag = "tasks"
)]
pub async fn update_task(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTaskRequest>,
) -> Result<Json<TaskModel>, ApiError> {
    let repo = TaskRepository::new(&state.db);
    Ok(Json(repo.update_task(identity.user_id, id, request).await?))
}

/// Delete one of the caller's tasks
#[utoipa::path(
    delete,
    path = "/api/v1/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task id")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 401, description = "Sign-in required", body = ApiError),
        (status = 404, description = "Task not found", body = ApiError)
    ),
    tag = "tasks"
)]
pub async fn delete_task(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = TaskRepository::new(&state.db);
    repo.delete_task(identity.user_id, id).await?;
    tracing::info!(task_id = %id, "Deleted task");
    Ok(StatusCode::NO_CONTENT)
}
