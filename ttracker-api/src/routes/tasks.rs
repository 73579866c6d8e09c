/// Task endpoints
///
/// Tasks are addressed through their parent project and inherit its owner.
///
/// # Endpoints
///
/// - `GET /projects/:project_id/tasks` - List tasks
/// - `POST /projects/:project_id/tasks` - Create a task
/// - `GET /projects/:project_id/tasks/:task_id` - Get a task
/// - `PUT /projects/:project_id/tasks/:task_id` - Replace a task's fields
/// - `DELETE /projects/:project_id/tasks/:task_id` - Delete a task

use crate::{
    app::AppState,
    error::{ApiResult, MessageResponse},
    extract::{ApiJson, ApiPath},
};
use axum::{extract::State, Extension, Json};
use ttracker_shared::{
    auth::AuthContext,
    models::{Task, TaskRequest},
};

/// List the tasks of a project
///
/// An unknown or foreign project yields an empty list.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(project_id): ApiPath<i32>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state.tasks.list(project_id, &auth.cognito_id).await?;
    Ok(Json(tasks))
}

/// Get a task
///
/// Responds with `null` when the task is missing or its project is not the
/// caller's.
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath((project_id, task_id)): ApiPath<(i32, i32)>,
) -> ApiResult<Json<Option<Task>>> {
    let task = state
        .tasks
        .get(project_id, task_id, &auth.cognito_id)
        .await?;
    Ok(Json(task))
}

/// Create a task
///
/// # Request
///
/// ```json
/// { "title": "Write outline", "status": "in progress" }
/// ```
///
/// Status matching ignores case, spaces, `-` and `_`; anything unrecognized
/// is stored as `Pending`.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(project_id): ApiPath<i32>,
    ApiJson(req): ApiJson<TaskRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .tasks
        .create(project_id, &auth.cognito_id, req)
        .await?;
    Ok(Json(MessageResponse::ok("Task created successfully")))
}

/// Update a task
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath((project_id, task_id)): ApiPath<(i32, i32)>,
    ApiJson(req): ApiJson<TaskRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .tasks
        .update(project_id, task_id, &auth.cognito_id, req)
        .await?;

    Ok(Json(MessageResponse::ok(format!(
        "Task with id {} updated successfully",
        task_id
    ))))
}

/// Delete a task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath((project_id, task_id)): ApiPath<(i32, i32)>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .tasks
        .delete(project_id, task_id, &auth.cognito_id)
        .await?;

    Ok(Json(MessageResponse::ok(format!(
        "Task with id {} deleted successfully",
        task_id
    ))))
}
