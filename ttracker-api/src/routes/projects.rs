/// Project endpoints
///
/// Every handler is scoped to the authenticated caller. A project owned by
/// someone else answers exactly like a project that does not exist.
///
/// # Endpoints
///
/// - `GET /projects` - List the caller's projects
/// - `POST /projects` - Create a project
/// - `GET /projects/:project_id` - Get a project
/// - `PUT /projects/:project_id` - Replace a project's fields
/// - `DELETE /projects/:project_id` - Delete a project and its tasks

use crate::{
    app::AppState,
    error::{ApiResult, MessageResponse},
    extract::{ApiJson, ApiPath},
};
use axum::{extract::State, Extension, Json};
use ttracker_shared::{
    auth::AuthContext,
    models::{Project, ProjectRequest},
};

/// List projects
///
/// # Response
///
/// ```json
/// [
///   {
///     "id": 1,
///     "userId": 3,
///     "title": "Roadmap",
///     "description": "Q3 plan",
///     "priority": "High",
///     "createdAt": "2025-01-03T12:00:00Z"
///   }
/// ]
/// ```
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = state.projects.list(&auth.cognito_id).await?;
    Ok(Json(projects))
}

/// Get a project
///
/// Responds with `null` when the project does not exist or is not the
/// caller's.
pub async fn get_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(project_id): ApiPath<i32>,
) -> ApiResult<Json<Option<Project>>> {
    let project = state.projects.get(project_id, &auth.cognito_id).await?;
    Ok(Json(project))
}

/// Create a project
///
/// # Request
///
/// ```json
/// { "title": "Roadmap", "description": "Q3 plan", "priority": "high" }
/// ```
///
/// Priority is matched case-insensitively; anything else is stored as `Low`.
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<ProjectRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state.projects.create(&auth.cognito_id, req).await?;
    Ok(Json(MessageResponse::ok("Project created successfully")))
}

/// Update a project
pub async fn update_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(project_id): ApiPath<i32>,
    ApiJson(req): ApiJson<ProjectRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .projects
        .update(project_id, &auth.cognito_id, req)
        .await?;

    Ok(Json(MessageResponse::ok(format!(
        "Project with id {} updated successfully",
        project_id
    ))))
}

/// Delete a project along with its tasks
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(project_id): ApiPath<i32>,
) -> ApiResult<Json<MessageResponse>> {
    state.projects.delete(project_id, &auth.cognito_id).await?;

    tracing::info!(
        project_id = project_id,
        cognito_id = %auth.cognito_id,
        "Project deleted"
    );

    Ok(Json(MessageResponse::ok(format!(
        "Project with id {} deleted successfully",
        project_id
    ))))
}
