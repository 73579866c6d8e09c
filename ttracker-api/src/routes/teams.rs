/// Team endpoints
///
/// # Endpoints
///
/// - `POST /teams` - Create a team
/// - `GET /teams/:team_id` - Get a team

use crate::{app::AppState, error::ApiResult, extract::{ApiJson, ApiPath}};
use axum::{extract::State, Json};
use ttracker_shared::models::{Team, TeamRequest};

/// Create a team
///
/// # Request
///
/// ```json
/// { "name": "Platform", "description": "Infra folks", "adminId": 3 }
/// ```
///
/// An empty name or zero `adminId` is rejected with 400 and per-field
/// `details`; an `adminId` that matches no user is also a 400.
pub async fn create_team(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TeamRequest>,
) -> ApiResult<Json<Team>> {
    let team = state.teams.create(req).await?;
    Ok(Json(team))
}

/// Get a team
pub async fn get_team(
    State(state): State<AppState>,
    ApiPath(team_id): ApiPath<i32>,
) -> ApiResult<Json<Team>> {
    let team = state.teams.get(team_id).await?;
    Ok(Json(team))
}
