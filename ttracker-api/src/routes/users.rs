/// User endpoints
///
/// Users are provisioned by the authentication middleware on first request,
/// so there is nothing for this endpoint to do yet.

use crate::error::{ApiError, ApiResult};
use axum::Json;
use ttracker_shared::models::User;

/// Create a user (not implemented)
pub async fn create_user() -> ApiResult<Json<User>> {
    Err(ApiError::NotImplemented(
        "User creation is not implemented".to_string(),
    ))
}
