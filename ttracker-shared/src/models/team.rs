/// Team model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teams (
///     id INTEGER PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
///     name VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     admin_id INTEGER NOT NULL REFERENCES users(id)
/// );
/// ```

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Team with a single administrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i32,
    pub name: String,
    pub description: String,
    /// Internal ID of the administrating user
    pub admin_id: i32,
}

/// Team creation payload
///
/// Validated before anything touches storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TeamRequest {
    #[validate(length(min = 1, max = 255, message = "Team name must be 1-255 characters"))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[validate(range(min = 1, message = "Team admin must reference a user"))]
    pub admin_id: i32,
}
