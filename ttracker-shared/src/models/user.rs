/// User model
///
/// A user is the local anchor for an identity issued by the external
/// identity provider. Rows are created lazily by the authentication layer the
/// first time a subject presents a valid access token, and are never deleted
/// through the API.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id INTEGER PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
///     cognito_id VARCHAR(255) NOT NULL UNIQUE,
///     username VARCHAR(255),
///     email VARCHAR(255),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account keyed by external identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Internal user ID
    pub id: i32,

    /// Subject claim of the identity provider (unique, immutable)
    pub cognito_id: String,

    /// Username claim, when the token carried one
    pub username: Option<String>,

    /// Email claim, when the token carried one
    pub email: Option<String>,

    /// When the user row was provisioned
    pub created_at: DateTime<Utc>,
}

/// Input for provisioning a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUser {
    /// External identity (token subject)
    pub cognito_id: String,

    /// Optional username
    pub username: Option<String>,

    /// Optional email address
    pub email: Option<String>,
}

impl CreateUser {
    /// Creates input for an identity with no profile claims
    pub fn for_identity(cognito_id: impl Into<String>) -> Self {
        Self {
            cognito_id: cognito_id.into(),
            username: None,
            email: None,
        }
    }
}
