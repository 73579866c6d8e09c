/// Request authentication
///
/// [`Authenticator`] turns the value of an `Authorization` header into a
/// trusted [`AuthContext`]. It runs the hard gates in order and stops at the
/// first failure:
///
/// 1. `Bearer <token>` header present and well formed
/// 2. Provider key set available
/// 3. Token signature valid for its `kid`
/// 4. Token not expired
/// 5. Issuer matches
/// 6. `token_use` is `"access"`
/// 7. Local user exists, provisioned on first sight
///
/// The HTTP layer decides how each [`AuthError`] is reported.
///
/// # Example
///
/// ```no_run
/// use ttracker_shared::auth::Authenticator;
///
/// # async fn example(authenticator: Authenticator, header: Option<&str>) {
/// match authenticator.authenticate(header).await {
///     Ok(auth) => println!("Caller {}", auth.cognito_id),
///     Err(e) => eprintln!("Rejected: {}", e),
/// }
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use super::jwks::{JwksCache, JwksError};
use super::jwt::{self, Claims, JwtError};
use crate::models::CreateUser;
use crate::services::{ServiceError, UserService};

/// Verified caller identity attached to each authenticated request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Token subject, the caller's external identity
    pub cognito_id: String,

    /// Username claim, when present
    pub username: Option<String>,
}

impl AuthContext {
    /// Creates auth context from verified claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            cognito_id: claims.sub.clone(),
            username: claims.username.clone(),
        }
    }
}

/// Error type for authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Header present but not a usable bearer token
    #[error("Invalid authorization header: {0}")]
    InvalidFormat(String),

    /// Token failed verification
    #[error(transparent)]
    InvalidToken(#[from] JwtError),

    /// Key set could not be obtained
    #[error(transparent)]
    KeySet(#[from] JwksError),

    /// Local user lookup or creation failed
    #[error("Failed to provision user: {0}")]
    Provisioning(#[from] ServiceError),
}

impl AuthError {
    /// Whether the failure is the caller's fault rather than ours
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AuthError::MissingCredentials | AuthError::InvalidFormat(_) | AuthError::InvalidToken(_)
        )
    }
}

/// Extracts the token from an `Authorization` header value
pub fn bearer_token(header: &str) -> Result<&str, AuthError> {
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidFormat("Empty bearer token".to_string()));
    }

    Ok(token)
}

/// Verifies bearer tokens and provisions callers
#[derive(Clone)]
pub struct Authenticator {
    jwks: Arc<JwksCache>,
    issuer: String,
    users: UserService,
}

impl Authenticator {
    pub fn new(jwks: Arc<JwksCache>, issuer: impl Into<String>, users: UserService) -> Self {
        Self {
            jwks,
            issuer: issuer.into(),
            users,
        }
    }

    /// Authenticates a request from its `Authorization` header value
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<AuthContext, AuthError> {
        let header = authorization.ok_or(AuthError::MissingCredentials)?;
        let token = bearer_token(header)?;

        // Key set availability is checked before the token is inspected.
        self.jwks.get().await?;

        let kid = jwt::key_id(token)?;
        let jwk = self
            .jwks
            .get_key(&kid)
            .await?
            .ok_or_else(|| JwtError::UnknownKey(kid.clone()))?;

        let claims = jwt::verify_access_token(token, &jwk, &self.issuer).map_err(|e| {
            warn!(kid = %kid, error = %e, "Token rejected");
            e
        })?;

        self.ensure_user(&claims).await?;

        debug!(cognito_id = %claims.sub, "Request authenticated");
        Ok(AuthContext::from_claims(&claims))
    }

    async fn ensure_user(&self, claims: &Claims) -> Result<(), ServiceError> {
        if self.users.exists(&claims.sub).await? {
            return Ok(());
        }

        self.users
            .create(CreateUser {
                cognito_id: claims.sub.clone(),
                username: claims.username.clone(),
                email: claims.email.clone(),
            })
            .await
    }
}
