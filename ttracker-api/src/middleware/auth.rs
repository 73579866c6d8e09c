/// Authentication middleware
///
/// Runs the [`Authenticator`](ttracker_shared::auth::Authenticator) on the
/// request's `Authorization` header and, on success, inserts the caller's
/// [`AuthContext`] into the request extensions. Handlers read it with
/// `Extension<AuthContext>`; a rejected request never reaches them.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use ttracker_api::{app::AppState, middleware::auth::jwt_auth_layer};
/// use ttracker_shared::auth::AuthContext;
///
/// async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
///     auth.cognito_id
/// }
///
/// # fn example(state: AppState) -> Router {
/// Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn_with_state(state.clone(), jwt_auth_layer))
///     .with_state(state)
/// # }
/// ```

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use ttracker_shared::auth::AuthError;

use crate::{app::AppState, error::ApiError};

/// JWT authentication middleware layer
pub async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .map(|value| {
            value.to_str().map_err(|_| {
                AuthError::InvalidFormat("Authorization header is not valid text".to_string())
            })
        })
        .transpose()?;

    let auth_context = state.authenticator.authenticate(authorization).await?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
