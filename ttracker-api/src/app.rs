/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use ttracker_api::{app::{build_router, AppState}, config::Config};
/// use ttracker_shared::storage::memory::MemoryStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemoryStore::new()), config)?;
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::auth::jwt_auth_layer, routes};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use ttracker_shared::{
    auth::{jwks::JwksCache, Authenticator},
    services::{ProjectService, TaskService, TeamService, UserService},
    storage::Storage,
};

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Every field is reference counted, so clones are cheap.
#[derive(Clone)]
pub struct AppState {
    /// Project operations
    pub projects: ProjectService,

    /// Task operations
    pub tasks: TaskService,

    /// Team operations
    pub teams: TeamService,

    /// Request authentication
    pub authenticator: Authenticator,

    /// Identity provider key set
    pub jwks: Arc<JwksCache>,

    /// Storage backend, for health checks
    pub storage: Arc<dyn Storage>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates application state over a storage backend
    ///
    /// # Errors
    ///
    /// Returns an error if the key set HTTP client cannot be built.
    pub fn new<S: Storage + 'static>(store: Arc<S>, config: Config) -> anyhow::Result<Self> {
        let jwks = Arc::new(JwksCache::new(
            config.auth.jwk_url.clone(),
            config.auth.jwks_cache_ttl(),
            config.auth.jwks_fetch_timeout(),
        )?);

        let users = UserService::new(store.clone());
        let authenticator = Authenticator::new(jwks.clone(), config.auth.issuer.clone(), users);

        Ok(Self {
            projects: ProjectService::new(store.clone()),
            tasks: TaskService::new(store.clone()),
            teams: TeamService::new(store.clone()),
            authenticator,
            jwks,
            storage: store,
            config: Arc::new(config),
        })
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET /health                                   # public
/// ├── /projects                                     # authenticated
/// │   ├── GET, POST /
/// │   ├── GET, PUT, DELETE /:project_id
/// │   ├── GET, POST /:project_id/tasks
/// │   └── GET, PUT, DELETE /:project_id/tasks/:task_id
/// ├── /teams                                        # authenticated
/// │   ├── POST /
/// │   └── GET /:team_id
/// └── POST /users                                   # authenticated, 501
/// ```
///
/// # Middleware Stack
///
/// Outermost first:
/// 1. CORS (tower-http CorsLayer), so preflights never need a token
/// 2. Logging (tower-http TraceLayer)
/// 3. Authentication (resource routes only)
///
/// A known path called with an unsupported method answers 405 with the
/// error envelope.
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new().route(
        "/health",
        get(routes::health::health_check).fallback(method_not_allowed),
    );

    let project_routes = Router::new()
        .route(
            "/",
            get(routes::projects::list_projects)
                .post(routes::projects::create_project)
                .fallback(method_not_allowed),
        )
        .route(
            "/:project_id",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project)
                .fallback(method_not_allowed),
        )
        .route(
            "/:project_id/tasks",
            get(routes::tasks::list_tasks)
                .post(routes::tasks::create_task)
                .fallback(method_not_allowed),
        )
        .route(
            "/:project_id/tasks/:task_id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task)
                .fallback(method_not_allowed),
        );

    let team_routes = Router::new()
        .route(
            "/",
            post(routes::teams::create_team).fallback(method_not_allowed),
        )
        .route(
            "/:team_id",
            get(routes::teams::get_team).fallback(method_not_allowed),
        );

    let protected_routes = Router::new()
        .nest("/projects", project_routes)
        .nest("/teams", team_routes)
        .route(
            "/users",
            post(routes::users::create_user).fallback(method_not_allowed),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(health_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Builds the CORS policy
///
/// Credentials are always allowed. With `*` the request origin is mirrored
/// back, since a literal wildcard cannot be combined with credentials.
fn cors_layer(config: &Config) -> CorsLayer {
    let origin = if config.allows_any_origin() {
        AllowOrigin::mirror_request()
    } else {
        let origins: Vec<HeaderValue> = config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::list([header::AUTHORIZATION, header::CONTENT_TYPE]))
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
