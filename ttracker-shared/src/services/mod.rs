/// Domain services
///
/// Services sit between the HTTP handlers and storage. They normalize and
/// validate input, then delegate to a storage capability trait. They never
/// know which adapter is behind the trait and never map errors to HTTP
/// statuses.
///
/// # Services
///
/// - `project`: owner-scoped project CRUD with priority canonicalization
/// - `task`: owner-scoped task CRUD with status canonicalization
/// - `team`: team lookup and validated creation
/// - `user`: user provisioning and existence checks

use crate::storage::StorageError;

pub mod project;
pub mod task;
pub mod team;
pub mod user;

pub use project::ProjectService;
pub use task::TaskService;
pub use team::TeamService;
pub use user::UserService;

/// Error type for service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input failed validation; storage was not reached
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// The entity does not exist or is not visible to the caller
    #[error("{0} not found")]
    NotFound(String),

    /// Storage failure, passed through unchanged
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;
