/// Storage capability traits and adapters
///
/// Services depend on these traits only, never on a concrete adapter. Two
/// adapters implement every trait:
///
/// - [`postgres::PostgresStore`]: relational persistence via sqlx
/// - [`memory::MemoryStore`]: in-process maps, used by tests and local runs
///
/// # Ownership
///
/// Project and task operations take the caller's external identity
/// (`cognito_id`) and filter on it inside the query. A row owned by someone
/// else is reported exactly like a missing row (`None`, `false` or an empty
/// list), never as a distinct error.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use ttracker_shared::storage::{memory::MemoryStore, ProjectStorage};
///
/// # async fn example() -> Result<(), ttracker_shared::storage::StorageError> {
/// let store = Arc::new(MemoryStore::new());
/// let projects = store.list_projects("caller-sub").await?;
/// assert!(projects.is_empty());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;

use crate::models::{CreateUser, NewProject, NewTask, Project, Task, Team, TeamRequest};

pub mod memory;
pub mod postgres;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The underlying database failed
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    /// A referenced row (user, project) does not exist
    #[error("Invalid reference: {0}")]
    InvalidReference(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_foreign_key_violation() {
                let constraint = db_err.constraint().unwrap_or("foreign key").to_string();
                return StorageError::InvalidReference(constraint);
            }
        }
        StorageError::Database(err)
    }
}

/// Storage result type alias
pub type StorageResult<T> = Result<T, StorageError>;

/// User persistence
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Checks whether a user with this external identity exists
    async fn user_exists(&self, cognito_id: &str) -> StorageResult<bool>;

    /// Inserts a user keyed by external identity
    ///
    /// Does not look for an existing row first; callers decide whether a
    /// create is needed.
    async fn create_user(&self, data: CreateUser) -> StorageResult<()>;
}

/// Project persistence, scoped by owner
#[async_trait]
pub trait ProjectStorage: Send + Sync {
    /// Lists every project owned by the caller
    async fn list_projects(&self, cognito_id: &str) -> StorageResult<Vec<Project>>;

    /// Finds one of the caller's projects
    async fn find_project(&self, project_id: i32, cognito_id: &str)
        -> StorageResult<Option<Project>>;

    /// Creates a project owned by the caller
    ///
    /// Resolving the owner's internal ID and the insert happen atomically.
    async fn create_project(&self, cognito_id: &str, data: NewProject) -> StorageResult<Project>;

    /// Updates one of the caller's projects
    async fn update_project(
        &self,
        project_id: i32,
        cognito_id: &str,
        data: NewProject,
    ) -> StorageResult<Option<Project>>;

    /// Deletes one of the caller's projects along with its tasks
    ///
    /// Tasks are removed first, then the project, as a single unit of work.
    /// Returns false (and removes nothing) when the project is not the
    /// caller's.
    async fn delete_project(&self, project_id: i32, cognito_id: &str) -> StorageResult<bool>;
}

/// Task persistence, scoped by the owner of the parent project
#[async_trait]
pub trait TaskStorage: Send + Sync {
    /// Lists tasks of one of the caller's projects
    async fn list_tasks(&self, project_id: i32, cognito_id: &str) -> StorageResult<Vec<Task>>;

    /// Finds a task within one of the caller's projects
    async fn find_task(
        &self,
        project_id: i32,
        task_id: i32,
        cognito_id: &str,
    ) -> StorageResult<Option<Task>>;

    /// Creates a task; `None` when the project is not the caller's
    async fn create_task(
        &self,
        project_id: i32,
        cognito_id: &str,
        data: NewTask,
    ) -> StorageResult<Option<Task>>;

    /// Updates a task within one of the caller's projects
    async fn update_task(
        &self,
        project_id: i32,
        task_id: i32,
        cognito_id: &str,
        data: NewTask,
    ) -> StorageResult<Option<Task>>;

    /// Deletes a task within one of the caller's projects
    async fn delete_task(&self, project_id: i32, task_id: i32, cognito_id: &str)
        -> StorageResult<bool>;
}

/// Team persistence
#[async_trait]
pub trait TeamStorage: Send + Sync {
    /// Finds a team by ID
    async fn find_team(&self, team_id: i32) -> StorageResult<Option<Team>>;

    /// Inserts a validated team
    async fn create_team(&self, data: TeamRequest) -> StorageResult<Team>;
}

/// Full storage backend
///
/// Implemented by every adapter that provides all four capabilities plus a
/// liveness check.
#[async_trait]
pub trait Storage: UserStorage + ProjectStorage + TaskStorage + TeamStorage {
    /// Verifies the backend is reachable
    async fn ping(&self) -> StorageResult<()>;
}
