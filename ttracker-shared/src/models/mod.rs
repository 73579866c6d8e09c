/// Domain models for ttracker
///
/// # Models
///
/// - `user`: Users provisioned from identity provider subjects
/// - `project`: Projects owned by a user, with canonical priority
/// - `task`: Tasks belonging to a project, with canonical status
/// - `team`: Teams with a single administrator
///
/// Each module pairs the persisted row type with the raw client payload
/// (`*Request`) and, where canonicalization applies, the normalized input
/// handed to storage (`New*`).

pub mod project;
pub mod task;
pub mod team;
pub mod user;

pub use project::{NewProject, Priority, Project, ProjectRequest};
pub use task::{NewTask, Task, TaskRequest, TaskStatus};
pub use team::{Team, TeamRequest};
pub use user::{CreateUser, User};
