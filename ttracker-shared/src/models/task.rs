/// Task model
///
/// Tasks belong to exactly one project. They inherit the project's owner:
/// a task is only visible to the user who owns its parent project.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('Pending', 'InProgress', 'Done');
///
/// CREATE TABLE tasks (
///     id INTEGER PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
///     project_id INTEGER NOT NULL REFERENCES projects(id),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     status task_status NOT NULL DEFAULT 'Pending',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Canonicalizes free-form input into a status
    ///
    /// Matching ignores case, whitespace, `-` and `_`, so "in progress",
    /// "In-Progress" and "INPROGRESS" all map to [`TaskStatus::InProgress`].
    /// Unrecognized input becomes [`TaskStatus::Pending`].
    pub fn canonicalize(raw: &str) -> Self {
        let folded: String = raw
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match folded.as_str() {
            "inprogress" => TaskStatus::InProgress,
            "done" => TaskStatus::Done,
            _ => TaskStatus::Pending,
        }
    }

    /// Gets the stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "InProgress",
            TaskStatus::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task belonging to a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task ID
    pub id: i32,

    /// Parent project
    pub project_id: i32,

    /// Title
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Canonical status
    pub status: TaskStatus,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Task payload as received from clients
///
/// The parent project comes from the request path, not the body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TaskRequest {
    /// Title
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: String,

    /// Description (empty when omitted)
    #[serde(default)]
    pub description: String,

    /// Raw status input (empty when omitted)
    #[serde(default)]
    pub status: String,
}

/// Canonicalized task fields ready for persistence
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

impl From<TaskRequest> for NewTask {
    fn from(req: TaskRequest) -> Self {
        Self {
            status: TaskStatus::canonicalize(&req.status),
            title: req.title,
            description: req.description,
        }
    }
}
