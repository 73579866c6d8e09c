/// Project model
///
/// Projects belong to exactly one user and group that user's tasks. Every
/// read and write is scoped by the owner's external identity, so a project
/// that belongs to someone else is indistinguishable from one that does not
/// exist.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE project_priority AS ENUM ('High', 'Medium', 'Low');
///
/// CREATE TABLE projects (
///     id INTEGER PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
///     user_id INTEGER NOT NULL REFERENCES users(id),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     priority project_priority NOT NULL DEFAULT 'Low',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Project priority
///
/// Raw input is matched case-insensitively; anything unrecognized becomes
/// [`Priority::Low`] rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_priority")]
pub enum Priority {
    High,
    Medium,
    #[default]
    Low,
}

impl Priority {
    /// Canonicalizes free-form input into a priority
    ///
    /// # Example
    ///
    /// ```
    /// use ttracker_shared::models::project::Priority;
    ///
    /// assert_eq!(Priority::canonicalize("HIGH"), Priority::High);
    /// assert_eq!(Priority::canonicalize("urgent"), Priority::Low);
    /// ```
    pub fn canonicalize(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            _ => Priority::Low,
        }
    }

    /// Gets the stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project ID
    pub id: i32,

    /// Owning user (internal ID)
    pub user_id: i32,

    /// Title
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Canonical priority
    pub priority: Priority,

    /// When the project was created
    pub created_at: DateTime<Utc>,
}

/// Project payload as received from clients
///
/// `priority` stays a raw string here; the project service canonicalizes it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProjectRequest {
    /// Title
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: String,

    /// Description (empty when omitted)
    #[serde(default)]
    pub description: String,

    /// Raw priority input (empty when omitted)
    #[serde(default)]
    pub priority: String,
}

/// Canonicalized project fields ready for persistence
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

impl From<ProjectRequest> for NewProject {
    fn from(req: ProjectRequest) -> Self {
        Self {
            priority: Priority::canonicalize(&req.priority),
            title: req.title,
            description: req.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_canonicalize_case_insensitive() {
        for raw in ["High", "high", "HIGH", " hIgH "] {
            assert_eq!(Priority::canonicalize(raw), Priority::High, "input {raw:?}");
        }
        assert_eq!(Priority::canonicalize("medium"), Priority::Medium);
        assert_eq!(Priority::canonicalize("Low"), Priority::Low);
    }

    #[test]
    fn test_priority_unrecognized_is_low() {
        for raw in ["urgent", "", "hi", "1"] {
            assert_eq!(Priority::canonicalize(raw), Priority::Low, "input {raw:?}");
        }
    }

    #[test]
    fn test_project_request_defaults() {
        let req: ProjectRequest = serde_json::from_str(r#"{"title":"Roadmap"}"#).unwrap();
        assert_eq!(req.title, "Roadmap");
        assert!(req.description.is_empty());

        let project = NewProject::from(req);
        assert_eq!(project.priority, Priority::Low);
    }

    #[test]
    fn test_project_request_title_length() {
        let req = ProjectRequest {
            title: "x".repeat(255),
            ..Default::default()
        };
        assert!(req.validate().is_ok());

        let req = ProjectRequest {
            title: "x".repeat(256),
            ..Default::default()
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn test_priority_serializes_canonical_name() {
        assert_eq!(serde_json::to_string(&Priority::Medium).unwrap(), "\"Medium\"");
        assert_eq!(Priority::High.to_string(), "High");
    }
}
