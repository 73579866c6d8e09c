/// Project service
///
/// Validates and canonicalizes input on every write and scopes every
/// operation by the caller's identity. A project owned by someone else is
/// reported the same way as one that does not exist: an empty result on
/// reads, [`ServiceError::NotFound`] on writes.

use std::sync::Arc;
use validator::Validate;

use super::{ServiceError, ServiceResult};
use crate::models::{NewProject, Project, ProjectRequest};
use crate::storage::ProjectStorage;

/// Owner-scoped project operations
#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn ProjectStorage>,
}

impl ProjectService {
    pub fn new(store: Arc<dyn ProjectStorage>) -> Self {
        Self { store }
    }

    /// Lists the caller's projects
    pub async fn list(&self, cognito_id: &str) -> ServiceResult<Vec<Project>> {
        Ok(self.store.list_projects(cognito_id).await?)
    }

    /// Gets one of the caller's projects
    ///
    /// `None` when the project does not exist or belongs to someone else.
    pub async fn get(&self, project_id: i32, cognito_id: &str) -> ServiceResult<Option<Project>> {
        Ok(self.store.find_project(project_id, cognito_id).await?)
    }

    /// Creates a project owned by the caller
    ///
    /// Unrecognized priorities are stored as `Low`.
    pub async fn create(&self, cognito_id: &str, req: ProjectRequest) -> ServiceResult<Project> {
        req.validate()?;

        let data = NewProject::from(req);
        let project = self.store.create_project(cognito_id, data).await?;

        tracing::debug!(
            project_id = project.id,
            priority = %project.priority,
            "Project created"
        );

        Ok(project)
    }

    /// Replaces the fields of one of the caller's projects
    pub async fn update(
        &self,
        project_id: i32,
        cognito_id: &str,
        req: ProjectRequest,
    ) -> ServiceResult<Project> {
        req.validate()?;

        let data = NewProject::from(req);
        self.store
            .update_project(project_id, cognito_id, data)
            .await?
            .ok_or_else(|| not_found(project_id))
    }

    /// Deletes one of the caller's projects and all of its tasks
    pub async fn delete(&self, project_id: i32, cognito_id: &str) -> ServiceResult<()> {
        if self.store.delete_project(project_id, cognito_id).await? {
            Ok(())
        } else {
            Err(not_found(project_id))
        }
    }
}

fn not_found(project_id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Project {}", project_id))
}
