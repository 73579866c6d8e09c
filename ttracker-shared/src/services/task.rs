/// Task service
///
/// Tasks are addressed by `(project_id, task_id)` and are only visible to the
/// owner of the parent project. Status is canonicalized on every write.

use std::sync::Arc;
use validator::Validate;

use super::{ServiceError, ServiceResult};
use crate::models::{NewTask, Task, TaskRequest};
use crate::storage::TaskStorage;

/// Project-scoped task operations
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStorage>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStorage>) -> Self {
        Self { store }
    }

    /// Lists the tasks of a project
    ///
    /// Empty when the project does not exist or belongs to someone else.
    pub async fn list(&self, project_id: i32, cognito_id: &str) -> ServiceResult<Vec<Task>> {
        Ok(self.store.list_tasks(project_id, cognito_id).await?)
    }

    /// Gets a task
    ///
    /// `None` when the task is missing or its project is not the caller's.
    pub async fn get(
        &self,
        project_id: i32,
        task_id: i32,
        cognito_id: &str,
    ) -> ServiceResult<Option<Task>> {
        Ok(self.store.find_task(project_id, task_id, cognito_id).await?)
    }

    /// Creates a task in one of the caller's projects
    ///
    /// Unrecognized statuses are stored as `Pending`.
    pub async fn create(
        &self,
        project_id: i32,
        cognito_id: &str,
        req: TaskRequest,
    ) -> ServiceResult<Task> {
        req.validate()?;

        let data = NewTask::from(req);
        let task = self
            .store
            .create_task(project_id, cognito_id, data)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Project {}", project_id)))?;

        tracing::debug!(
            project_id = project_id,
            task_id = task.id,
            status = %task.status,
            "Task created"
        );

        Ok(task)
    }

    /// Replaces the fields of a task
    pub async fn update(
        &self,
        project_id: i32,
        task_id: i32,
        cognito_id: &str,
        req: TaskRequest,
    ) -> ServiceResult<Task> {
        req.validate()?;

        let data = NewTask::from(req);
        self.store
            .update_task(project_id, task_id, cognito_id, data)
            .await?
            .ok_or_else(|| task_not_found(task_id))
    }

    /// Deletes a task
    pub async fn delete(&self, project_id: i32, task_id: i32, cognito_id: &str) -> ServiceResult<()> {
        if self.store.delete_task(project_id, task_id, cognito_id).await? {
            Ok(())
        } else {
            Err(task_not_found(task_id))
        }
    }
}

fn task_not_found(task_id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Task {}", task_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateUser, NewProject, TaskStatus};
    use crate::storage::{memory::MemoryStore, ProjectStorage, UserStorage};

    async fn setup() -> (TaskService, i32) {
        let store = Arc::new(MemoryStore::new());
        store.create_user(CreateUser::for_identity("owner")).await.unwrap();
        let project = store
            .create_project(
                "owner",
                NewProject {
                    title: "p".to_string(),
                    description: String::new(),
                    priority: Default::default(),
                },
            )
            .await
            .unwrap();
        (TaskService::new(store), project.id)
    }

    fn request(status: &str) -> TaskRequest {
        TaskRequest {
            title: "Write outline".to_string(),
            description: String::new(),
            status: status.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_canonicalizes_status() {
        let (svc, project_id) = setup().await;

        let task = svc.create(project_id, "owner", request("in progress")).await.unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.project_id, project_id);

        let task = svc.create(project_id, "owner", request("someday")).await.unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn test_update_canonicalizes_status() {
        let (svc, project_id) = setup().await;
        let task = svc.create(project_id, "owner", request("")).await.unwrap();

        let task = svc
            .update(project_id, task.id, "owner", request("done"))
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::Done);
    }

    #[tokio::test]
    async fn test_create_in_foreign_project_is_not_found() {
        let (svc, project_id) = setup().await;
        let err = svc
            .create(project_id, "stranger", request("done"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_foreign_task_is_empty_result() {
        let (svc, project_id) = setup().await;
        let task = svc.create(project_id, "owner", request("")).await.unwrap();

        assert_eq!(svc.get(project_id, task.id, "stranger").await.unwrap(), None);
        assert_eq!(svc.get(project_id, 404, "owner").await.unwrap(), None);
        assert_eq!(
            svc.get(project_id, task.id, "owner").await.unwrap(),
            Some(task)
        );
    }

    #[tokio::test]
    async fn test_overlong_title_rejected() {
        let (svc, project_id) = setup().await;
        let mut req = request("done");
        req.title = "t".repeat(300);

        let err = svc.create(project_id, "owner", req).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(svc.list(project_id, "owner").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_task() {
        let (svc, project_id) = setup().await;
        let err = svc.delete(project_id, 404, "owner").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
