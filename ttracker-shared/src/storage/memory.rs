/// In-memory storage adapter
///
/// Mirrors the PostgreSQL adapter's observable behavior: identity columns
/// start at 1, foreign keys are checked, ownership filters apply and project
/// deletion takes the project's tasks with it. State lives behind a single
/// async lock so every operation is atomic.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{
    ProjectStorage, Storage, StorageError, StorageResult, TaskStorage, TeamStorage, UserStorage,
};
use crate::models::{CreateUser, NewProject, NewTask, Project, Task, Team, TeamRequest, User};

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<i32, User>,
    projects: BTreeMap<i32, Project>,
    tasks: BTreeMap<i32, Task>,
    teams: BTreeMap<i32, Team>,
    next_user_id: i32,
    next_project_id: i32,
    next_task_id: i32,
    next_team_id: i32,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

impl State {
    fn user_id(&self, cognito_id: &str) -> Option<i32> {
        self.users
            .values()
            .find(|u| u.cognito_id == cognito_id)
            .map(|u| u.id)
    }

    fn owned_project(&self, project_id: i32, cognito_id: &str) -> Option<&Project> {
        let user_id = self.user_id(cognito_id)?;
        self.projects
            .get(&project_id)
            .filter(|p| p.user_id == user_id)
    }

    fn owned_task_id(&self, project_id: i32, task_id: i32, cognito_id: &str) -> Option<i32> {
        self.owned_project(project_id, cognito_id)?;
        self.tasks
            .get(&task_id)
            .filter(|t| t.project_id == project_id)
            .map(|t| t.id)
    }
}

/// Storage kept entirely in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds a user by external identity
    pub async fn find_user(&self, cognito_id: &str) -> Option<User> {
        let state = self.state.read().await;
        state
            .users
            .values()
            .find(|u| u.cognito_id == cognito_id)
            .cloned()
    }

    /// Counts stored tasks across all projects
    pub async fn task_count(&self) -> usize {
        self.state.read().await.tasks.len()
    }
}

#[async_trait]
impl UserStorage for MemoryStore {
    async fn user_exists(&self, cognito_id: &str) -> StorageResult<bool> {
        Ok(self.state.read().await.user_id(cognito_id).is_some())
    }

    async fn create_user(&self, data: CreateUser) -> StorageResult<()> {
        let mut state = self.state.write().await;
        if state.user_id(&data.cognito_id).is_some() {
            return Ok(());
        }

        let id = next_id(&mut state.next_user_id);
        state.users.insert(
            id,
            User {
                id,
                cognito_id: data.cognito_id,
                username: data.username,
                email: data.email,
                created_at: Utc::now(),
            },
        );
        Ok(())
    }
}

#[async_trait]
impl ProjectStorage for MemoryStore {
    async fn list_projects(&self, cognito_id: &str) -> StorageResult<Vec<Project>> {
        let state = self.state.read().await;
        let Some(user_id) = state.user_id(cognito_id) else {
            return Ok(Vec::new());
        };

        Ok(state
            .projects
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_project(
        &self,
        project_id: i32,
        cognito_id: &str,
    ) -> StorageResult<Option<Project>> {
        let state = self.state.read().await;
        Ok(state.owned_project(project_id, cognito_id).cloned())
    }

    async fn create_project(&self, cognito_id: &str, data: NewProject) -> StorageResult<Project> {
        let mut state = self.state.write().await;
        let user_id = state.user_id(cognito_id).ok_or_else(|| {
            StorageError::InvalidReference(format!("no user for identity {}", cognito_id))
        })?;

        let id = next_id(&mut state.next_project_id);
        let project = Project {
            id,
            user_id,
            title: data.title,
            description: data.description,
            priority: data.priority,
            created_at: Utc::now(),
        };
        state.projects.insert(id, project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        project_id: i32,
        cognito_id: &str,
        data: NewProject,
    ) -> StorageResult<Option<Project>> {
        let mut state = self.state.write().await;
        if state.owned_project(project_id, cognito_id).is_none() {
            return Ok(None);
        }

        let updated = state.projects.get_mut(&project_id).map(|project| {
            project.title = data.title;
            project.description = data.description;
            project.priority = data.priority;
            project.clone()
        });
        Ok(updated)
    }

    async fn delete_project(&self, project_id: i32, cognito_id: &str) -> StorageResult<bool> {
        let mut state = self.state.write().await;
        if state.owned_project(project_id, cognito_id).is_none() {
            return Ok(false);
        }

        state.tasks.retain(|_, t| t.project_id != project_id);
        state.projects.remove(&project_id);
        Ok(true)
    }
}

#[async_trait]
impl TaskStorage for MemoryStore {
    async fn list_tasks(&self, project_id: i32, cognito_id: &str) -> StorageResult<Vec<Task>> {
        let state = self.state.read().await;
        if state.owned_project(project_id, cognito_id).is_none() {
            return Ok(Vec::new());
        }

        Ok(state
            .tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn find_task(
        &self,
        project_id: i32,
        task_id: i32,
        cognito_id: &str,
    ) -> StorageResult<Option<Task>> {
        let state = self.state.read().await;
        Ok(state
            .owned_task_id(project_id, task_id, cognito_id)
            .and_then(|id| state.tasks.get(&id).cloned()))
    }

    async fn create_task(
        &self,
        project_id: i32,
        cognito_id: &str,
        data: NewTask,
    ) -> StorageResult<Option<Task>> {
        let mut state = self.state.write().await;
        if state.owned_project(project_id, cognito_id).is_none() {
            return Ok(None);
        }

        let id = next_id(&mut state.next_task_id);
        let task = Task {
            id,
            project_id,
            title: data.title,
            description: data.description,
            status: data.status,
            created_at: Utc::now(),
        };
        state.tasks.insert(id, task.clone());
        Ok(Some(task))
    }

    async fn update_task(
        &self,
        project_id: i32,
        task_id: i32,
        cognito_id: &str,
        data: NewTask,
    ) -> StorageResult<Option<Task>> {
        let mut state = self.state.write().await;
        let Some(id) = state.owned_task_id(project_id, task_id, cognito_id) else {
            return Ok(None);
        };

        let updated = state.tasks.get_mut(&id).map(|task| {
            task.title = data.title;
            task.description = data.description;
            task.status = data.status;
            task.clone()
        });
        Ok(updated)
    }

    async fn delete_task(
        &self,
        project_id: i32,
        task_id: i32,
        cognito_id: &str,
    ) -> StorageResult<bool> {
        let mut state = self.state.write().await;
        let Some(id) = state.owned_task_id(project_id, task_id, cognito_id) else {
            return Ok(false);
        };

        Ok(state.tasks.remove(&id).is_some())
    }
}

#[async_trait]
impl TeamStorage for MemoryStore {
    async fn find_team(&self, team_id: i32) -> StorageResult<Option<Team>> {
        Ok(self.state.read().await.teams.get(&team_id).cloned())
    }

    async fn create_team(&self, data: TeamRequest) -> StorageResult<Team> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&data.admin_id) {
            return Err(StorageError::InvalidReference(
                "teams_admin_id_fkey".to_string(),
            ));
        }

        let id = next_id(&mut state.next_team_id);
        let team = Team {
            id,
            name: data.name,
            description: data.description,
            admin_id: data.admin_id,
        };
        state.teams.insert(id, team.clone());
        Ok(team)
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn ping(&self) -> StorageResult<()> {
        Ok(())
    }
}
