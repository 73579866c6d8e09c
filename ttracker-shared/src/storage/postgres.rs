/// PostgreSQL storage adapter
///
/// Every project and task query joins through `users.cognito_id`, so
/// ownership is enforced by the database rather than by a separate check.
/// Multi-statement operations (project create, project delete) run inside a
/// transaction that is rolled back on any failure.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{
    ProjectStorage, Storage, StorageError, StorageResult, TaskStorage, TeamStorage, UserStorage,
};
use crate::models::{CreateUser, NewProject, NewTask, Project, Task, Team, TeamRequest};

/// Storage backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStorage for PostgresStore {
    async fn user_exists(&self, cognito_id: &str) -> StorageResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE cognito_id = $1)")
                .bind(cognito_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn create_user(&self, data: CreateUser) -> StorageResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (cognito_id, username, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (cognito_id) DO NOTHING
            "#,
        )
        .bind(&data.cognito_id)
        .bind(&data.username)
        .bind(&data.email)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(cognito_id = %data.cognito_id, "User already provisioned");
        }

        Ok(())
    }
}

#[async_trait]
impl ProjectStorage for PostgresStore {
    async fn list_projects(&self, cognito_id: &str) -> StorageResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT p.id, p.user_id, p.title, p.description, p.priority, p.created_at
            FROM projects p
            JOIN users u ON u.id = p.user_id
            WHERE u.cognito_id = $1
            ORDER BY p.id
            "#,
        )
        .bind(cognito_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn find_project(
        &self,
        project_id: i32,
        cognito_id: &str,
    ) -> StorageResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT p.id, p.user_id, p.title, p.description, p.priority, p.created_at
            FROM projects p
            JOIN users u ON u.id = p.user_id
            WHERE p.id = $1 AND u.cognito_id = $2
            "#,
        )
        .bind(project_id)
        .bind(cognito_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn create_project(&self, cognito_id: &str, data: NewProject) -> StorageResult<Project> {
        let mut tx = self.pool.begin().await?;

        let user_id: Option<i32> = sqlx::query_scalar("SELECT id FROM users WHERE cognito_id = $1")
            .bind(cognito_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(user_id) = user_id else {
            tx.rollback().await?;
            return Err(StorageError::InvalidReference(format!(
                "no user for identity {}",
                cognito_id
            )));
        };

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (user_id, title, description, priority)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, description, priority, created_at
            "#,
        )
        .bind(user_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.priority)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(project)
    }

    async fn update_project(
        &self,
        project_id: i32,
        cognito_id: &str,
        data: NewProject,
    ) -> StorageResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects p
            SET title = $1, description = $2, priority = $3
            FROM users u
            WHERE p.id = $4 AND u.id = p.user_id AND u.cognito_id = $5
            RETURNING p.id, p.user_id, p.title, p.description, p.priority, p.created_at
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.priority)
        .bind(project_id)
        .bind(cognito_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn delete_project(&self, project_id: i32, cognito_id: &str) -> StorageResult<bool> {
        let mut tx = self.pool.begin().await?;

        let tasks = sqlx::query(
            r#"
            DELETE FROM tasks t
            USING projects p, users u
            WHERE t.project_id = $1
              AND p.id = t.project_id
              AND u.id = p.user_id
              AND u.cognito_id = $2
            "#,
        )
        .bind(project_id)
        .bind(cognito_id)
        .execute(&mut *tx)
        .await?;

        let projects = sqlx::query(
            r#"
            DELETE FROM projects p
            USING users u
            WHERE p.id = $1 AND u.id = p.user_id AND u.cognito_id = $2
            "#,
        )
        .bind(project_id)
        .bind(cognito_id)
        .execute(&mut *tx)
        .await?;

        if projects.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;

        tracing::debug!(
            project_id = project_id,
            tasks_removed = tasks.rows_affected(),
            "Project deleted"
        );

        Ok(true)
    }
}

#[async_trait]
impl TaskStorage for PostgresStore {
    async fn list_tasks(&self, project_id: i32, cognito_id: &str) -> StorageResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT t.id, t.project_id, t.title, t.description, t.status, t.created_at
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            JOIN users u ON u.id = p.user_id
            WHERE t.project_id = $1 AND u.cognito_id = $2
            ORDER BY t.id
            "#,
        )
        .bind(project_id)
        .bind(cognito_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn find_task(
        &self,
        project_id: i32,
        task_id: i32,
        cognito_id: &str,
    ) -> StorageResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT t.id, t.project_id, t.title, t.description, t.status, t.created_at
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            JOIN users u ON u.id = p.user_id
            WHERE t.id = $1 AND t.project_id = $2 AND u.cognito_id = $3
            "#,
        )
        .bind(task_id)
        .bind(project_id)
        .bind(cognito_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn create_task(
        &self,
        project_id: i32,
        cognito_id: &str,
        data: NewTask,
    ) -> StorageResult<Option<Task>> {
        // Inserts nothing when the project is not the caller's.
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (project_id, title, description, status)
            SELECT p.id, $1, $2, $3
            FROM projects p
            JOIN users u ON u.id = p.user_id
            WHERE p.id = $4 AND u.cognito_id = $5
            RETURNING id, project_id, title, description, status, created_at
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.status)
        .bind(project_id)
        .bind(cognito_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn update_task(
        &self,
        project_id: i32,
        task_id: i32,
        cognito_id: &str,
        data: NewTask,
    ) -> StorageResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks t
            SET title = $1, description = $2, status = $3
            FROM projects p, users u
            WHERE t.id = $4
              AND t.project_id = $5
              AND p.id = t.project_id
              AND u.id = p.user_id
              AND u.cognito_id = $6
            RETURNING t.id, t.project_id, t.title, t.description, t.status, t.created_at
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.status)
        .bind(task_id)
        .bind(project_id)
        .bind(cognito_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn delete_task(
        &self,
        project_id: i32,
        task_id: i32,
        cognito_id: &str,
    ) -> StorageResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks t
            USING projects p, users u
            WHERE t.id = $1
              AND t.project_id = $2
              AND p.id = t.project_id
              AND u.id = p.user_id
              AND u.cognito_id = $3
            "#,
        )
        .bind(task_id)
        .bind(project_id)
        .bind(cognito_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TeamStorage for PostgresStore {
    async fn find_team(&self, team_id: i32) -> StorageResult<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(
            "SELECT id, name, description, admin_id FROM teams WHERE id = $1",
        )
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(team)
    }

    async fn create_team(&self, data: TeamRequest) -> StorageResult<Team> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (name, description, admin_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, admin_id
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.admin_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(team)
    }
}

#[async_trait]
impl Storage for PostgresStore {
    async fn ping(&self) -> StorageResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
