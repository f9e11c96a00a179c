use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Project, ProjectInput, ProjectPatch, Task, TaskInput, TaskPatch, User};
use crate::store::Store;

const PROJECT_COLUMNS: &str = "id, name, description, created_at";
const TASK_COLUMNS: &str = "id, project_id, title, priority, completed, due_date";

/// Postgres-backed [`Store`].
///
/// Partial updates are expressed as single `UPDATE ... COALESCE` statements
/// and the project/task cascade is delegated to the `ON DELETE CASCADE`
/// foreign key, so every operation is one statement and the engine's
/// per-statement atomicity covers the contract.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn project_exists(&self, id: Uuid) -> Result<bool, AppError> {
        let row = sqlx::query_as::<_, (Uuid,)>("SELECT id FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_project(&self, input: ProjectInput) -> Result<Project, AppError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO projects (name, description) VALUES ($1, $2) RETURNING {}",
            PROJECT_COLUMNS
        ))
        .bind(input.name)
        .bind(input.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects WHERE id = $1",
            PROJECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn update_project(
        &self,
        id: Uuid,
        patch: ProjectPatch,
    ) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "UPDATE projects
             SET name = COALESCE($2, name),
                 description = COALESCE($3, description)
             WHERE id = $1
             RETURNING {}",
            PROJECT_COLUMNS
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.description)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, AppError> {
        // Tasks go with the project via ON DELETE CASCADE, all in the same
        // statement.
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_task(
        &self,
        project_id: Uuid,
        input: TaskInput,
    ) -> Result<Option<Task>, AppError> {
        if !self.project_exists(project_id).await? {
            return Ok(None);
        }

        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (project_id, title, priority, completed, due_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(project_id)
        .bind(input.title)
        .bind(input.priority)
        .bind(input.completed)
        .bind(input.due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(Some(task))
    }

    async fn list_tasks(&self, project_id: Uuid) -> Result<Option<Vec<Task>>, AppError> {
        if !self.project_exists(project_id).await? {
            return Ok(None);
        }

        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE project_id = $1 ORDER BY priority DESC",
            TASK_COLUMNS
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(tasks))
    }

    async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<Option<Task>, AppError> {
        let existing = sqlx::query_as::<_, (Uuid,)>("SELECT id FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_none() {
            return Ok(None);
        }

        // A re-parenting patch must name a live project before anything is
        // written.
        if let Some(project_id) = patch.project_id {
            if !self.project_exists(project_id).await? {
                return Err(AppError::NotFound("Project not found".into()));
            }
        }

        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks
             SET title = COALESCE($2, title),
                 priority = COALESCE($3, priority),
                 completed = COALESCE($4, completed),
                 due_date = COALESCE($5, due_date),
                 project_id = COALESCE($6, project_id)
             WHERE id = $1
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.priority)
        .bind(patch.completed)
        .bind(patch.due_date)
        .bind(patch.project_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user_if_absent(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        sqlx::query(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2)
             ON CONFLICT (username) DO NOTHING",
        )
        .bind(username)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}
