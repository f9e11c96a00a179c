//!
//! # Entity Store
//!
//! The repository boundary of the application. Every persisted operation on
//! projects, tasks and credentials goes through the [`Store`] trait, so the
//! backing engine can be swapped without touching handlers: [`pg::PgStore`]
//! runs against Postgres in production, [`mem::MemStore`] backs the
//! integration tests.

pub mod mem;
pub mod pg;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Project, ProjectInput, ProjectPatch, Task, TaskInput, TaskPatch, User};

pub use mem::MemStore;
pub use pg::PgStore;

/// Persistence operations for projects, tasks and credential records.
///
/// Identifier assignment is owned by the store: callers never supply ids.
/// Each operation is a single transaction against the backing engine; in
/// particular `delete_project` removes the project and every task that
/// references it as one atomic unit, so no orphaned task can survive a
/// partial failure.
#[async_trait]
pub trait Store: Send + Sync {
    /// Persists a new project and returns the stored record.
    async fn create_project(&self, input: ProjectInput) -> Result<Project, AppError>;

    /// Single-key lookup; `None` if the id does not resolve.
    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, AppError>;

    /// Applies only the fields present in `patch`; `None` if the id does
    /// not resolve. An empty patch is a no-op.
    async fn update_project(&self, id: Uuid, patch: ProjectPatch)
        -> Result<Option<Project>, AppError>;

    /// Removes the project and, cascading, all its tasks. `false` if the
    /// id does not resolve.
    async fn delete_project(&self, id: Uuid) -> Result<bool, AppError>;

    /// Creates a task bound to `project_id`. `None` if the project does
    /// not exist; no task record is created in that case.
    async fn create_task(&self, project_id: Uuid, input: TaskInput)
        -> Result<Option<Task>, AppError>;

    /// All tasks of a project, ordered by priority descending. `None` if
    /// the project does not exist.
    async fn list_tasks(&self, project_id: Uuid) -> Result<Option<Vec<Task>>, AppError>;

    /// Applies only the fields present in `patch`; `None` if the task id
    /// does not resolve. A patch whose `project_id` names a nonexistent
    /// project fails with [`AppError::NotFound`] before any field is
    /// applied.
    async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<Option<Task>, AppError>;

    /// `false` if the task id does not resolve.
    async fn delete_task(&self, id: Uuid) -> Result<bool, AppError>;

    /// Credential lookup by username.
    async fn find_user(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Idempotent bootstrap insert: creates the credential if absent and
    /// returns the stored record either way. An existing record is never
    /// overwritten.
    async fn create_user_if_absent(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<User, AppError>;
}
