use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Project, ProjectInput, ProjectPatch, Task, TaskInput, TaskPatch, User};
use crate::store::Store;

#[derive(Default)]
struct Inner {
    projects: Vec<Project>,
    tasks: Vec<Task>,
    users: Vec<User>,
}

/// In-process [`Store`] with the same observable semantics as
/// [`crate::store::PgStore`]. Used by the integration tests so the full
/// HTTP stack can run without a database.
///
/// All state sits behind one mutex, which trivially gives each operation
/// the per-operation atomicity the contract asks for. The lock is never
/// held across an await point.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, AppError> {
        self.inner
            .lock()
            .map_err(|_| AppError::InternalServerError("store lock poisoned".into()))
    }
}

#[async_trait]
impl Store for MemStore {
    async fn create_project(&self, input: ProjectInput) -> Result<Project, AppError> {
        let project = Project {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            created_at: Utc::now(),
        };

        let mut inner = self.lock()?;
        inner.projects.push(project.clone());
        Ok(project)
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, AppError> {
        let inner = self.lock()?;
        Ok(inner.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn update_project(
        &self,
        id: Uuid,
        patch: ProjectPatch,
    ) -> Result<Option<Project>, AppError> {
        let mut inner = self.lock()?;
        let project = match inner.projects.iter_mut().find(|p| p.id == id) {
            Some(project) => project,
            None => return Ok(None),
        };

        if let Some(name) = patch.name {
            project.name = name;
        }
        if let Some(description) = patch.description {
            project.description = Some(description);
        }

        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, AppError> {
        let mut inner = self.lock()?;
        let before = inner.projects.len();
        inner.projects.retain(|p| p.id != id);
        if inner.projects.len() == before {
            return Ok(false);
        }

        // Cascade: the project and its tasks disappear under the same lock.
        inner.tasks.retain(|t| t.project_id != Some(id));
        Ok(true)
    }

    async fn create_task(
        &self,
        project_id: Uuid,
        input: TaskInput,
    ) -> Result<Option<Task>, AppError> {
        let mut inner = self.lock()?;
        if !inner.projects.iter().any(|p| p.id == project_id) {
            return Ok(None);
        }

        let task = Task {
            id: Uuid::new_v4(),
            project_id: Some(project_id),
            title: input.title,
            priority: input.priority,
            completed: input.completed,
            due_date: input.due_date,
        };
        inner.tasks.push(task.clone());
        Ok(Some(task))
    }

    async fn list_tasks(&self, project_id: Uuid) -> Result<Option<Vec<Task>>, AppError> {
        let inner = self.lock()?;
        if !inner.projects.iter().any(|p| p.id == project_id) {
            return Ok(None);
        }

        let mut tasks: Vec<Task> = inner
            .tasks
            .iter()
            .filter(|t| t.project_id == Some(project_id))
            .cloned()
            .collect();
        // Stable sort keeps insertion order between equal priorities.
        tasks.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(Some(tasks))
    }

    async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<Option<Task>, AppError> {
        let mut inner = self.lock()?;
        let index = match inner.tasks.iter().position(|t| t.id == id) {
            Some(index) => index,
            None => return Ok(None),
        };

        // A re-parenting patch must name a live project before anything is
        // applied.
        if let Some(project_id) = patch.project_id {
            if !inner.projects.iter().any(|p| p.id == project_id) {
                return Err(AppError::NotFound("Project not found".into()));
            }
        }

        let task = &mut inner.tasks[index];

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(project_id) = patch.project_id {
            task.project_id = Some(project_id);
        }

        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, AppError> {
        let mut inner = self.lock()?;
        let before = inner.tasks.len();
        inner.tasks.retain(|t| t.id != id);
        Ok(inner.tasks.len() != before)
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, AppError> {
        let inner = self.lock()?;
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_user_if_absent(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let mut inner = self.lock()?;
        if let Some(existing) = inner.users.iter().find(|u| u.username == username) {
            return Ok(existing.clone());
        }

        let user = User {
            id: inner.users.len() as i32 + 1,
            username: username.to_owned(),
            password_hash: password_hash.to_owned(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn project_input(name: &str) -> ProjectInput {
        ProjectInput {
            name: name.to_string(),
            description: None,
        }
    }

    fn task_input(title: &str, priority: i32) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            priority,
            completed: false,
            due_date: None,
        }
    }

    #[actix_rt::test]
    async fn test_create_then_get_returns_matching_record() {
        let store = MemStore::new();
        let created = store
            .create_project(ProjectInput {
                name: "Alpha".to_string(),
                description: Some("first".to_string()),
            })
            .await
            .unwrap();

        let fetched = store.get_project(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.name, "Alpha");
        assert_eq!(fetched.description.as_deref(), Some("first"));

        let other = store.create_project(project_input("Beta")).await.unwrap();
        assert_ne!(other.id, created.id);
    }

    #[actix_rt::test]
    async fn test_empty_patch_is_a_noop() {
        let store = MemStore::new();
        let created = store
            .create_project(ProjectInput {
                name: "Alpha".to_string(),
                description: Some("first".to_string()),
            })
            .await
            .unwrap();

        let updated = store
            .update_project(created.id, ProjectPatch::default())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, created.name);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[actix_rt::test]
    async fn test_delete_project_is_idempotent_in_effect() {
        let store = MemStore::new();
        let created = store.create_project(project_input("Alpha")).await.unwrap();

        assert!(store.delete_project(created.id).await.unwrap());
        assert!(!store.delete_project(created.id).await.unwrap());
        assert!(store.get_project(created.id).await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_delete_project_cascades_to_tasks() {
        let store = MemStore::new();
        let project = store.create_project(project_input("Alpha")).await.unwrap();
        let kept = store.create_project(project_input("Beta")).await.unwrap();

        for i in 0..3 {
            store
                .create_task(project.id, task_input(&format!("task {}", i), 1))
                .await
                .unwrap()
                .unwrap();
        }
        let survivor = store
            .create_task(kept.id, task_input("unrelated", 1))
            .await
            .unwrap()
            .unwrap();

        assert!(store.delete_project(project.id).await.unwrap());

        // Listing on the deleted project now reports "no such project".
        assert!(store.list_tasks(project.id).await.unwrap().is_none());

        // The other project's task is untouched and its own delete still works.
        let remaining = store.list_tasks(kept.id).await.unwrap().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, survivor.id);
    }

    #[actix_rt::test]
    async fn test_create_task_for_missing_project_creates_nothing() {
        let store = MemStore::new();
        let project = store.create_project(project_input("Alpha")).await.unwrap();

        let result = store
            .create_task(Uuid::new_v4(), task_input("orphan", 1))
            .await
            .unwrap();
        assert!(result.is_none());

        let tasks = store.list_tasks(project.id).await.unwrap().unwrap();
        assert!(tasks.is_empty());
    }

    #[actix_rt::test]
    async fn test_list_tasks_orders_by_priority_descending() {
        let store = MemStore::new();
        let project = store.create_project(project_input("Alpha")).await.unwrap();

        for priority in [1, 5, 3] {
            store
                .create_task(project.id, task_input(&format!("p{}", priority), priority))
                .await
                .unwrap()
                .unwrap();
        }

        let tasks = store.list_tasks(project.id).await.unwrap().unwrap();
        let priorities: Vec<i32> = tasks.iter().map(|t| t.priority).collect();
        assert_eq!(priorities, vec![5, 3, 1]);
    }

    #[actix_rt::test]
    async fn test_equal_priorities_keep_insertion_order() {
        let store = MemStore::new();
        let project = store.create_project(project_input("Alpha")).await.unwrap();

        for title in ["first", "second", "third"] {
            store
                .create_task(project.id, task_input(title, 2))
                .await
                .unwrap()
                .unwrap();
        }

        let tasks = store.list_tasks(project.id).await.unwrap().unwrap();
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[actix_rt::test]
    async fn test_update_task_partial_fields() {
        let store = MemStore::new();
        let project = store.create_project(project_input("Alpha")).await.unwrap();
        let task = store
            .create_task(
                project.id,
                TaskInput {
                    title: "draft".to_string(),
                    priority: 2,
                    completed: false,
                    due_date: NaiveDate::from_ymd_opt(2025, 6, 1),
                },
            )
            .await
            .unwrap()
            .unwrap();

        let updated = store
            .update_task(
                task.id,
                TaskPatch {
                    completed: Some(true),
                    ..TaskPatch::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert!(updated.completed);
        assert_eq!(updated.title, "draft");
        assert_eq!(updated.priority, 2);
        assert_eq!(updated.due_date, NaiveDate::from_ymd_opt(2025, 6, 1));
        assert_eq!(updated.project_id, Some(project.id));
    }

    #[actix_rt::test]
    async fn test_update_task_rejects_missing_project_reference() {
        let store = MemStore::new();
        let project = store.create_project(project_input("Alpha")).await.unwrap();
        let task = store
            .create_task(project.id, task_input("draft", 1))
            .await
            .unwrap()
            .unwrap();

        let result = store
            .update_task(
                task.id,
                TaskPatch {
                    title: Some("renamed".to_string()),
                    project_id: Some(Uuid::new_v4()),
                    ..TaskPatch::default()
                },
            )
            .await;

        match result {
            Err(AppError::NotFound(_)) => {}
            other => panic!("Expected NotFound, got {:?}", other),
        }

        // Nothing was applied, the reference included.
        let tasks = store.list_tasks(project.id).await.unwrap().unwrap();
        assert_eq!(tasks[0].title, "draft");
        assert_eq!(tasks[0].project_id, Some(project.id));
    }

    #[actix_rt::test]
    async fn test_update_task_reparenting() {
        let store = MemStore::new();
        let source = store.create_project(project_input("Alpha")).await.unwrap();
        let target = store.create_project(project_input("Beta")).await.unwrap();
        let task = store
            .create_task(source.id, task_input("movable", 1))
            .await
            .unwrap()
            .unwrap();

        let updated = store
            .update_task(
                task.id,
                TaskPatch {
                    project_id: Some(target.id),
                    ..TaskPatch::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.project_id, Some(target.id));

        assert!(store.list_tasks(source.id).await.unwrap().unwrap().is_empty());
        assert_eq!(store.list_tasks(target.id).await.unwrap().unwrap().len(), 1);
    }

    #[actix_rt::test]
    async fn test_delete_task() {
        let store = MemStore::new();
        let project = store.create_project(project_input("Alpha")).await.unwrap();
        let task = store
            .create_task(project.id, task_input("doomed", 1))
            .await
            .unwrap()
            .unwrap();

        assert!(store.delete_task(task.id).await.unwrap());
        assert!(!store.delete_task(task.id).await.unwrap());
        assert!(store
            .update_task(task.id, TaskPatch::default())
            .await
            .unwrap()
            .is_none());
    }

    #[actix_rt::test]
    async fn test_create_user_if_absent_is_idempotent() {
        let store = MemStore::new();
        let first = store
            .create_user_if_absent("admin", "hash-one")
            .await
            .unwrap();
        let second = store
            .create_user_if_absent("admin", "hash-two")
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        // The existing hash is never overwritten.
        assert_eq!(second.password_hash, "hash-one");

        let found = store.find_user("admin").await.unwrap().unwrap();
        assert_eq!(found.password_hash, "hash-one");
        assert!(store.find_user("nobody").await.unwrap().is_none());
    }
}
