use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A task as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier, assigned by the store at insert time.
    pub id: Uuid,
    /// Owning project. Must reference an existing project whenever set.
    pub project_id: Option<Uuid>,
    pub title: String,
    /// Higher means more urgent.
    pub priority: i32,
    pub completed: bool,
    /// Calendar date only, no time component.
    pub due_date: Option<NaiveDate>,
}

fn default_priority() -> i32 {
    1
}

/// Payload for creating a task under a project.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// Task title, 1 to 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(default = "default_priority")]
    pub priority: i32,

    #[serde(default)]
    pub completed: bool,

    pub due_date: Option<NaiveDate>,
}

/// Partial update for a task. Fields left out of the payload keep their
/// stored values. A `project_id`, if present, must name an existing
/// project or the whole update is rejected.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TaskPatch {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    pub priority: Option<i32>,

    pub completed: Option<bool>,

    pub due_date: Option<NaiveDate>,

    pub project_id: Option<Uuid>,
}
