use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A project as stored in the database and returned by the API.
///
/// Projects own their tasks: deleting a project deletes every task that
/// references it, as one atomic unit.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    /// Unique identifier, assigned by the store at insert time.
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Set once at creation, never updated.
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a project.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ProjectInput {
    /// Project name, 1 to 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    /// Optional free-text description, at most 1000 characters.
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Partial update for a project. Fields left out of the payload keep
/// their stored values.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct ProjectPatch {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_input_validation() {
        let valid = ProjectInput {
            name: "Website redesign".to_string(),
            description: Some("Q3 marketing site refresh".to_string()),
        };
        assert!(valid.validate().is_ok());

        let empty_name = ProjectInput {
            name: "".to_string(),
            description: None,
        };
        assert!(empty_name.validate().is_err());

        let long_name = ProjectInput {
            name: "a".repeat(201),
            description: None,
        };
        assert!(long_name.validate().is_err());
    }

    #[test]
    fn test_project_patch_validation() {
        let empty_patch = ProjectPatch::default();
        assert!(empty_patch.validate().is_ok());

        let bad_patch = ProjectPatch {
            name: Some("".to_string()),
            description: None,
        };
        assert!(bad_patch.validate().is_err());
    }
}
