use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored credential record. Exactly one (the bootstrap admin) exists
/// after first start; there is no self-service registration.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// bcrypt hash, never exposed in responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
}
