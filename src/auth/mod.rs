pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::User;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthGate;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims};

/// Username of the bootstrap credential seeded at first start.
pub const BOOTSTRAP_USERNAME: &str = "admin";
/// Well-known initial password of the bootstrap credential.
pub const BOOTSTRAP_PASSWORD: &str = "1234";

/// Payload for a login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username of the credential to authenticate.
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    /// Plaintext password, verified against the stored hash.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Public view of a credential record. Never carries the password hash.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Response to a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The signed bearer token for subsequent requests.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
    pub user: UserResponse,
}
