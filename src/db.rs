//!
//! # Database Bootstrap
//!
//! Startup-time wiring for the Postgres store: connection with bounded
//! retries, idempotent schema creation, and seeding of the bootstrap
//! admin credential.

use sqlx::PgPool;
use std::time::Duration;

use crate::auth::{hash_password, BOOTSTRAP_PASSWORD, BOOTSTRAP_USERNAME};
use crate::error::AppError;
use crate::store::Store;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Connects to Postgres, retrying a bounded number of times with a fixed
/// delay. After the last attempt the error is returned and the caller is
/// expected to fail fast.
pub async fn connect_with_retry(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let mut attempt = 1;
    loop {
        match PgPool::connect(database_url).await {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt < CONNECT_ATTEMPTS => {
                log::warn!(
                    "database connection attempt {}/{} failed: {}",
                    attempt,
                    CONNECT_ATTEMPTS,
                    e
                );
                tokio::time::sleep(CONNECT_RETRY_DELAY).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Creates the schema if it does not exist yet. `tasks.project_id` carries
/// `ON DELETE CASCADE`, which is what makes project deletion atomic with
/// the deletion of its tasks.
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id SERIAL PRIMARY KEY,
            username VARCHAR(50) UNIQUE NOT NULL,
            password_hash VARCHAR(255) NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS projects (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name TEXT NOT NULL,
            description TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS tasks (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            project_id UUID REFERENCES projects(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            priority INTEGER NOT NULL DEFAULT 1,
            completed BOOLEAN NOT NULL DEFAULT FALSE,
            due_date DATE
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Ensures the bootstrap admin credential exists. A no-op when it already
/// does; the stored hash is never replaced.
pub async fn seed_admin(store: &dyn Store) -> Result<(), AppError> {
    let password_hash = hash_password(BOOTSTRAP_PASSWORD)?;
    let user = store
        .create_user_if_absent(BOOTSTRAP_USERNAME, &password_hash)
        .await?;
    log::info!("bootstrap credential '{}' present (id {})", user.username, user.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::store::MemStore;

    #[actix_rt::test]
    async fn test_seed_admin_is_idempotent() {
        let store = MemStore::new();

        seed_admin(&store).await.unwrap();
        let first = store.find_user(BOOTSTRAP_USERNAME).await.unwrap().unwrap();
        assert!(verify_password(BOOTSTRAP_PASSWORD, &first.password_hash).unwrap());

        // Second bootstrap must not touch the existing record.
        seed_admin(&store).await.unwrap();
        let second = store.find_user(BOOTSTRAP_USERNAME).await.unwrap().unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.password_hash, second.password_hash);
    }
}
