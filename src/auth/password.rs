use crate::error::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};
use std::sync::OnceLock;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

/// A throwaway hash to verify against when no credential matches, so a
/// login attempt for an unknown username costs the same bcrypt work as a
/// wrong password and response timing does not reveal whether the account
/// exists.
pub fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| {
        hash("atelier-timing-equalizer", DEFAULT_COST).expect("bcrypt hash of a fixed input")
    })
}

pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
}
