//!
//! # Application Errors
//!
//! Central error type for the API. Every fallible layer (store, auth,
//! validation) converges on `AppError`, which implements
//! `actix_web::error::ResponseError` so handlers can return
//! `Result<_, AppError>` and let actix render the right status code
//! and a JSON body.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// All error conditions the API can surface to a client.
#[derive(Debug)]
pub enum AppError {
    /// Missing, malformed, expired or otherwise invalid credentials (HTTP 401).
    Unauthorized(String),
    /// Malformed request (HTTP 400).
    BadRequest(String),
    /// The requested entity (or a referenced entity) does not exist (HTTP 404).
    NotFound(String),
    /// Unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// Failure reported by the underlying store (HTTP 500).
    DatabaseError(String),
    /// Payload failed schema validation (HTTP 422).
    ValidationError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::InternalServerError(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
            // Store failures are presented to the client as generic server errors.
            AppError::DatabaseError(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
            AppError::ValidationError(msg) => HttpResponse::UnprocessableEntity().json(json!({
                "error": msg
            })),
        }
    }
}

/// `RowNotFound` maps to 404; any other database error is a 500.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// JWT processing failures (bad signature, expiry, malformed token) all
/// collapse to the same Unauthorized message; nothing about which check
/// failed reaches the client.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized("Invalid or expired token".into())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_responses() {
        let error = AppError::Unauthorized("Invalid token".into());
        assert_eq!(error.error_response().status(), 401);

        let error = AppError::BadRequest("Invalid input".into());
        assert_eq!(error.error_response().status(), 400);

        let error = AppError::NotFound("Project not found".into());
        assert_eq!(error.error_response().status(), 404);

        let error = AppError::ValidationError("title too short".into());
        assert_eq!(error.error_response().status(), 422);

        let error = AppError::InternalServerError("boom".into());
        assert_eq!(error.error_response().status(), 500);
    }

    #[test]
    fn test_sqlx_row_not_found_maps_to_404() {
        let error: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(error.error_response().status(), 404);
    }

    #[test]
    fn test_jwt_errors_collapse_to_generic_message() {
        use jsonwebtoken::errors::ErrorKind;

        for kind in [
            ErrorKind::ExpiredSignature,
            ErrorKind::InvalidSignature,
            ErrorKind::InvalidToken,
        ] {
            let error: AppError = jsonwebtoken::errors::Error::from(kind).into();
            match error {
                AppError::Unauthorized(msg) => assert_eq!(msg, "Invalid or expired token"),
                other => panic!("Expected Unauthorized, got {:?}", other),
            }
        }
    }
}
