use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;

/// The identity resolved by `AuthGate` for the current request.
///
/// The gate validates the bearer token, looks the subject up in the
/// credential store and inserts this value into request extensions.
/// Handlers behind the gate receive it through this extractor; if it is
/// missing the gate did not run, which is treated as Unauthorized.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub username: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>().cloned() {
            Some(user) => ready(Ok(user)),
            None => {
                let err = AppError::Unauthorized(
                    "Authentication required. Ensure AuthGate is active.".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}
