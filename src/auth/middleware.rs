use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::sync::Arc;

use crate::auth::extractors::AuthenticatedUser;
use crate::auth::token::verify_token;
use crate::error::AppError;
use crate::store::Store;

/// Request gate for everything mounted under the API scope.
///
/// Every request must carry `Authorization: Bearer <token>`. The token's
/// signature and expiry are verified, then its subject is resolved against
/// the credential store; a token whose subject no longer exists is rejected
/// the same way as an invalid one. On success the resolved identity is
/// placed into request extensions for the `AuthenticatedUser` extractor.
/// Rejected requests never reach a handler.
///
/// The login endpoint is the only exemption: it is how a token is obtained
/// in the first place.
pub struct AuthGate {
    store: Arc<dyn Store>,
}

impl AuthGate {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthGateService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateService {
            service: Rc::new(service),
            store: Arc::clone(&self.store),
        }))
    }
}

pub struct AuthGateService<S> {
    service: Rc<S>,
    store: Arc<dyn Store>,
}

impl<S, B> Service<ServiceRequest> for AuthGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Login must stay reachable without a token.
        if req.path().ends_with("/auth/login") {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let service = Rc::clone(&self.service);
        let store = Arc::clone(&self.store);

        Box::pin(async move {
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(str::to_owned)
                .ok_or_else(|| AppError::Unauthorized("Missing bearer token".into()))?;

            let claims = verify_token(&token)?;

            // The subject must still resolve to a live credential record.
            let user = store
                .find_user(&claims.sub)
                .await?
                .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".into()))?;

            req.extensions_mut().insert(AuthenticatedUser {
                id: user.id,
                username: user.username,
            });

            service.call(req).await
        })
    }
}
