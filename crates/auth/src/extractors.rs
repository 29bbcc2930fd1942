//! `AuthUser` extractor
//!
//! Works for any router state that can hand out an `AuthBackend` via `FromRef`.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::actor::Actor;
use crate::backend::AuthBackend;
use crate::error::AuthError;
use crate::jwt::bearer_token;

/// The authenticated caller of a handler
#[derive(Debug, Clone)]
pub struct AuthUser(pub Actor);

impl<S> FromRequestParts<S> for AuthUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        AuthBackend::from_ref(state)
            .authenticate_jwt(token)
            .map(AuthUser)
    }
}
