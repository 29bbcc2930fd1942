//! Concrete authentication backend
//!
//! Holds the JWT configuration and turns a bearer token into an `Actor`.

use uuid::Uuid;

use crate::actor::Actor;
use crate::config::AuthConfig;
use crate::error::AuthError;

/// Concrete authentication backend.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthBackend {
    config: AuthConfig,
}

impl AuthBackend {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Validate a JWT and resolve the actor it names.
    pub fn authenticate_jwt(&self, token: &str) -> Result<Actor, AuthError> {
        let claims = crate::jwt::verify_access_token(token, &self.config)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidUserId)?;

        tracing::debug!(user_id = %user_id, "Authenticated actor from JWT");

        Ok(Actor::new(user_id, claims.email))
    }
}
