//! Authentication for the Roster API
//!
//! Resolves the authenticated actor from a bearer JWT. The extractors work
//! with any domain state implementing `FromRef<S>` for `AuthBackend`.

mod actor;
mod backend;
mod claims;
mod config;
mod error;
mod extractors;
mod jwt;

pub use actor::Actor;
pub use backend::AuthBackend;
pub use claims::AccessClaims;
pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::AuthUser;
