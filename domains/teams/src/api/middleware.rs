//! Teams domain state and auth backend integration

use crate::service::InvitationService;
use axum::extract::FromRef;
use roster_auth::AuthBackend;

pub use roster_auth::AuthUser;

/// Application state for the Teams domain
#[derive(Clone)]
pub struct TeamsState {
    pub invitations: InvitationService,
    pub auth: AuthBackend,
}

impl FromRef<TeamsState> for AuthBackend {
    fn from_ref(state: &TeamsState) -> Self {
        state.auth.clone()
    }
}
