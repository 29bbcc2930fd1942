//! Route definitions for Teams domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::invitations;
use super::middleware::TeamsState;

/// Create invitation routes
fn invitation_routes() -> Router<TeamsState> {
    Router::new()
        .route(
            "/v1/invitations",
            get(invitations::list_invitations).post(invitations::invite),
        )
        .route("/v1/invitations/accept", post(invitations::accept_invitation))
        .route(
            "/v1/invitations/invited-user/{hash}",
            get(invitations::invited_user),
        )
}

/// Create all Teams domain API routes
pub fn routes() -> Router<TeamsState> {
    Router::new().merge(invitation_routes())
}
