//! Invitation API handlers
//!
//! - POST /v1/invitations - Invite by email, spouse email or phone
//! - GET /v1/invitations - List invitations sent by the caller
//! - POST /v1/invitations/accept - Join as a member of the inviter's team
//! - GET /v1/invitations/invited-user/{hash} - Resolve a registration link

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::api::middleware::{AuthUser, TeamsState};
use crate::domain::entities::{Accepted, Invitation, InviteRequest, InviteResponse};
use crate::domain::error::InviteError;
use crate::domain::validation;

/// Request for accepting an invitation
#[derive(Debug, Deserialize, Validate)]
pub struct AcceptInvitationRequest {
    /// Token from the registration link
    #[validate(length(min = 1, message = "The hash field is required."))]
    pub hash: String,
}

/// Send an invitation
///
/// **POST /v1/invitations**
pub async fn invite(
    AuthUser(actor): AuthUser,
    State(state): State<TeamsState>,
    Json(request): Json<InviteRequest>,
) -> Result<(StatusCode, Json<InviteResponse>), InviteError> {
    let invited = state.invitations.invite(&actor, request).await?;

    Ok((StatusCode::CREATED, Json(InviteResponse::from(invited))))
}

/// List invitations sent by the authenticated user
///
/// **GET /v1/invitations**
pub async fn list_invitations(
    AuthUser(actor): AuthUser,
    State(state): State<TeamsState>,
) -> Result<Json<Vec<Invitation>>, InviteError> {
    let invitations = state.invitations.list(actor.id).await?;

    Ok(Json(invitations))
}

/// Accept an invitation as the authenticated user
///
/// **POST /v1/invitations/accept**
///
/// Resolves the link token, deletes every invitation for its contact and
/// records the caller as a team member of the inviter. Email invitations must
/// be accepted from the invited address.
pub async fn accept_invitation(
    AuthUser(actor): AuthUser,
    State(state): State<TeamsState>,
    Json(request): Json<AcceptInvitationRequest>,
) -> Result<Json<Accepted>, InviteError> {
    validation::check(&request)?;

    let accepted = state
        .invitations
        .accept_by_hash(&actor, &request.hash)
        .await?;

    Ok(Json(accepted))
}

/// Resolve the token from a registration link
///
/// **GET /v1/invitations/invited-user/{hash}**
pub async fn invited_user(
    State(state): State<TeamsState>,
    Path(hash): Path<String>,
) -> Result<Json<Invitation>, InviteError> {
    let invitation = state
        .invitations
        .find_by_hash(&hash)
        .await?
        .ok_or(InviteError::NotFound)?;

    Ok(Json(invitation))
}
