//! Authentication errors

use axum::{
    http::{header::WWW_AUTHENTICATE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Why a request could not be tied to an actor
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header required")]
    MissingAuthorization,

    #[error("Authorization header must use the Bearer scheme")]
    InvalidAuthorizationFormat,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token subject is not a user id")]
    InvalidUserId,
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthorization => "MISSING_AUTHORIZATION",
            AuthError::InvalidAuthorizationFormat => "INVALID_AUTHORIZATION",
            AuthError::InvalidToken | AuthError::InvalidUserId => "INVALID_TOKEN",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!(reason = %self, "Rejecting unauthenticated request");

        (
            StatusCode::UNAUTHORIZED,
            [(WWW_AUTHENTICATE, "Bearer")],
            Json(json!({
                "success": false,
                "code": self.code(),
                "message": [self.to_string()],
            })),
        )
            .into_response()
    }
}
