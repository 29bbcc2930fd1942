//! Common error type and its HTTP mapping for Roster
//!
//! Every JSON error body in the API has the same shape:
//! `{"success": false, "code": "...", "message": ["..."]}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Database(_) => "DATABASE_ERROR",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Conflict(_) => "CONFLICT",
        }
    }
}

/// Build the shared error body
pub fn error_body(status: StatusCode, code: &str, messages: serde_json::Value) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "code": code,
            "message": messages,
        })),
    )
        .into_response()
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Driver errors can carry connection details; log them, return a generic message.
        let message = match &self {
            Error::Database(e) => {
                tracing::error!(error = %e, "Database failure while serving request");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        error_body(status, self.error_code(), json!([message]))
    }
}
