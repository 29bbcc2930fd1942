//! Invitation workflow errors and their HTTP mapping

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use roster_common::{error_body, Error, RepositoryError};
use serde_json::json;

/// Validation messages keyed by request field
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, thiserror::Error)]
pub enum InviteError {
    #[error("Validation failed: {}", summarize(.0))]
    Validation(FieldErrors),

    #[error("Either an email, a spouse email or a phone number is required")]
    MissingContact,

    #[error("This user was already invited")]
    AlreadyInvited,

    #[error("The \"{number}\" number is incorrect. Please enter in the normal UK format. XXXXX XXXXXX")]
    DeliveryRejected { number: String },

    #[error("Invitation delivery failed: {0}")]
    DeliveryFailure(String),

    #[error("Invitation not found")]
    NotFound,

    #[error("This invitation was sent to a different email address")]
    WrongRecipient,

    #[error("Failed to generate invitation token: {0}")]
    TokenGeneration(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

impl InviteError {
    /// Field errors for a single field
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        InviteError::Validation(errors)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            InviteError::Validation(_)
            | InviteError::MissingContact
            | InviteError::DeliveryRejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            InviteError::AlreadyInvited => StatusCode::CONFLICT,
            InviteError::DeliveryFailure(_) => StatusCode::BAD_GATEWAY,
            InviteError::NotFound => StatusCode::NOT_FOUND,
            InviteError::WrongRecipient => StatusCode::FORBIDDEN,
            InviteError::TokenGeneration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            InviteError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            InviteError::Repository(RepositoryError::AlreadyExists) => StatusCode::CONFLICT,
            InviteError::Repository(RepositoryError::InvalidData(_)) => StatusCode::BAD_REQUEST,
            InviteError::Repository(RepositoryError::Connection(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            InviteError::Validation(_) | InviteError::MissingContact => "VALIDATION_ERROR",
            InviteError::AlreadyInvited => "ALREADY_INVITED",
            InviteError::DeliveryRejected { .. } => "DELIVERY_REJECTED",
            InviteError::DeliveryFailure(_) => "DELIVERY_FAILED",
            InviteError::NotFound => "NOT_FOUND",
            InviteError::WrongRecipient => "FORBIDDEN",
            InviteError::TokenGeneration(_) => "INTERNAL_ERROR",
            InviteError::Repository(_) => "REPOSITORY_ERROR",
        }
    }
}

impl IntoResponse for InviteError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        let message = match self {
            InviteError::Validation(errors) => json!(errors),
            InviteError::Repository(err) => return Error::from(err).into_response(),
            InviteError::DeliveryFailure(ref reason) => {
                tracing::error!(reason = %reason, "Invitation delivery failed");
                json!(["We could not deliver the invitation, please try again later"])
            }
            InviteError::TokenGeneration(ref reason) => {
                tracing::error!(reason = %reason, "Invitation token generation failed");
                json!(["Internal server error"])
            }
            other => json!([other.to_string()]),
        };

        error_body(status, code, message)
    }
}
