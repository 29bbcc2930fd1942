//! Validation rules for invite requests

use validator::{Validate, ValidationErrors};

use super::error::{FieldErrors, InviteError};

pub const EMAIL_TAKEN_MESSAGE: &str = "The email has already been taken.";

/// Spouse invitations only need a well-formed address
#[derive(Debug, Validate)]
pub struct SpouseEmailInput {
    #[validate(email(message = "The spouse email must be a valid email address."))]
    pub spouse_email: String,
}

/// Direct email invitations; uniqueness against registered users is checked separately
#[derive(Debug, Validate)]
pub struct EmailInput {
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email must be a valid email address.")
    )]
    pub email: Option<String>,
}

#[derive(Debug, Validate)]
pub struct PhoneInput {
    #[validate(
        required(message = "The phone field is required."),
        length(min = 11, message = "The phone number must contain at least 11 characters")
    )]
    pub phone: Option<String>,
}

/// Canonical form of an address: trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Flatten validator output into messages per field
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Run derive-based validation, mapping failures to `InviteError::Validation`
pub fn check<T: Validate>(input: &T) -> Result<(), InviteError> {
    input
        .validate()
        .map_err(|errors| InviteError::Validation(field_errors(&errors)))
}
