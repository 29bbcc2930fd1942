//! Bearer token parsing and HS256 verification

use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::claims::AccessClaims;
use crate::config::AuthConfig;
use crate::error::AuthError;

const BEARER_PREFIX: &str = "Bearer ";

/// Pull the token out of `Authorization: Bearer <token>`
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthorization)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthorizationFormat)?;

    match value.strip_prefix(BEARER_PREFIX).map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::InvalidAuthorizationFormat),
    }
}

fn validation_for(config: &AuthConfig) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);

    match &config.audience {
        Some(audience) => validation.set_audience(&[audience]),
        None => validation.validate_aud = false,
    }
    if let Some(issuer) = &config.issuer {
        validation.set_issuer(&[issuer]);
    }

    validation
}

/// Verify signature, expiry and the configured audience/issuer
pub(crate) fn verify_access_token(
    token: &str,
    config: &AuthConfig,
) -> Result<AccessClaims, AuthError> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

    decode::<AccessClaims>(token, &key, &validation_for(config))
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            AuthError::InvalidToken
        })
}
