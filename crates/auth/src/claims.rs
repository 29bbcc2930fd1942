//! JWT claims types

use serde::{Deserialize, Serialize};

/// Access token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Email
    pub email: Option<String>,
    /// Issued at
    pub iat: u64,
    /// Expires at
    pub exp: u64,
    /// Audience
    pub aud: String,
}
