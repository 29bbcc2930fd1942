//! Invitation tokens and the links/messages that carry them

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use super::error::InviteError;

/// Path under the app base URL where invitees land
pub const INVITED_USER_PATH: &str = "/invitations/invited-user";

/// Builds registration links from the public base URL
#[derive(Debug, Clone)]
pub struct InviteLinks {
    base_url: String,
}

impl InviteLinks {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base_url>/invitations/invited-user/<hash>`
    pub fn accept_url(&self, hash: &str) -> String {
        format!("{}{}/{}", self.base_url, INVITED_USER_PATH, hash)
    }
}

/// Token plus the link embedded in the invitation email
#[derive(Debug, Clone, PartialEq)]
pub struct EmailInvite {
    pub hash: String,
    pub action_link: String,
}

/// Token plus the complete SMS text
#[derive(Debug, Clone, PartialEq)]
pub struct PhoneInvite {
    pub hash: String,
    pub message: String,
}

/// 32 random bytes, URL-safe base64 encoded (43 chars)
pub fn generate_token() -> Result<String, InviteError> {
    let mut token_bytes = [0u8; 32];
    getrandom::getrandom(&mut token_bytes)
        .map_err(|e| InviteError::TokenGeneration(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(token_bytes))
}

pub fn build_email_invite(links: &InviteLinks) -> Result<EmailInvite, InviteError> {
    let hash = generate_token()?;
    let action_link = links.accept_url(&hash);
    Ok(EmailInvite { hash, action_link })
}

pub fn build_phone_invite(links: &InviteLinks) -> Result<PhoneInvite, InviteError> {
    let hash = generate_token()?;
    let message = format!(
        "Please, go by this link {} and get registered.",
        links.accept_url(&hash)
    );
    Ok(PhoneInvite { hash, message })
}
