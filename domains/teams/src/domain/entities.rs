//! Teams domain entities: invitations and the memberships they turn into

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The single channel an invitation was sent through
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contact {
    Email(String),
    Phone(String),
}

/// Invitation entity - a pending invitation addressed to an email or phone number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Invitation {
    pub id: Uuid,
    pub email: Option<String>,
    /// International format, e.g. `+447123456789`
    pub phone: Option<String>,
    /// Registration-link token
    pub hash: String,
    /// The inviter
    pub user_id: Uuid,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub invitation_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    pub fn new(
        inviter: Uuid,
        contact: Contact,
        hash: String,
        invitation_type: Option<String>,
    ) -> Self {
        let (email, phone) = match contact {
            Contact::Email(email) => (Some(email), None),
            Contact::Phone(phone) => (None, Some(phone)),
        };

        Invitation {
            id: Uuid::new_v4(),
            email,
            phone,
            hash,
            user_id: inviter,
            invitation_type,
            created_at: Utc::now(),
        }
    }

    /// The contact this invitation addresses, if exactly one is set
    pub fn contact(&self) -> Option<Contact> {
        match (&self.email, &self.phone) {
            (Some(email), None) => Some(Contact::Email(email.clone())),
            (None, Some(phone)) => Some(Contact::Phone(phone.clone())),
            _ => None,
        }
    }

    /// Exactly one of email or phone must be set
    pub fn is_well_formed(&self) -> bool {
        self.contact().is_some() && !self.hash.is_empty()
    }
}

/// Team membership created when an invitee registers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamMember {
    pub id: Uuid,
    /// The user who accepted
    pub user_id: Uuid,
    /// The user who sent the invitation
    pub invited_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl TeamMember {
    pub fn new(user_id: Uuid, invited_id: Uuid) -> Self {
        TeamMember {
            id: Uuid::new_v4(),
            user_id,
            invited_id,
            created_at: Utc::now(),
        }
    }
}

/// Incoming invite request; the populated contact field selects the channel
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InviteRequest {
    pub email: Option<String>,
    pub spouse_email: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "type")]
    pub invitation_type: Option<String>,
}

impl InviteRequest {
    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    pub fn by_spouse_email(spouse_email: impl Into<String>) -> Self {
        Self {
            spouse_email: Some(spouse_email.into()),
            ..Self::default()
        }
    }

    pub fn by_phone(phone: impl Into<String>) -> Self {
        Self {
            phone: Some(phone.into()),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, invitation_type: impl Into<String>) -> Self {
        self.invitation_type = Some(invitation_type.into());
        self
    }
}

/// Lookup key for the idempotency check
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactQuery {
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactQuery {
    pub fn email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            phone: None,
        }
    }

    pub fn phone(phone: impl Into<String>) -> Self {
        Self {
            email: None,
            phone: Some(phone.into()),
        }
    }
}

/// Outcome of a successful invite
#[derive(Debug, Clone)]
pub struct Invited {
    pub invitation: Invitation,
    pub message: String,
    /// Normalized number, phone invitations only
    pub phone: Option<String>,
}

/// Outcome of an acceptance
#[derive(Debug, Clone, Serialize)]
pub struct Accepted {
    pub membership: TeamMember,
    pub removed_invitations: u64,
}

/// Wire shape of a successful invite
#[derive(Debug, Serialize, Deserialize)]
pub struct InviteResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invited_invitation: Option<Invitation>,
}

impl From<Invited> for InviteResponse {
    fn from(invited: Invited) -> Self {
        Self {
            success: true,
            message: invited.message,
            phone: invited.phone,
            invited_invitation: Some(invited.invitation),
        }
    }
}
