//! Invitation workflow: validate, check for prior invitations, dispatch, persist
//!
//! Every operation takes the acting user explicitly. The prior-invitation
//! check runs before anything is sent; the store's uniqueness constraints
//! close the remaining race between two concurrent invites for one contact.

use std::sync::Arc;

use roster_auth::Actor;
use roster_common::{Config, RepositoryError};
use roster_email::EmailService;
use roster_sms::{SmsError, SmsService};
use uuid::Uuid;

use crate::domain::entities::{
    Accepted, Contact, ContactQuery, Invitation, InviteRequest, Invited, TeamMember,
};
use crate::domain::error::InviteError;
use crate::domain::phone::{compact_phone, normalize_phone};
use crate::domain::token::{build_email_invite, build_phone_invite, InviteLinks};
use crate::domain::validation::{
    self, normalize_email, EmailInput, PhoneInput, SpouseEmailInput, EMAIL_TAKEN_MESSAGE,
};
use crate::repository::{InvitationStore, UserDirectory};

pub const EMAIL_SENT_MESSAGE: &str = "We have sent an invitation to the user";

/// Settings the workflow needs from the environment
#[derive(Debug, Clone)]
pub struct InvitationSettings {
    pub app_base_url: String,
    pub phone_country_code: String,
}

impl From<&Config> for InvitationSettings {
    fn from(config: &Config) -> Self {
        Self {
            app_base_url: config.app_base_url.clone(),
            phone_country_code: config.phone_country_code.clone(),
        }
    }
}

#[derive(Clone)]
pub struct InvitationService {
    store: Arc<dyn InvitationStore>,
    users: Arc<dyn UserDirectory>,
    email: Arc<dyn EmailService>,
    sms: Arc<dyn SmsService>,
    links: InviteLinks,
    country_code: String,
}

/// A lost insert race means someone else invited the same contact first
fn conflict_as_already_invited(err: RepositoryError) -> InviteError {
    match err {
        RepositoryError::AlreadyExists => InviteError::AlreadyInvited,
        other => InviteError::Repository(other),
    }
}

impl InvitationService {
    pub fn new(
        store: Arc<dyn InvitationStore>,
        users: Arc<dyn UserDirectory>,
        email: Arc<dyn EmailService>,
        sms: Arc<dyn SmsService>,
        settings: InvitationSettings,
    ) -> Self {
        Self {
            store,
            users,
            email,
            sms,
            links: InviteLinks::new(settings.app_base_url),
            country_code: settings.phone_country_code,
        }
    }

    pub fn links(&self) -> &InviteLinks {
        &self.links
    }

    /// Route a request to the email or phone path by which contact is present
    pub async fn invite(
        &self,
        actor: &Actor,
        request: InviteRequest,
    ) -> Result<Invited, InviteError> {
        if request.spouse_email.is_some() || request.email.is_some() {
            self.invite_by_email(actor, request).await
        } else if request.phone.is_some() {
            self.invite_by_phone(actor, request).await
        } else {
            Err(InviteError::MissingContact)
        }
    }

    pub async fn invite_by_email(
        &self,
        actor: &Actor,
        request: InviteRequest,
    ) -> Result<Invited, InviteError> {
        let target = match request.spouse_email.as_deref().map(normalize_email) {
            Some(spouse_email) => {
                validation::check(&SpouseEmailInput {
                    spouse_email: spouse_email.clone(),
                })?;
                spouse_email
            }
            None => {
                let email = request.email.as_deref().map(normalize_email);
                validation::check(&EmailInput {
                    email: email.clone(),
                })?;
                let email =
                    email.ok_or_else(|| InviteError::field("email", "The email field is required."))?;

                if self.users.email_exists(&email).await? {
                    return Err(InviteError::field("email", EMAIL_TAKEN_MESSAGE));
                }
                email
            }
        };

        if self
            .find_existing(&ContactQuery::email(target.as_str()))
            .await?
            .is_some()
        {
            tracing::info!(inviter = %actor.id, "Email already invited, nothing sent");
            return Err(InviteError::AlreadyInvited);
        }

        let invite = build_email_invite(&self.links)?;

        self.email
            .send_invitation(&target, actor.email.as_deref(), &invite.action_link)
            .await
            .map_err(|e| {
                tracing::warn!(inviter = %actor.id, error = %e, "Invitation email not sent");
                InviteError::DeliveryFailure(e.to_string())
            })?;

        let invitation = Invitation::new(
            actor.id,
            Contact::Email(target),
            invite.hash,
            request.invitation_type,
        );
        let stored = self
            .store
            .create(&invitation)
            .await
            .map_err(conflict_as_already_invited)?;

        tracing::info!(
            invitation_id = %stored.id,
            inviter = %actor.id,
            "Invitation sent by email"
        );

        Ok(Invited {
            invitation: stored,
            message: EMAIL_SENT_MESSAGE.to_string(),
            phone: None,
        })
    }

    pub async fn invite_by_phone(
        &self,
        actor: &Actor,
        request: InviteRequest,
    ) -> Result<Invited, InviteError> {
        let compact = request.phone.as_deref().map(compact_phone);
        validation::check(&PhoneInput {
            phone: compact.clone(),
        })?;
        let compact =
            compact.ok_or_else(|| InviteError::field("phone", "The phone field is required."))?;
        let raw = request.phone.unwrap_or_default();

        let to = normalize_phone(&compact, &self.country_code);

        if self
            .find_existing(&ContactQuery::phone(to.as_str()))
            .await?
            .is_some()
        {
            tracing::info!(inviter = %actor.id, "Phone already invited, nothing sent");
            return Err(InviteError::AlreadyInvited);
        }

        let invite = build_phone_invite(&self.links)?;

        match self.sms.send_sms(&to, &invite.message).await {
            Ok(receipt) => {
                tracing::debug!(message_id = %receipt.message_id, provider = %receipt.provider, "SMS accepted");
            }
            Err(SmsError::FormatRejected(reason)) => {
                tracing::info!(inviter = %actor.id, reason = %reason, "SMS provider rejected number");
                return Err(InviteError::DeliveryRejected { number: raw });
            }
            Err(e) => {
                tracing::warn!(inviter = %actor.id, error = %e, "Invitation SMS not sent");
                return Err(InviteError::DeliveryFailure(e.to_string()));
            }
        }

        let invitation = Invitation::new(actor.id, Contact::Phone(to.clone()), invite.hash, None);
        let stored = self
            .store
            .create(&invitation)
            .await
            .map_err(conflict_as_already_invited)?;

        tracing::info!(
            invitation_id = %stored.id,
            inviter = %actor.id,
            "Invitation sent by SMS"
        );

        Ok(Invited {
            invitation: stored,
            message: format!("Invitation on {} successfully sent", to),
            phone: Some(to),
        })
    }

    /// Prior invitation for exactly one contact
    pub async fn find_existing(
        &self,
        query: &ContactQuery,
    ) -> Result<Option<Invitation>, InviteError> {
        let found = match (query.email.as_deref(), query.phone.as_deref()) {
            (Some(email), None) => self.store.find_by_email(&normalize_email(email)).await?,
            (None, Some(phone)) => self.store.find_by_phone(phone).await?,
            _ => return Err(InviteError::MissingContact),
        };
        Ok(found)
    }

    /// Remove the invitations for `email` and record `accepting` as a member
    /// invited by `inviting`, in one transaction.
    pub async fn accept(
        &self,
        email: &str,
        accepting: Uuid,
        inviting: Uuid,
    ) -> Result<Accepted, InviteError> {
        self.complete(&Contact::Email(normalize_email(email)), accepting, inviting)
            .await
    }

    /// Accept the invitation behind a registration-link token as `actor`.
    ///
    /// The inviter and contact come from the stored invitation. An email
    /// invitation may only be accepted by the user signed in with that address.
    pub async fn accept_by_hash(&self, actor: &Actor, hash: &str) -> Result<Accepted, InviteError> {
        let invitation = self
            .store
            .find_by_hash(hash)
            .await?
            .ok_or(InviteError::NotFound)?;
        let contact = invitation.contact().ok_or(InviteError::NotFound)?;

        if let Contact::Email(invited) = &contact {
            let own = actor.email.as_deref().map(normalize_email);
            if own.as_deref() != Some(normalize_email(invited).as_str()) {
                tracing::warn!(
                    user_id = %actor.id,
                    invitation_id = %invitation.id,
                    "Invitation accepted by a different email address"
                );
                return Err(InviteError::WrongRecipient);
            }
        }

        self.complete(&contact, actor.id, invitation.user_id).await
    }

    async fn complete(
        &self,
        contact: &Contact,
        accepting: Uuid,
        inviting: Uuid,
    ) -> Result<Accepted, InviteError> {
        let membership = TeamMember::new(accepting, inviting);
        let removed = self.store.accept(contact, &membership).await?;

        tracing::info!(
            member_id = %membership.id,
            user_id = %accepting,
            invited_id = %inviting,
            removed_invitations = removed,
            "Invitation accepted"
        );

        Ok(Accepted {
            membership,
            removed_invitations: removed,
        })
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Invitation>, InviteError> {
        Ok(self.store.list_by_inviter(user_id).await?)
    }

    pub async fn find_by_hash(&self, hash: &str) -> Result<Option<Invitation>, InviteError> {
        Ok(self.store.find_by_hash(hash).await?)
    }
}
