//! In-memory stores for tests and local development
//!
//! Enforce the same uniqueness rules as the `invitations` table so the
//! workflow behaves identically against either backend.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use roster_common::RepositoryError;
use uuid::Uuid;

use super::{InvitationStore, UserDirectory};
use crate::domain::entities::{Contact, Invitation, TeamMember};

#[derive(Debug, Default)]
struct MemoryState {
    invitations: Vec<Invitation>,
    members: Vec<TeamMember>,
}

/// Invitation store backed by a mutex-guarded vector
#[derive(Debug, Clone, Default)]
pub struct InMemoryInvitationStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryInvitationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored invitation
    pub fn invitations(&self) -> Vec<Invitation> {
        self.state.lock().unwrap().invitations.clone()
    }

    /// Snapshot of every membership created by acceptance
    pub fn members(&self) -> Vec<TeamMember> {
        self.state.lock().unwrap().members.clone()
    }

    pub fn invitation_count(&self) -> usize {
        self.state.lock().unwrap().invitations.len()
    }

    fn find(&self, predicate: impl Fn(&Invitation) -> bool) -> Option<Invitation> {
        self.state
            .lock()
            .unwrap()
            .invitations
            .iter()
            .find(|i| predicate(i))
            .cloned()
    }
}

fn same_email(stored: Option<&str>, email: &str) -> bool {
    stored.is_some_and(|stored| stored.to_lowercase() == email.to_lowercase())
}

fn addresses(invitation: &Invitation, contact: &Contact) -> bool {
    match contact {
        Contact::Email(email) => same_email(invitation.email.as_deref(), email),
        Contact::Phone(phone) => invitation.phone.as_deref() == Some(phone.as_str()),
    }
}

fn conflicts(existing: &Invitation, candidate: &Invitation) -> bool {
    existing.hash == candidate.hash
        || candidate
            .contact()
            .is_some_and(|contact| addresses(existing, &contact))
}

#[async_trait]
impl InvitationStore for InMemoryInvitationStore {
    async fn create(&self, invitation: &Invitation) -> Result<Invitation, RepositoryError> {
        if !invitation.is_well_formed() {
            return Err(RepositoryError::InvalidData(
                "An invitation needs exactly one of email or phone".to_string(),
            ));
        }

        let mut state = self.state.lock().unwrap();
        if state.invitations.iter().any(|i| conflicts(i, invitation)) {
            return Err(RepositoryError::AlreadyExists);
        }
        state.invitations.push(invitation.clone());

        Ok(invitation.clone())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Invitation>, RepositoryError> {
        Ok(self.find(|i| same_email(i.email.as_deref(), email)))
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Invitation>, RepositoryError> {
        Ok(self.find(|i| i.phone.as_deref() == Some(phone)))
    }

    async fn find_by_hash(&self, hash: &str) -> Result<Option<Invitation>, RepositoryError> {
        Ok(self.find(|i| i.hash == hash))
    }

    async fn list_by_inviter(&self, user_id: Uuid) -> Result<Vec<Invitation>, RepositoryError> {
        let mut rows: Vec<Invitation> = self
            .state
            .lock()
            .unwrap()
            .invitations
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(rows)
    }

    async fn accept(
        &self,
        contact: &Contact,
        membership: &TeamMember,
    ) -> Result<u64, RepositoryError> {
        let mut state = self.state.lock().unwrap();

        let before = state.invitations.len();
        state.invitations.retain(|i| !addresses(i, contact));
        let removed = (before - state.invitations.len()) as u64;

        state.members.push(membership.clone());

        Ok(removed)
    }
}

/// Registered-user directory backed by a set of emails
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    emails: Arc<RwLock<HashSet<String>>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, email: impl Into<String>) {
        let email: String = email.into();
        self.emails.write().unwrap().insert(email.to_lowercase());
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        Ok(self.emails.read().unwrap().contains(&email.to_lowercase()))
    }
}
