//! Repository implementations for Teams domain

pub mod invitations;
pub mod memory;
pub mod transactions;
pub mod users;

use async_trait::async_trait;
use roster_common::RepositoryError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{Contact, Invitation, TeamMember};

pub use invitations::InvitationRepository;
pub use memory::{InMemoryInvitationStore, InMemoryUserDirectory};
pub use transactions::{create_team_member_tx, delete_invitations_for_contact_tx};
pub use users::UserRepository;

/// Persistence for invitations and the memberships they become
#[async_trait]
pub trait InvitationStore: Send + Sync {
    /// Insert a new invitation.
    ///
    /// Returns `RepositoryError::AlreadyExists` when the hash, email or phone
    /// is already taken by another invitation.
    async fn create(&self, invitation: &Invitation) -> Result<Invitation, RepositoryError>;

    /// Case-insensitive on the address
    async fn find_by_email(&self, email: &str) -> Result<Option<Invitation>, RepositoryError>;

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Invitation>, RepositoryError>;

    async fn find_by_hash(&self, hash: &str) -> Result<Option<Invitation>, RepositoryError>;

    /// All invitations sent by one user, oldest first
    async fn list_by_inviter(&self, user_id: Uuid) -> Result<Vec<Invitation>, RepositoryError>;

    /// Atomically delete every invitation for `contact` and insert `membership`.
    ///
    /// Returns the number of invitations removed.
    async fn accept(
        &self,
        contact: &Contact,
        membership: &TeamMember,
    ) -> Result<u64, RepositoryError>;
}

/// Read-only view of registered users
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Case-insensitive on the address
    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError>;
}

/// Combined repository access for the Teams domain
#[derive(Clone)]
pub struct TeamsRepositories {
    pub users: UserRepository,
    pub invitations: InvitationRepository,
}

impl TeamsRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            invitations: InvitationRepository::new(pool),
        }
    }
}
