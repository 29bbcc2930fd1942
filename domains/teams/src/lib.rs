//! Teams domain: invitations by email or phone, acceptance into team membership

pub mod api;
pub mod domain;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use domain::error::{FieldErrors, InviteError};
pub use domain::phone::{compact_phone, normalize_phone};
pub use domain::validation::normalize_email;
pub use domain::token::{build_email_invite, build_phone_invite, EmailInvite, InviteLinks, PhoneInvite};

// Re-export repository types
pub use repository::{
    InMemoryInvitationStore, InMemoryUserDirectory, InvitationRepository, InvitationStore,
    TeamsRepositories, UserDirectory, UserRepository,
};

pub use service::{InvitationService, InvitationSettings};

// Re-export API types
pub use api::routes;
pub use api::TeamsState;
