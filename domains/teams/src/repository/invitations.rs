//! Invitation repository

use async_trait::async_trait;
use roster_common::RepositoryError;
use sqlx::PgPool;
use uuid::Uuid;

use super::transactions::{create_team_member_tx, delete_invitations_for_contact_tx};
use super::InvitationStore;
use crate::domain::entities::{Contact, Invitation, TeamMember};

#[derive(Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(
        &self,
        column: &'static str,
        value: &str,
    ) -> Result<Option<Invitation>, RepositoryError> {
        let query = format!(
            r#"
            SELECT id, email, phone, hash, user_id, "type", created_at
            FROM invitations
            WHERE {} = $1
            ORDER BY created_at ASC, id ASC
            LIMIT 1
            "#,
            column
        );

        let row = sqlx::query_as::<_, Invitation>(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }
}

#[async_trait]
impl InvitationStore for InvitationRepository {
    async fn create(&self, invitation: &Invitation) -> Result<Invitation, RepositoryError> {
        if !invitation.is_well_formed() {
            return Err(RepositoryError::InvalidData(
                "An invitation needs exactly one of email or phone".to_string(),
            ));
        }

        let created = sqlx::query_as::<_, Invitation>(
            r#"
            INSERT INTO invitations (id, email, phone, hash, user_id, "type", created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, email, phone, hash, user_id, "type", created_at
            "#,
        )
        .bind(invitation.id)
        .bind(&invitation.email)
        .bind(&invitation.phone)
        .bind(&invitation.hash)
        .bind(invitation.user_id)
        .bind(&invitation.invitation_type)
        .bind(invitation.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Invitation>, RepositoryError> {
        self.find_one("lower(email)", &email.to_lowercase()).await
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Invitation>, RepositoryError> {
        self.find_one("phone", phone).await
    }

    async fn find_by_hash(&self, hash: &str) -> Result<Option<Invitation>, RepositoryError> {
        self.find_one("hash", hash).await
    }

    async fn list_by_inviter(&self, user_id: Uuid) -> Result<Vec<Invitation>, RepositoryError> {
        let rows = sqlx::query_as::<_, Invitation>(
            r#"
            SELECT id, email, phone, hash, user_id, "type", created_at
            FROM invitations
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn accept(
        &self,
        contact: &Contact,
        membership: &TeamMember,
    ) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let removed = delete_invitations_for_contact_tx(&mut tx, contact).await?;
        create_team_member_tx(&mut tx, membership).await?;

        tx.commit().await?;

        Ok(removed)
    }
}
