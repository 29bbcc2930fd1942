//! Transactional free functions for Teams domain (Zero2Prod pattern)

use crate::domain::entities::{Contact, TeamMember};
use roster_common::RepositoryError;
use sqlx::{Postgres, Transaction};

/// Delete every invitation addressed to `contact` within an existing transaction.
///
/// Emails match case-insensitively. Returns the number of rows removed; zero
/// is not an error.
pub async fn delete_invitations_for_contact_tx(
    transaction: &mut Transaction<'_, Postgres>,
    contact: &Contact,
) -> std::result::Result<u64, RepositoryError> {
    let (query, value) = match contact {
        Contact::Email(email) => (
            r#"
            DELETE FROM invitations
            WHERE lower(email) = lower($1)
            "#,
            email,
        ),
        Contact::Phone(phone) => (
            r#"
            DELETE FROM invitations
            WHERE phone = $1
            "#,
            phone,
        ),
    };

    let result = sqlx::query(query)
        .bind(value)
        .execute(&mut **transaction)
        .await?;

    Ok(result.rows_affected())
}

/// Create a team membership within an existing transaction.
pub async fn create_team_member_tx(
    transaction: &mut Transaction<'_, Postgres>,
    member: &TeamMember,
) -> std::result::Result<TeamMember, RepositoryError> {
    let created = sqlx::query_as::<_, TeamMember>(
        r#"
        INSERT INTO team_members (id, user_id, invited_id, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, invited_id, created_at
        "#,
    )
    .bind(member.id)
    .bind(member.user_id)
    .bind(member.invited_id)
    .bind(member.created_at)
    .fetch_one(&mut **transaction)
    .await?;

    Ok(created)
}
