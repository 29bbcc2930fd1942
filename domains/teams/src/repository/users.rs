//! User repository

use async_trait::async_trait;
use roster_common::RepositoryError;
use sqlx::PgPool;

use super::UserDirectory;

/// Read access to the externally managed `users` table
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE lower(email) = lower($1))
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
