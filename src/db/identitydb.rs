// db/identitydb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::{identitymodel::Identity, profilemodel::Role};

/// Identities are the authentication layer's own table: they are read and
/// written with the service's privileges, never under a caller's scope.
#[async_trait]
pub trait IdentityExt {
    /// Creates an identity carrying `role` as its signup claim. The signup
    /// trigger provisions the matching profile in the same statement.
    async fn save_identity(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Identity, Error>;

    async fn get_identity(
        &self,
        identity_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<Identity>, Error>;
}

#[async_trait]
impl IdentityExt for DBClient {
    async fn save_identity(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Identity, Error> {
        sqlx::query_as::<_, Identity>(
            r#"
            INSERT INTO identities (email, password, metadata)
            VALUES ($1, $2, jsonb_build_object('role', $3::text))
            RETURNING id, email, password, metadata, created_at
            "#
        )
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_identity(
        &self,
        identity_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<Identity>, Error> {
        if let Some(identity_id) = identity_id {
            return sqlx::query_as::<_, Identity>(
                r#"
                SELECT id, email, password, metadata, created_at
                FROM identities
                WHERE id = $1
                "#
            )
            .bind(identity_id)
            .fetch_optional(&self.pool)
            .await;
        }

        if let Some(email) = email {
            return sqlx::query_as::<_, Identity>(
                r#"
                SELECT id, email, password, metadata, created_at
                FROM identities
                WHERE lower(email) = lower($1)
                "#
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await;
        }

        Ok(None)
    }
}
