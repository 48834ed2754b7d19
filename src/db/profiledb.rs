// db/profiledb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::profilemodel::{Profile, Role, UserSummary};

#[async_trait]
pub trait ProfileExt {
    /// Reads `profile_id` as `caller`. The policies only reveal the caller's
    /// own row (or every row to an admin), so a missing row and a hidden row
    /// both come back as `None`.
    async fn get_profile(
        &self,
        caller: Uuid,
        profile_id: Uuid,
    ) -> Result<Option<Profile>, Error>;

    async fn update_profile_role(
        &self,
        caller: Uuid,
        profile_id: Uuid,
        role: Role,
    ) -> Result<Option<Profile>, Error>;

    /// Calls the `get_all_users` procedure, which rejects non-admin callers.
    async fn get_all_users(&self, caller: Uuid) -> Result<Vec<UserSummary>, Error>;

    /// Calls the `delete_user` procedure, which rejects non-admin callers.
    async fn delete_user(&self, caller: Uuid, target: Uuid) -> Result<(), Error>;
}

#[async_trait]
impl ProfileExt for DBClient {
    async fn get_profile(
        &self,
        caller: Uuid,
        profile_id: Uuid,
    ) -> Result<Option<Profile>, Error> {
        let mut tx = self.begin_as(caller).await?;

        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, role, created_at
            FROM profiles
            WHERE id = $1
            "#
        )
        .bind(profile_id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(profile)
    }

    async fn update_profile_role(
        &self,
        caller: Uuid,
        profile_id: Uuid,
        role: Role,
    ) -> Result<Option<Profile>, Error> {
        let mut tx = self.begin_as(caller).await?;

        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET role = $2
            WHERE id = $1
            RETURNING id, role, created_at
            "#
        )
        .bind(profile_id)
        .bind(role)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(profile)
    }

    async fn get_all_users(&self, caller: Uuid) -> Result<Vec<UserSummary>, Error> {
        let mut tx = self.begin_as(caller).await?;

        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, email, role, created_at
            FROM get_all_users()
            "#
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(users)
    }

    async fn delete_user(&self, caller: Uuid, target: Uuid) -> Result<(), Error> {
        let mut tx = self.begin_as(caller).await?;

        sqlx::query("SELECT delete_user($1)")
            .bind(target)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
