// db/contractordb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::{
    dtos::dispatchdtos::{ClearableContractorField, CreateContractorDto, UpdateContractorDto},
    models::contractormodel::{Contractor, DEFAULT_RATING},
};

#[async_trait]
pub trait ContractorExt {
    async fn get_contractors(&self, caller: Uuid) -> Result<Vec<Contractor>, Error>;

    async fn get_contractor(
        &self,
        caller: Uuid,
        contractor_id: i64,
    ) -> Result<Option<Contractor>, Error>;

    async fn get_contractor_by_user(
        &self,
        caller: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Contractor>, Error>;

    async fn create_contractor(
        &self,
        caller: Uuid,
        contractor: &CreateContractorDto,
    ) -> Result<Contractor, Error>;

    async fn update_contractor(
        &self,
        caller: Uuid,
        contractor_id: i64,
        changes: &UpdateContractorDto,
    ) -> Result<Option<Contractor>, Error>;

    /// Jobs pointing at the contractor keep existing with their reference cleared.
    async fn delete_contractor(&self, caller: Uuid, contractor_id: i64) -> Result<bool, Error>;
}

#[async_trait]
impl ContractorExt for DBClient {
    async fn get_contractors(&self, caller: Uuid) -> Result<Vec<Contractor>, Error> {
        let mut tx = self.begin_as(caller).await?;

        let contractors = sqlx::query_as::<_, Contractor>(
            r#"
            SELECT id, user_id, name, specialty, rating, avatar, created_at
            FROM contractors
            ORDER BY name ASC
            "#
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(contractors)
    }

    async fn get_contractor(
        &self,
        caller: Uuid,
        contractor_id: i64,
    ) -> Result<Option<Contractor>, Error> {
        let mut tx = self.begin_as(caller).await?;

        let contractor = sqlx::query_as::<_, Contractor>(
            r#"
            SELECT id, user_id, name, specialty, rating, avatar, created_at
            FROM contractors
            WHERE id = $1
            "#
        )
        .bind(contractor_id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(contractor)
    }

    async fn get_contractor_by_user(
        &self,
        caller: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Contractor>, Error> {
        let mut tx = self.begin_as(caller).await?;

        let contractor = sqlx::query_as::<_, Contractor>(
            r#"
            SELECT id, user_id, name, specialty, rating, avatar, created_at
            FROM contractors
            WHERE user_id = $1
            "#
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(contractor)
    }

    async fn create_contractor(
        &self,
        caller: Uuid,
        contractor: &CreateContractorDto,
    ) -> Result<Contractor, Error> {
        let mut tx = self.begin_as(caller).await?;

        let created = sqlx::query_as::<_, Contractor>(
            r#"
            INSERT INTO contractors (name, specialty, rating, avatar, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, name, specialty, rating, avatar, created_at
            "#
        )
        .bind(&contractor.name)
        .bind(&contractor.specialty)
        .bind(contractor.rating.unwrap_or(DEFAULT_RATING))
        .bind(&contractor.avatar)
        .bind(contractor.user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn update_contractor(
        &self,
        caller: Uuid,
        contractor_id: i64,
        changes: &UpdateContractorDto,
    ) -> Result<Option<Contractor>, Error> {
        let mut tx = self.begin_as(caller).await?;

        let updated = sqlx::query_as::<_, Contractor>(
            r#"
            UPDATE contractors
            SET name = COALESCE($2, name),
                specialty = COALESCE($3, specialty),
                rating = COALESCE($4, rating),
                avatar = CASE WHEN $7 THEN NULL ELSE COALESCE($5, avatar) END,
                user_id = CASE WHEN $8 THEN NULL ELSE COALESCE($6, user_id) END
            WHERE id = $1
            RETURNING id, user_id, name, specialty, rating, avatar, created_at
            "#
        )
        .bind(contractor_id)
        .bind(&changes.name)
        .bind(&changes.specialty)
        .bind(changes.rating)
        .bind(&changes.avatar)
        .bind(changes.user_id)
        .bind(changes.clears(ClearableContractorField::Avatar))
        .bind(changes.clears(ClearableContractorField::UserId))
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_contractor(&self, caller: Uuid, contractor_id: i64) -> Result<bool, Error> {
        let mut tx = self.begin_as(caller).await?;

        let result = sqlx::query("DELETE FROM contractors WHERE id = $1")
            .bind(contractor_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
