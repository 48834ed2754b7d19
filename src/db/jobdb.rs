// db/jobdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::{
    dtos::dispatchdtos::{ClearableJobField, CreateJobDto, JobFilterDto, UpdateJobDto},
    models::jobmodel::{Job, JobStatus},
};

/// Columns of a job joined with its assigned contractor. Expects the job as
/// `j` and the contractor as `c`.
const JOB_COLUMNS: &str = r#"
    j.id, j.unit, j.client_name, j.client_email, j.address, j.service_type,
    j.service_date, j.lockbox_code, j.status, j.checklist_notes, j.created_at,
    j.contractor_id, c.name AS contractor_name, c.user_id AS contractor_user_id
"#;

#[async_trait]
pub trait JobExt {
    /// Jobs visible to `caller`, most recent service date first.
    async fn get_jobs(&self, caller: Uuid, filter: &JobFilterDto) -> Result<Vec<Job>, Error>;

    async fn get_job(&self, caller: Uuid, job_id: i64) -> Result<Option<Job>, Error>;

    async fn create_job(&self, caller: Uuid, job: &CreateJobDto) -> Result<Job, Error>;

    /// Sets the contractor reference; a Pending job moves to In Progress.
    async fn assign_contractor(
        &self,
        caller: Uuid,
        job_id: i64,
        contractor_id: i64,
    ) -> Result<Option<Job>, Error>;

    async fn update_job_status(
        &self,
        caller: Uuid,
        job_id: i64,
        status: JobStatus,
    ) -> Result<Option<Job>, Error>;

    async fn update_job(
        &self,
        caller: Uuid,
        job_id: i64,
        changes: &UpdateJobDto,
    ) -> Result<Option<Job>, Error>;

    async fn delete_job(&self, caller: Uuid, job_id: i64) -> Result<bool, Error>;
}

#[async_trait]
impl JobExt for DBClient {
    async fn get_jobs(&self, caller: Uuid, filter: &JobFilterDto) -> Result<Vec<Job>, Error> {
        let mut tx = self.begin_as(caller).await?;

        let sql = format!(
            r#"
            SELECT {}
            FROM jobs j
            LEFT JOIN contractors c ON c.id = j.contractor_id
            WHERE ($1::text IS NULL OR j.status = $1::text)
              AND ($2::bigint IS NULL OR j.contractor_id = $2::bigint)
            ORDER BY j.service_date DESC, j.id DESC
            "#,
            JOB_COLUMNS
        );

        let jobs = sqlx::query_as::<_, Job>(&sql)
            .bind(filter.status)
            .bind(filter.contractor_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(jobs)
    }

    async fn get_job(&self, caller: Uuid, job_id: i64) -> Result<Option<Job>, Error> {
        let mut tx = self.begin_as(caller).await?;

        let sql = format!(
            r#"
            SELECT {}
            FROM jobs j
            LEFT JOIN contractors c ON c.id = j.contractor_id
            WHERE j.id = $1
            "#,
            JOB_COLUMNS
        );

        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(job_id)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(job)
    }

    async fn create_job(&self, caller: Uuid, job: &CreateJobDto) -> Result<Job, Error> {
        let mut tx = self.begin_as(caller).await?;

        let sql = format!(
            r#"
            WITH j AS (
                INSERT INTO jobs
                (unit, client_name, client_email, address, service_type,
                 service_date, lockbox_code, checklist_notes)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
            )
            SELECT {}
            FROM j
            LEFT JOIN contractors c ON c.id = j.contractor_id
            "#,
            JOB_COLUMNS
        );

        let created = sqlx::query_as::<_, Job>(&sql)
            .bind(&job.unit)
            .bind(&job.client_name)
            .bind(&job.client_email)
            .bind(&job.address)
            .bind(&job.service_type)
            .bind(job.service_date)
            .bind(&job.lockbox_code)
            .bind(&job.checklist_notes)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn assign_contractor(
        &self,
        caller: Uuid,
        job_id: i64,
        contractor_id: i64,
    ) -> Result<Option<Job>, Error> {
        let mut tx = self.begin_as(caller).await?;

        let sql = format!(
            r#"
            WITH j AS (
                UPDATE jobs
                SET contractor_id = $2,
                    status = CASE WHEN status = 'Pending' THEN 'In Progress' ELSE status END
                WHERE id = $1
                RETURNING *
            )
            SELECT {}
            FROM j
            LEFT JOIN contractors c ON c.id = j.contractor_id
            "#,
            JOB_COLUMNS
        );

        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(job_id)
            .bind(contractor_id)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(job)
    }

    async fn update_job_status(
        &self,
        caller: Uuid,
        job_id: i64,
        status: JobStatus,
    ) -> Result<Option<Job>, Error> {
        let mut tx = self.begin_as(caller).await?;

        let sql = format!(
            r#"
            WITH j AS (
                UPDATE jobs
                SET status = $2
                WHERE id = $1
                RETURNING *
            )
            SELECT {}
            FROM j
            LEFT JOIN contractors c ON c.id = j.contractor_id
            "#,
            JOB_COLUMNS
        );

        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(job_id)
            .bind(status)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(job)
    }

    async fn update_job(
        &self,
        caller: Uuid,
        job_id: i64,
        changes: &UpdateJobDto,
    ) -> Result<Option<Job>, Error> {
        let mut tx = self.begin_as(caller).await?;

        let sql = format!(
            r#"
            WITH j AS (
                UPDATE jobs
                SET unit = COALESCE($2, unit),
                    client_name = COALESCE($3, client_name),
                    client_email = CASE WHEN $11 THEN NULL ELSE COALESCE($4, client_email) END,
                    address = COALESCE($5, address),
                    service_type = COALESCE($6, service_type),
                    service_date = COALESCE($7, service_date),
                    lockbox_code = CASE WHEN $12 THEN NULL ELSE COALESCE($8, lockbox_code) END,
                    checklist_notes = CASE WHEN $13 THEN NULL ELSE COALESCE($9, checklist_notes) END,
                    status = COALESCE($10, status)
                WHERE id = $1
                RETURNING *
            )
            SELECT {}
            FROM j
            LEFT JOIN contractors c ON c.id = j.contractor_id
            "#,
            JOB_COLUMNS
        );

        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(job_id)
            .bind(&changes.unit)
            .bind(&changes.client_name)
            .bind(&changes.client_email)
            .bind(&changes.address)
            .bind(&changes.service_type)
            .bind(changes.service_date)
            .bind(&changes.lockbox_code)
            .bind(&changes.checklist_notes)
            .bind(changes.status)
            .bind(changes.clears(ClearableJobField::ClientEmail))
            .bind(changes.clears(ClearableJobField::LockboxCode))
            .bind(changes.clears(ClearableJobField::ChecklistNotes))
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(job)
    }

    async fn delete_job(&self, caller: Uuid, job_id: i64) -> Result<bool, Error> {
        let mut tx = self.begin_as(caller).await?;

        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(job_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
