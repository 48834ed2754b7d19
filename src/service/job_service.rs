// service/job_service.rs
use std::sync::Arc;

use crate::{
    db::{contractordb::ContractorExt, db::DBClient, jobdb::JobExt},
    dtos::dispatchdtos::{CreateJobDto, JobFilterDto, UpdateJobDto},
    models::jobmodel::{Job, JobStatus},
    service::{
        access_policy::{
            job_in_scope, may_update_job_fields, Caller, JobFieldsTouched, Operation, Resource,
            RowScope,
        },
        error::ServiceError,
    },
};

#[derive(Debug, Clone)]
pub struct JobService {
    db_client: Arc<DBClient>,
}

impl JobService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn list_jobs(
        &self,
        caller: &Caller,
        filter: &JobFilterDto,
    ) -> Result<Vec<Job>, ServiceError> {
        let scope = caller.scope(Resource::Jobs, Operation::Read);
        if scope.is_denied() {
            return Err(ServiceError::AccessDenied);
        }

        let jobs = self.db_client.get_jobs(caller.id, filter).await?;

        Ok(jobs
            .into_iter()
            .filter(|job| visible_in(caller, scope, job))
            .collect())
    }

    pub async fn get_job(&self, caller: &Caller, job_id: i64) -> Result<Job, ServiceError> {
        let scope = caller.scope(Resource::Jobs, Operation::Read);
        self.load_in_scope(caller, scope, job_id).await
    }

    pub async fn create_job(&self, caller: &Caller, job: CreateJobDto) -> Result<Job, ServiceError> {
        if caller.scope(Resource::Jobs, Operation::Create) != RowScope::All {
            return Err(ServiceError::AccessDenied);
        }

        let created = self.db_client.create_job(caller.id, &job).await?;

        tracing::info!(
            "job {} created by {} for unit {} on {}",
            created.id,
            caller.id,
            created.unit,
            created.service_date
        );

        Ok(created)
    }

    pub async fn assign_contractor(
        &self,
        caller: &Caller,
        job_id: i64,
        contractor_id: i64,
    ) -> Result<Job, ServiceError> {
        let touched = JobFieldsTouched {
            assignment: true,
            ..Default::default()
        };
        let scope = caller.scope(Resource::Jobs, Operation::Update);
        if scope.is_denied() || !may_update_job_fields(caller.role, touched) {
            return Err(ServiceError::AccessDenied);
        }

        self.db_client
            .get_contractor(caller.id, contractor_id)
            .await?
            .ok_or(ServiceError::ContractorNotFound(contractor_id))?;

        let job = self
            .db_client
            .assign_contractor(caller.id, job_id, contractor_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        tracing::info!(
            "job {} assigned to contractor {} by {} (status {})",
            job.id,
            contractor_id,
            caller.id,
            job.status
        );

        Ok(job)
    }

    pub async fn update_job_status(
        &self,
        caller: &Caller,
        job_id: i64,
        status: JobStatus,
    ) -> Result<Job, ServiceError> {
        let scope = caller.scope(Resource::Jobs, Operation::Update);
        self.load_in_scope(caller, scope, job_id).await?;

        let job = self
            .db_client
            .update_job_status(caller.id, job_id, status)
            .await?
            .ok_or_else(|| missing(scope, job_id))?;

        tracing::info!("job {} moved to {} by {}", job.id, job.status, caller.id);

        Ok(job)
    }

    pub async fn update_job(
        &self,
        caller: &Caller,
        job_id: i64,
        changes: UpdateJobDto,
    ) -> Result<Job, ServiceError> {
        if changes.is_empty() {
            return Err(ServiceError::Validation("No changes supplied".to_string()));
        }
        changes.check_clears().map_err(ServiceError::Validation)?;

        if !may_update_job_fields(caller.role, changes.fields_touched()) {
            return Err(ServiceError::AccessDenied);
        }

        let scope = caller.scope(Resource::Jobs, Operation::Update);
        self.load_in_scope(caller, scope, job_id).await?;

        self.db_client
            .update_job(caller.id, job_id, &changes)
            .await?
            .ok_or_else(|| missing(scope, job_id))
    }

    pub async fn delete_job(&self, caller: &Caller, job_id: i64) -> Result<(), ServiceError> {
        if caller.scope(Resource::Jobs, Operation::Delete) != RowScope::All {
            return Err(ServiceError::AccessDenied);
        }

        if !self.db_client.delete_job(caller.id, job_id).await? {
            return Err(ServiceError::JobNotFound(job_id));
        }

        tracing::info!("job {} deleted by {}", job_id, caller.id);
        Ok(())
    }

    async fn load_in_scope(
        &self,
        caller: &Caller,
        scope: RowScope,
        job_id: i64,
    ) -> Result<Job, ServiceError> {
        if scope.is_denied() {
            return Err(ServiceError::AccessDenied);
        }

        let job = self
            .db_client
            .get_job(caller.id, job_id)
            .await?
            .ok_or_else(|| missing(scope, job_id))?;

        if !visible_in(caller, scope, &job) {
            return Err(ServiceError::AccessDenied);
        }

        Ok(job)
    }
}

fn visible_in(caller: &Caller, scope: RowScope, job: &Job) -> bool {
    match scope {
        RowScope::All => true,
        RowScope::Assigned => job_in_scope(caller.id, job.contractor_user_id),
        RowScope::Own | RowScope::None => false,
    }
}

/// Outside an unrestricted scope a hidden job is indistinguishable from a
/// missing one, and both are reported as a denial.
fn missing(scope: RowScope, job_id: i64) -> ServiceError {
    match scope {
        RowScope::All => ServiceError::JobNotFound(job_id),
        _ => ServiceError::AccessDenied,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::models::profilemodel::Role;

    fn job(contractor_user_id: Option<Uuid>) -> Job {
        Job {
            id: 7,
            unit: "12".to_string(),
            client_name: "Cedar Court".to_string(),
            client_email: None,
            address: "40 Cedar Ct".to_string(),
            service_type: "Deep Clean".to_string(),
            service_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            lockbox_code: None,
            status: JobStatus::InProgress,
            checklist_notes: None,
            created_at: Utc::now(),
            contractor_id: contractor_user_id.map(|_| 3),
            contractor_name: contractor_user_id.map(|_| "Sam Okafor".to_string()),
            contractor_user_id,
        }
    }

    fn caller(role: Option<Role>) -> Caller {
        Caller {
            id: Uuid::new_v4(),
            email: "someone@flashfix.example".to_string(),
            role,
        }
    }

    #[test]
    fn test_contractor_sees_only_linked_jobs() {
        let contractor = caller(Some(Role::Contractor));

        assert!(visible_in(&contractor, RowScope::Assigned, &job(Some(contractor.id))));
        assert!(!visible_in(&contractor, RowScope::Assigned, &job(Some(Uuid::new_v4()))));
        assert!(!visible_in(&contractor, RowScope::Assigned, &job(None)));
    }

    #[test]
    fn test_managers_see_every_job() {
        let manager = caller(Some(Role::PropertyManager));
        assert!(visible_in(&manager, RowScope::All, &job(None)));
        assert!(visible_in(&manager, RowScope::All, &job(Some(Uuid::new_v4()))));
    }

    #[test]
    fn test_missing_job_is_opaque_outside_full_scope() {
        assert!(matches!(missing(RowScope::All, 9), ServiceError::JobNotFound(9)));
        assert!(matches!(missing(RowScope::Assigned, 9), ServiceError::AccessDenied));
    }
}
