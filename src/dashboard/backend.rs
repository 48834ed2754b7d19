use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    dtos::{authdtos::SessionIdentityDto, dispatchdtos::CreateJobDto},
    models::{
        contractormodel::Contractor,
        jobmodel::{Job, JobStatus},
        profilemodel::Role,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub token: String,
    pub identity: SessionIdentityDto,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("not signed in: {0}")]
    Unauthorized(String),

    #[error("access denied")]
    AccessDenied,

    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(error: reqwest::Error) -> Self {
        BackendError::Transport(error.to_string())
    }
}

/// Everything the dashboard needs from the server. Implemented over HTTP by
/// [`crate::dashboard::ApiClient`]; tests plug in an in-memory fake.
#[async_trait]
pub trait DispatchBackend: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError>;

    async fn sign_out(&self, session: &Session) -> Result<(), BackendError>;

    /// `Ok(None)` when the caller's profile does not exist yet.
    async fn fetch_role(&self, session: &Session) -> Result<Option<Role>, BackendError>;

    async fn fetch_jobs(&self, session: &Session) -> Result<Vec<Job>, BackendError>;

    async fn fetch_contractors(&self, session: &Session) -> Result<Vec<Contractor>, BackendError>;

    async fn assign_contractor(
        &self,
        session: &Session,
        job_id: i64,
        contractor_id: i64,
    ) -> Result<Job, BackendError>;

    async fn update_job_status(
        &self,
        session: &Session,
        job_id: i64,
        status: JobStatus,
    ) -> Result<Job, BackendError>;

    async fn create_job(&self, session: &Session, job: &CreateJobDto) -> Result<Job, BackendError>;
}
