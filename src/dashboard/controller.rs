use chrono::Utc;

use super::{
    backend::{BackendError, DispatchBackend, Session},
    state::{reduce, Action, DashboardState, SessionPhase},
};
use crate::{
    dtos::dispatchdtos::CreateJobDto,
    models::jobmodel::{Job, JobStatus},
};

/// Drives a [`DashboardState`] against a backend.
///
/// Mutations are applied locally first. When the server rejects one, the
/// controller logs it, refetches the job list once and returns the original
/// error. If that refetch fails as well, the list from before the change is
/// restored. Any 401 ends the session.
pub struct Dashboard<B: DispatchBackend> {
    backend: B,
    state: DashboardState,
    next_draft_id: i64,
}

impl<B: DispatchBackend> Dashboard<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: DashboardState::default(),
            next_draft_id: -1,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<(), BackendError> {
        self.dispatch(Action::SignInStarted);

        match self.backend.sign_in(email, password).await {
            Ok(session) => {
                tracing::info!("signed in as {}", session.identity.email);
                self.on_session_change(Some(session)).await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("sign in failed: {}", e);
                self.dispatch(Action::SessionChanged(None));
                Err(e)
            }
        }
    }

    /// Re-resolves the role whenever the session changes. A missing profile
    /// leaves the dashboard in the role-unknown phase until the next event.
    pub async fn on_session_change(&mut self, session: Option<Session>) {
        self.dispatch(Action::SessionChanged(session.clone()));

        let Some(session) = session else {
            return;
        };

        match self.backend.fetch_role(&session).await {
            Ok(role) => {
                self.dispatch(Action::RoleResolved(role));
                match role {
                    Some(role) => {
                        tracing::debug!("resolved role {}", role);
                        self.load().await;
                    }
                    None => tracing::info!("no profile yet for {}", session.identity.email),
                }
            }
            Err(BackendError::Unauthorized(message)) => {
                tracing::warn!("session rejected: {}", message);
                self.dispatch(Action::SessionChanged(None));
            }
            Err(e) => {
                tracing::error!("failed to resolve role: {}", e);
                self.dispatch(Action::LoadFailed(e.to_string()));
            }
        }
    }

    /// Fetches jobs and contractors concurrently.
    pub async fn load(&mut self) {
        if self.state.phase != SessionPhase::RoleResolved {
            return;
        }
        let Some(session) = self.state.session.clone() else {
            return;
        };

        let (jobs, contractors) = tokio::join!(
            self.backend.fetch_jobs(&session),
            self.backend.fetch_contractors(&session)
        );

        match (jobs, contractors) {
            (Ok(jobs), Ok(contractors)) => {
                tracing::debug!("loaded {} jobs, {} contractors", jobs.len(), contractors.len());
                self.dispatch(Action::DataLoaded { jobs, contractors });
            }
            (Err(BackendError::Unauthorized(message)), _)
            | (_, Err(BackendError::Unauthorized(message))) => {
                tracing::warn!("session rejected while loading: {}", message);
                self.dispatch(Action::SessionChanged(None));
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::error!("failed to load dashboard data: {}", e);
                self.dispatch(Action::LoadFailed(e.to_string()));
            }
        }
    }

    pub async fn assign_contractor(
        &mut self,
        job_id: i64,
        contractor_id: i64,
    ) -> Result<Job, BackendError> {
        let session = self.active_session()?;
        let snapshot = self.state.jobs.clone();
        self.dispatch(Action::ContractorAssigned {
            job_id,
            contractor_id,
        });

        match self
            .backend
            .assign_contractor(&session, job_id, contractor_id)
            .await
        {
            Ok(job) => {
                self.dispatch(Action::JobConfirmed(job.clone()));
                Ok(job)
            }
            Err(e) => {
                self.reconcile(&session, &e, snapshot).await;
                Err(e)
            }
        }
    }

    pub async fn update_status(
        &mut self,
        job_id: i64,
        status: JobStatus,
    ) -> Result<Job, BackendError> {
        let session = self.active_session()?;
        let snapshot = self.state.jobs.clone();
        self.dispatch(Action::StatusChanged { job_id, status });

        match self.backend.update_job_status(&session, job_id, status).await {
            Ok(job) => {
                self.dispatch(Action::JobConfirmed(job.clone()));
                Ok(job)
            }
            Err(e) => {
                self.reconcile(&session, &e, snapshot).await;
                Err(e)
            }
        }
    }

    /// Shows the job under a provisional id until the server returns the
    /// stored row.
    pub async fn create_job(&mut self, job: CreateJobDto) -> Result<Job, BackendError> {
        let session = self.active_session()?;

        let snapshot = self.state.jobs.clone();
        let draft_id = self.next_draft_id;
        self.next_draft_id -= 1;
        self.dispatch(Action::JobDrafted(draft(draft_id, &job)));

        match self.backend.create_job(&session, &job).await {
            Ok(created) => {
                self.dispatch(Action::JobPersisted {
                    draft_id,
                    job: created.clone(),
                });
                Ok(created)
            }
            Err(e) => {
                self.reconcile(&session, &e, snapshot).await;
                Err(e)
            }
        }
    }

    /// Clears local state first; a failed server logout is only logged.
    pub async fn sign_out(&mut self) {
        let session = self.state.session.clone();
        self.dispatch(Action::SignedOut);

        if let Some(session) = session {
            if let Err(e) = self.backend.sign_out(&session).await {
                tracing::warn!("server logout failed: {}", e);
            }
        }
    }

    fn active_session(&self) -> Result<Session, BackendError> {
        match (&self.state.phase, &self.state.session) {
            (SessionPhase::RoleResolved, Some(session)) => Ok(session.clone()),
            _ => Err(BackendError::Unauthorized(
                "sign in and wait for your profile before making changes".to_string(),
            )),
        }
    }

    /// Refetches the job list once after a rejected mutation. When that
    /// fetch fails too, the jobs go back to `snapshot`, the list as it was
    /// before the optimistic change. A rejected session signs out.
    async fn reconcile(&mut self, session: &Session, cause: &BackendError, snapshot: Vec<Job>) {
        if let BackendError::Unauthorized(message) = cause {
            tracing::warn!("session rejected: {}", message);
            self.dispatch(Action::SessionChanged(None));
            return;
        }

        tracing::error!("mutation rejected: {}; reloading jobs", cause);
        self.dispatch(Action::MutationFailed(cause.to_string()));

        match self.backend.fetch_jobs(session).await {
            Ok(jobs) => self.dispatch(Action::JobsReconciled(jobs)),
            Err(BackendError::Unauthorized(message)) => {
                tracing::warn!("session rejected while reloading jobs: {}", message);
                self.dispatch(Action::SessionChanged(None));
            }
            Err(e) => {
                tracing::error!("failed to reload jobs: {}; restoring previous list", e);
                self.dispatch(Action::MutationRolledBack(snapshot));
            }
        }
    }
}

fn draft(id: i64, job: &CreateJobDto) -> Job {
    Job {
        id,
        unit: job.unit.clone(),
        client_name: job.client_name.clone(),
        client_email: job.client_email.clone(),
        address: job.address.clone(),
        service_type: job.service_type.clone(),
        service_date: job.service_date,
        lockbox_code: job.lockbox_code.clone(),
        status: JobStatus::Pending,
        checklist_notes: job.checklist_notes.clone(),
        created_at: Utc::now(),
        contractor_id: None,
        contractor_name: None,
        contractor_user_id: None,
    }
}
