use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use flashfix::{
    dashboard::{BackendError, Dashboard, DispatchBackend, Session, SessionPhase},
    dtos::{authdtos::SessionIdentityDto, dispatchdtos::CreateJobDto},
    models::{
        contractormodel::Contractor,
        jobmodel::{Job, JobStatus},
        profilemodel::Role,
    },
};
use uuid::Uuid;

/// In-memory server. Mutations fail while `reject_mutations` is set. While
/// `offline` is set every job request fails at the transport level; once
/// `identity_deleted` is set job requests answer 401.
struct FakeBackend {
    role: Option<Role>,
    jobs: Mutex<Vec<Job>>,
    contractors: Vec<Contractor>,
    reject_mutations: bool,
    fail_loads: bool,
    offline: AtomicBool,
    identity_deleted: AtomicBool,
    job_fetches: AtomicUsize,
    logouts: AtomicUsize,
}

impl FakeBackend {
    fn new(role: Option<Role>) -> Self {
        Self {
            role,
            jobs: Mutex::new(vec![
                job(1, 10, JobStatus::Pending),
                job(2, 14, JobStatus::InProgress),
            ]),
            contractors: vec![contractor(7, "Rosa Delgado"), contractor(8, "Sam Okafor")],
            reject_mutations: false,
            fail_loads: false,
            offline: AtomicBool::new(false),
            identity_deleted: AtomicBool::new(false),
            job_fetches: AtomicUsize::new(0),
            logouts: AtomicUsize::new(0),
        }
    }

    fn rejecting(mut self) -> Self {
        self.reject_mutations = true;
        self
    }

    fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    fn delete_identity(&self) {
        self.identity_deleted.store(true, Ordering::SeqCst);
    }

    fn unavailable(&self) -> Option<BackendError> {
        if self.identity_deleted.load(Ordering::SeqCst) {
            return Some(BackendError::Unauthorized(
                "User belonging to this token no longer exists".to_string(),
            ));
        }
        if self.offline.load(Ordering::SeqCst) {
            return Some(BackendError::Transport("connection refused".to_string()));
        }
        None
    }

    fn server_job(&self, job_id: i64) -> Option<Job> {
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .find(|job| job.id == job_id)
            .cloned()
    }
}

fn job(id: i64, day: u32, status: JobStatus) -> Job {
    Job {
        id,
        unit: format!("{}B", id),
        client_name: "Harbor View HOA".to_string(),
        client_email: None,
        address: "12 Pier Rd".to_string(),
        service_type: "Turnover Clean".to_string(),
        service_date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
        lockbox_code: Some("0419".to_string()),
        status,
        checklist_notes: None,
        created_at: Utc::now(),
        contractor_id: None,
        contractor_name: None,
        contractor_user_id: None,
    }
}

fn contractor(id: i64, name: &str) -> Contractor {
    Contractor {
        id,
        user_id: None,
        name: name.to_string(),
        specialty: "Plumbing".to_string(),
        rating: 4.7,
        avatar: None,
        created_at: Utc::now(),
    }
}

#[async_trait]
impl DispatchBackend for FakeBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        if password != "secret123" {
            return Err(BackendError::Unauthorized("Email or password is wrong".to_string()));
        }
        Ok(Session {
            token: "fake-token".to_string(),
            identity: SessionIdentityDto {
                id: Uuid::new_v4(),
                email: email.to_string(),
            },
        })
    }

    async fn sign_out(&self, _session: &Session) -> Result<(), BackendError> {
        self.logouts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn fetch_role(&self, _session: &Session) -> Result<Option<Role>, BackendError> {
        Ok(self.role)
    }

    async fn fetch_jobs(&self, _session: &Session) -> Result<Vec<Job>, BackendError> {
        self.job_fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.unavailable() {
            return Err(error);
        }
        if self.fail_loads {
            return Err(BackendError::Transport("connection reset".to_string()));
        }
        Ok(self.jobs.lock().unwrap().clone())
    }

    async fn fetch_contractors(&self, _session: &Session) -> Result<Vec<Contractor>, BackendError> {
        Ok(self.contractors.clone())
    }

    async fn assign_contractor(
        &self,
        _session: &Session,
        job_id: i64,
        contractor_id: i64,
    ) -> Result<Job, BackendError> {
        if let Some(error) = self.unavailable() {
            return Err(error);
        }
        if self.reject_mutations {
            return Err(BackendError::AccessDenied);
        }
        let name = self
            .contractors
            .iter()
            .find(|c| c.id == contractor_id)
            .map(|c| c.name.clone());

        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs
            .iter_mut()
            .find(|job| job.id == job_id)
            .ok_or(BackendError::AccessDenied)?;
        job.contractor_id = Some(contractor_id);
        job.contractor_name = name;
        job.status = job.status.after_assignment();
        Ok(job.clone())
    }

    async fn update_job_status(
        &self,
        _session: &Session,
        job_id: i64,
        status: JobStatus,
    ) -> Result<Job, BackendError> {
        if let Some(error) = self.unavailable() {
            return Err(error);
        }
        if self.reject_mutations {
            return Err(BackendError::AccessDenied);
        }
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs
            .iter_mut()
            .find(|job| job.id == job_id)
            .ok_or(BackendError::AccessDenied)?;
        job.status = status;
        Ok(job.clone())
    }

    async fn create_job(&self, _session: &Session, new_job: &CreateJobDto) -> Result<Job, BackendError> {
        if let Some(error) = self.unavailable() {
            return Err(error);
        }
        if self.reject_mutations {
            return Err(BackendError::Rejected {
                status: 400,
                message: "Client email is invalid".to_string(),
            });
        }
        let mut jobs = self.jobs.lock().unwrap();
        let mut created = job(jobs.len() as i64 + 1, 1, JobStatus::Pending);
        created.unit = new_job.unit.clone();
        created.service_date = new_job.service_date;
        jobs.push(created.clone());
        Ok(created)
    }
}

async fn signed_in(backend: FakeBackend) -> Dashboard<FakeBackend> {
    let mut dashboard = Dashboard::new(backend);
    dashboard
        .sign_in("pm@flashfix.test", "secret123")
        .await
        .unwrap();
    dashboard
}

fn new_job() -> CreateJobDto {
    CreateJobDto {
        unit: "9C".to_string(),
        client_name: "Dune Street Rentals".to_string(),
        client_email: None,
        address: "300 Dune St".to_string(),
        service_type: "Deep Clean".to_string(),
        service_date: NaiveDate::from_ymd_opt(2024, 6, 20).unwrap(),
        lockbox_code: None,
        checklist_notes: None,
    }
}

#[tokio::test]
async fn sign_in_resolves_role_and_loads_lists() {
    let dashboard = signed_in(FakeBackend::new(Some(Role::PropertyManager))).await;
    let state = dashboard.state();

    assert_eq!(state.phase, SessionPhase::RoleResolved);
    assert_eq!(state.role, Some(Role::PropertyManager));
    assert!(!state.loading);
    assert_eq!(state.contractors.len(), 2);

    let ids: Vec<i64> = state.jobs.iter().map(|job| job.id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
async fn wrong_password_leaves_dashboard_signed_out() {
    let mut dashboard = Dashboard::new(FakeBackend::new(Some(Role::PropertyManager)));
    let result = dashboard.sign_in("pm@flashfix.test", "nope").await;

    assert!(matches!(result, Err(BackendError::Unauthorized(_))));
    assert_eq!(dashboard.state().phase, SessionPhase::Unauthenticated);
    assert!(dashboard.state().session.is_none());
}

#[tokio::test]
async fn missing_profile_keeps_role_unknown_and_blocks_mutations() {
    let mut dashboard = signed_in(FakeBackend::new(None)).await;

    assert_eq!(dashboard.state().phase, SessionPhase::RoleUnknown);
    assert!(dashboard.state().jobs.is_empty());
    assert_eq!(dashboard.backend().job_fetches.load(Ordering::SeqCst), 0);

    let result = dashboard.update_status(1, JobStatus::Completed).await;
    assert!(matches!(result, Err(BackendError::Unauthorized(_))));
    assert_eq!(
        dashboard.backend().server_job(1).unwrap().status,
        JobStatus::Pending
    );
}

#[tokio::test]
async fn confirmed_assignment_matches_server_row() {
    let mut dashboard = signed_in(FakeBackend::new(Some(Role::PropertyManager))).await;

    let confirmed = dashboard.assign_contractor(1, 8).await.unwrap();
    assert_eq!(confirmed.status, JobStatus::InProgress);

    let local = dashboard.state().job(1).unwrap();
    assert_eq!(local.contractor_id, Some(8));
    assert_eq!(local.contractor_name.as_deref(), Some("Sam Okafor"));
    assert_eq!(local.status, JobStatus::InProgress);
}

#[tokio::test]
async fn rejected_status_change_reconciles_once() {
    let mut dashboard = signed_in(FakeBackend::new(Some(Role::Contractor)).rejecting()).await;
    let fetches_before = dashboard.backend().job_fetches.load(Ordering::SeqCst);

    let result = dashboard.update_status(1, JobStatus::Completed).await;

    assert!(matches!(result, Err(BackendError::AccessDenied)));
    assert_eq!(
        dashboard.backend().job_fetches.load(Ordering::SeqCst),
        fetches_before + 1
    );
    assert_eq!(dashboard.state().job(1).unwrap().status, JobStatus::Pending);
    assert_eq!(dashboard.state().last_error.as_deref(), Some("access denied"));
}

#[tokio::test]
async fn rejected_assignment_restores_server_view() {
    let mut dashboard = signed_in(FakeBackend::new(Some(Role::PropertyManager)).rejecting()).await;

    let result = dashboard.assign_contractor(1, 7).await;

    assert!(result.is_err());
    let local = dashboard.state().job(1).unwrap();
    assert_eq!(local.contractor_id, None);
    assert_eq!(local.status, JobStatus::Pending);
}

#[tokio::test]
async fn created_job_replaces_its_draft() {
    let mut dashboard = signed_in(FakeBackend::new(Some(Role::PropertyManager))).await;

    let created = dashboard.create_job(new_job()).await.unwrap();

    let state = dashboard.state();
    assert!(state.jobs.iter().all(|job| job.id > 0));
    assert_eq!(state.jobs[0].id, created.id);
    assert_eq!(state.jobs.len(), 3);
}

#[tokio::test]
async fn rejected_job_creation_drops_the_draft() {
    let mut dashboard = signed_in(FakeBackend::new(Some(Role::PropertyManager)).rejecting()).await;

    let result = dashboard.create_job(new_job()).await;

    assert!(matches!(result, Err(BackendError::Rejected { status: 400, .. })));
    assert_eq!(dashboard.state().jobs.len(), 2);
    assert!(dashboard.state().jobs.iter().all(|job| job.id > 0));
}

#[tokio::test]
async fn failed_load_surfaces_error() {
    let mut backend = FakeBackend::new(Some(Role::Admin));
    backend.fail_loads = true;
    let dashboard = signed_in(backend).await;

    let state = dashboard.state();
    assert_eq!(state.phase, SessionPhase::RoleResolved);
    assert!(!state.loading);
    assert!(state.last_error.is_some());
    assert!(state.jobs.is_empty());
}

#[tokio::test]
async fn sign_out_clears_state_and_logs_out() {
    let mut dashboard = signed_in(FakeBackend::new(Some(Role::PropertyManager))).await;

    dashboard.sign_out().await;

    let state = dashboard.state();
    assert_eq!(state.phase, SessionPhase::Unauthenticated);
    assert!(state.session.is_none());
    assert!(state.role.is_none());
    assert!(state.jobs.is_empty());
    assert!(state.contractors.is_empty());
    assert_eq!(dashboard.backend().logouts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn offline_assignment_restores_previous_list() {
    let mut dashboard = signed_in(FakeBackend::new(Some(Role::PropertyManager))).await;
    let before = dashboard.state().jobs.clone();
    let fetches_before = dashboard.backend().job_fetches.load(Ordering::SeqCst);
    dashboard.backend().go_offline();

    let result = dashboard.assign_contractor(1, 7).await;

    assert!(matches!(result, Err(BackendError::Transport(_))));
    assert_eq!(
        dashboard.backend().job_fetches.load(Ordering::SeqCst),
        fetches_before + 1
    );

    let local = dashboard.state().job(1).unwrap();
    assert_eq!(local.contractor_id, None);
    assert_eq!(local.status, JobStatus::Pending);
    assert_eq!(dashboard.state().jobs, before);
    assert_eq!(dashboard.backend().server_job(1).unwrap().contractor_id, None);
}

#[tokio::test]
async fn offline_status_change_and_creation_leave_no_trace() {
    let mut dashboard = signed_in(FakeBackend::new(Some(Role::PropertyManager))).await;
    let before = dashboard.state().jobs.clone();
    dashboard.backend().go_offline();

    assert!(dashboard.update_status(2, JobStatus::Completed).await.is_err());
    assert_eq!(dashboard.state().job(2).unwrap().status, JobStatus::InProgress);

    assert!(dashboard.create_job(new_job()).await.is_err());
    assert!(dashboard.state().jobs.iter().all(|job| job.id > 0));
    assert_eq!(dashboard.state().jobs, before);
    assert!(dashboard.state().last_error.is_some());
}

#[tokio::test]
async fn deleted_identity_during_load_signs_out() {
    let backend = FakeBackend::new(Some(Role::PropertyManager));
    backend.delete_identity();

    let dashboard = signed_in(backend).await;

    let state = dashboard.state();
    assert_eq!(state.phase, SessionPhase::Unauthenticated);
    assert!(state.session.is_none());
    assert!(state.role.is_none());
}

#[tokio::test]
async fn deleted_identity_during_mutation_signs_out() {
    let mut dashboard = signed_in(FakeBackend::new(Some(Role::PropertyManager))).await;
    dashboard.backend().delete_identity();

    let result = dashboard.update_status(1, JobStatus::Completed).await;

    assert!(matches!(result, Err(BackendError::Unauthorized(_))));
    assert_eq!(dashboard.state().phase, SessionPhase::Unauthenticated);
    assert!(dashboard.state().jobs.is_empty());
}
