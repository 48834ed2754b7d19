use std::cmp::Reverse;

use super::backend::Session;
use crate::models::{
    contractormodel::Contractor,
    jobmodel::{Job, JobStatus},
    profilemodel::Role,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Unauthenticated,
    Authenticating,
    /// Signed in, but the profile has not been read (or does not exist yet).
    RoleUnknown,
    RoleResolved,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub phase: SessionPhase,
    pub session: Option<Session>,
    pub role: Option<Role>,
    pub jobs: Vec<Job>,
    pub contractors: Vec<Contractor>,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl DashboardState {
    pub fn job(&self, job_id: i64) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == job_id)
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    fn accepts_mutations(&self) -> bool {
        self.phase == SessionPhase::RoleResolved
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SignInStarted,
    SessionChanged(Option<Session>),
    RoleResolved(Option<Role>),
    DataLoaded {
        jobs: Vec<Job>,
        contractors: Vec<Contractor>,
    },
    LoadFailed(String),
    ContractorAssigned {
        job_id: i64,
        contractor_id: i64,
    },
    StatusChanged {
        job_id: i64,
        status: JobStatus,
    },
    /// A job shown before the server has stored it. Drafts carry negative ids.
    JobDrafted(Job),
    JobPersisted {
        draft_id: i64,
        job: Job,
    },
    /// The server's copy of one job after a confirmed mutation.
    JobConfirmed(Job),
    JobsReconciled(Vec<Job>),
    /// The job list as it was before an optimistic change that could not be
    /// confirmed or reloaded.
    MutationRolledBack(Vec<Job>),
    MutationFailed(String),
    SignedOut,
}

/// Applies `action` to `state`. Actions that make no sense in the current
/// phase leave the state untouched.
pub fn reduce(mut state: DashboardState, action: Action) -> DashboardState {
    match action {
        Action::SignInStarted => {
            if state.phase == SessionPhase::Unauthenticated {
                state.phase = SessionPhase::Authenticating;
                state.last_error = None;
            }
            state
        }

        Action::SessionChanged(None) | Action::SignedOut => DashboardState::default(),

        Action::SessionChanged(Some(session)) => match state.phase {
            SessionPhase::Unauthenticated => state,
            SessionPhase::Authenticating => DashboardState {
                phase: SessionPhase::RoleUnknown,
                session: Some(session),
                ..DashboardState::default()
            },
            SessionPhase::RoleUnknown | SessionPhase::RoleResolved => {
                let same_identity = state
                    .session
                    .as_ref()
                    .map(|current| current.identity.id == session.identity.id)
                    .unwrap_or(false);

                if same_identity {
                    state.session = Some(session);
                    state
                } else {
                    DashboardState {
                        phase: SessionPhase::RoleUnknown,
                        session: Some(session),
                        ..DashboardState::default()
                    }
                }
            }
        },

        Action::RoleResolved(role) => {
            if !matches!(
                state.phase,
                SessionPhase::RoleUnknown | SessionPhase::RoleResolved
            ) {
                return state;
            }
            match role {
                Some(role) => {
                    if state.role != Some(role) {
                        state.jobs.clear();
                        state.contractors.clear();
                    }
                    state.phase = SessionPhase::RoleResolved;
                    state.role = Some(role);
                    state.loading = true;
                }
                None => {
                    state.phase = SessionPhase::RoleUnknown;
                    state.role = None;
                    state.loading = false;
                    state.jobs.clear();
                    state.contractors.clear();
                }
            }
            state
        }

        Action::DataLoaded { jobs, contractors } => {
            if state.accepts_mutations() {
                state.jobs = jobs;
                sort_jobs(&mut state.jobs);
                state.contractors = contractors;
                state.loading = false;
                state.last_error = None;
            }
            state
        }

        Action::LoadFailed(message) => {
            if state.is_signed_in() {
                state.loading = false;
                state.last_error = Some(message);
            }
            state
        }

        Action::ContractorAssigned {
            job_id,
            contractor_id,
        } => {
            if !state.accepts_mutations() {
                return state;
            }
            let contractor = state
                .contractors
                .iter()
                .find(|contractor| contractor.id == contractor_id)
                .cloned();

            if let Some(job) = state.jobs.iter_mut().find(|job| job.id == job_id) {
                job.contractor_id = Some(contractor_id);
                job.contractor_name = contractor.as_ref().map(|c| c.name.clone());
                job.contractor_user_id = contractor.and_then(|c| c.user_id);
                job.status = job.status.after_assignment();
            }
            state
        }

        Action::StatusChanged { job_id, status } => {
            if !state.accepts_mutations() {
                return state;
            }
            if let Some(job) = state.jobs.iter_mut().find(|job| job.id == job_id) {
                job.status = status;
            }
            state
        }

        Action::JobDrafted(job) => {
            if state.accepts_mutations() {
                state.jobs.push(job);
                sort_jobs(&mut state.jobs);
            }
            state
        }

        Action::JobPersisted { draft_id, job } => {
            if !state.accepts_mutations() {
                return state;
            }
            state.jobs.retain(|existing| existing.id != draft_id && existing.id != job.id);
            state.jobs.push(job);
            sort_jobs(&mut state.jobs);
            state
        }

        Action::JobConfirmed(job) => {
            if !state.accepts_mutations() {
                return state;
            }
            match state.jobs.iter_mut().find(|existing| existing.id == job.id) {
                Some(existing) => *existing = job,
                None => state.jobs.push(job),
            }
            sort_jobs(&mut state.jobs);
            state
        }

        Action::JobsReconciled(jobs) | Action::MutationRolledBack(jobs) => {
            if state.accepts_mutations() {
                state.jobs = jobs;
                sort_jobs(&mut state.jobs);
            }
            state
        }

        Action::MutationFailed(message) => {
            if state.is_signed_in() {
                state.last_error = Some(message);
            }
            state
        }
    }
}

/// Same order the server lists jobs in: latest service date first.
fn sort_jobs(jobs: &mut [Job]) {
    jobs.sort_by_key(|job| (Reverse(job.service_date), Reverse(job.id)));
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::dtos::authdtos::SessionIdentityDto;

    fn session(email: &str) -> Session {
        Session {
            token: "token".to_string(),
            identity: SessionIdentityDto {
                id: Uuid::new_v4(),
                email: email.to_string(),
            },
        }
    }

    fn job(id: i64, day: u32, status: JobStatus) -> Job {
        Job {
            id,
            unit: format!("{}A", id),
            client_name: "Harbor View HOA".to_string(),
            client_email: None,
            address: "12 Pier Rd".to_string(),
            service_type: "Turnover Clean".to_string(),
            service_date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            lockbox_code: None,
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
            user_id: Some(Uuid::new_v4()),
            name: name.to_string(),
            specialty: "Plumbing".to_string(),
            rating: 4.5,
            avatar: None,
            created_at: Utc::now(),
        }
    }

    fn resolved(role: Role) -> DashboardState {
        let state = reduce(DashboardState::default(), Action::SignInStarted);
        let state = reduce(state, Action::SessionChanged(Some(session("pm@flashfix.test"))));
        let state = reduce(state, Action::RoleResolved(Some(role)));
        reduce(
            state,
            Action::DataLoaded {
                jobs: vec![job(1, 10, JobStatus::Pending), job(2, 12, JobStatus::Completed)],
                contractors: vec![contractor(7, "Rosa Delgado")],
            },
        )
    }

    #[test]
    fn test_session_lifecycle() {
        let state = reduce(DashboardState::default(), Action::SignInStarted);
        assert_eq!(state.phase, SessionPhase::Authenticating);

        let state = reduce(state, Action::SessionChanged(Some(session("pm@flashfix.test"))));
        assert_eq!(state.phase, SessionPhase::RoleUnknown);
        assert!(state.role.is_none());

        let state = reduce(state, Action::RoleResolved(Some(Role::PropertyManager)));
        assert_eq!(state.phase, SessionPhase::RoleResolved);
        assert!(state.loading);
    }

    #[test]
    fn test_missing_profile_keeps_role_unknown() {
        let state = reduce(DashboardState::default(), Action::SignInStarted);
        let state = reduce(state, Action::SessionChanged(Some(session("new@flashfix.test"))));
        let state = reduce(state, Action::RoleResolved(None));

        assert_eq!(state.phase, SessionPhase::RoleUnknown);
        assert!(state.session.is_some());

        let state = reduce(
            state,
            Action::DataLoaded {
                jobs: vec![job(1, 10, JobStatus::Pending)],
                contractors: vec![],
            },
        );
        assert!(state.jobs.is_empty());
    }

    #[test]
    fn test_session_without_sign_in_is_ignored() {
        let state = reduce(
            DashboardState::default(),
            Action::SessionChanged(Some(session("pm@flashfix.test"))),
        );
        assert_eq!(state, DashboardState::default());
    }

    #[test]
    fn test_jobs_sorted_latest_first() {
        let state = resolved(Role::PropertyManager);
        let ids: Vec<i64> = state.jobs.iter().map(|job| job.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_assignment_fills_contractor_and_starts_job() {
        let state = resolved(Role::PropertyManager);
        let state = reduce(
            state,
            Action::ContractorAssigned {
                job_id: 1,
                contractor_id: 7,
            },
        );

        let assigned = state.job(1).unwrap();
        assert_eq!(assigned.contractor_id, Some(7));
        assert_eq!(assigned.contractor_name.as_deref(), Some("Rosa Delgado"));
        assert_eq!(assigned.status, JobStatus::InProgress);

        let state = reduce(
            state,
            Action::ContractorAssigned {
                job_id: 2,
                contractor_id: 7,
            },
        );
        assert_eq!(state.job(2).unwrap().status, JobStatus::Completed);
    }

    #[test]
    fn test_draft_replaced_by_persisted_job() {
        let state = resolved(Role::PropertyManager);
        let state = reduce(state, Action::JobDrafted(job(-1, 20, JobStatus::Pending)));
        assert_eq!(state.jobs[0].id, -1);

        let state = reduce(
            state,
            Action::JobPersisted {
                draft_id: -1,
                job: job(3, 20, JobStatus::Pending),
            },
        );
        let ids: Vec<i64> = state.jobs.iter().map(|job| job.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_mutations_ignored_before_role_resolved() {
        let state = reduce(DashboardState::default(), Action::SignInStarted);
        let before = reduce(state, Action::SessionChanged(Some(session("pm@flashfix.test"))));
        let after = reduce(
            before.clone(),
            Action::StatusChanged {
                job_id: 1,
                status: JobStatus::Completed,
            },
        );
        assert_eq!(before, after);
    }

    #[test]
    fn test_sign_out_clears_everything() {
        let state = resolved(Role::Admin);
        let state = reduce(state, Action::SignedOut);
        assert_eq!(state, DashboardState::default());
    }

    #[test]
    fn test_other_identity_resets_cached_lists() {
        let state = resolved(Role::PropertyManager);
        let state = reduce(state, Action::SessionChanged(Some(session("other@flashfix.test"))));

        assert_eq!(state.phase, SessionPhase::RoleUnknown);
        assert!(state.jobs.is_empty());
        assert!(state.contractors.is_empty());
    }
}
