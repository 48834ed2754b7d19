use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use super::backend::{BackendError, DispatchBackend, Session};
use crate::{
    dtos::{
        authdtos::{LoginDto, LoginResponseDto},
        dispatchdtos::{ApiResponse, AssignContractorDto, CreateJobDto, UpdateJobStatusDto},
    },
    error::ErrorResponse,
    models::{
        contractormodel::Contractor,
        jobmodel::{Job, JobStatus},
        profilemodel::{Profile, Role},
    },
};

/// HTTP client for the `/api` routes, authenticating with bearer tokens.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Sends `request` and unwraps the `data` of the success envelope.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Option<T>, BackendError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let body: ApiResponse<T> = response.json().await?;
            return Ok(body.data);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.message,
            Err(_) => status.to_string(),
        };

        Err(match status {
            StatusCode::UNAUTHORIZED => BackendError::Unauthorized(message),
            StatusCode::FORBIDDEN => BackendError::AccessDenied,
            _ => BackendError::Rejected {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn send_required<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, BackendError> {
        self.send(request).await?.ok_or_else(|| BackendError::Rejected {
            status: StatusCode::OK.as_u16(),
            message: "response carried no data".to_string(),
        })
    }
}

#[async_trait]
impl DispatchBackend for ApiClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&LoginDto {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.message,
                Err(_) => status.to_string(),
            };
            return Err(BackendError::Unauthorized(message));
        }

        let body: LoginResponseDto = response.json().await?;
        Ok(Session {
            token: body.token,
            identity: body.identity,
        })
    }

    async fn sign_out(&self, session: &Session) -> Result<(), BackendError> {
        self.send::<serde_json::Value>(
            self.http
                .post(self.url("/auth/logout"))
                .bearer_auth(&session.token),
        )
        .await?;
        Ok(())
    }

    async fn fetch_role(&self, session: &Session) -> Result<Option<Role>, BackendError> {
        let profile: Option<Profile> = self
            .send(
                self.http
                    .get(self.url("/profiles/me"))
                    .bearer_auth(&session.token),
            )
            .await?;
        Ok(profile.map(|profile| profile.role))
    }

    async fn fetch_jobs(&self, session: &Session) -> Result<Vec<Job>, BackendError> {
        self.send_required(self.http.get(self.url("/jobs")).bearer_auth(&session.token))
            .await
    }

    async fn fetch_contractors(&self, session: &Session) -> Result<Vec<Contractor>, BackendError> {
        self.send_required(
            self.http
                .get(self.url("/contractors"))
                .bearer_auth(&session.token),
        )
        .await
    }

    async fn assign_contractor(
        &self,
        session: &Session,
        job_id: i64,
        contractor_id: i64,
    ) -> Result<Job, BackendError> {
        self.send_required(
            self.http
                .put(self.url(&format!("/jobs/{}/assign", job_id)))
                .bearer_auth(&session.token)
                .json(&AssignContractorDto { contractor_id }),
        )
        .await
    }

    async fn update_job_status(
        &self,
        session: &Session,
        job_id: i64,
        status: JobStatus,
    ) -> Result<Job, BackendError> {
        self.send_required(
            self.http
                .patch(self.url(&format!("/jobs/{}/status", job_id)))
                .bearer_auth(&session.token)
                .json(&UpdateJobStatusDto { status }),
        )
        .await
    }

    async fn create_job(&self, session: &Session, job: &CreateJobDto) -> Result<Job, BackendError> {
        self.send_required(
            self.http
                .post(self.url("/jobs"))
                .bearer_auth(&session.token)
                .json(job),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_urls_are_rooted_at_api() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.url("/jobs"), "http://localhost:8000/api/jobs");
        assert_eq!(
            client.url(&format!("/jobs/{}/assign", 3)),
            "http://localhost:8000/api/jobs/3/assign"
        );
    }

    #[test]
    fn test_status_body_uses_wire_names() {
        let body = serde_json::to_value(UpdateJobStatusDto {
            status: JobStatus::InProgress,
        })
        .unwrap();
        assert_eq!(body, json!({ "status": "In Progress" }));
    }
}
