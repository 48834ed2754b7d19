use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl JobStatus {
    pub fn to_str(&self) -> &str {
        match self {
            JobStatus::Pending => "Pending",
            JobStatus::InProgress => "In Progress",
            JobStatus::Completed => "Completed",
        }
    }

    /// Status a job moves to when a contractor is assigned to it.
    pub fn after_assignment(self) -> JobStatus {
        match self {
            JobStatus::Pending => JobStatus::InProgress,
            other => other,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(JobStatus::Pending),
            "In Progress" => Ok(JobStatus::InProgress),
            "Completed" => Ok(JobStatus::Completed),
            other => Err(format!("unknown job status: {}", other)),
        }
    }
}

/// A job row joined with its assigned contractor.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
pub struct Job {
    pub id: i64,
    pub unit: String,
    pub client_name: String,
    pub client_email: Option<String>,
    pub address: String,
    pub service_type: String,
    pub service_date: NaiveDate,
    pub lockbox_code: Option<String>,
    pub status: JobStatus,
    pub checklist_notes: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub contractor_id: Option<i64>,
    pub contractor_name: Option<String>,
    /// Linked identity of the assigned contractor; never sent to clients.
    #[serde(default, skip_serializing)]
    pub contractor_user_id: Option<Uuid>,
}
