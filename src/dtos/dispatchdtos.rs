use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::{jobmodel::JobStatus, profilemodel::Role},
    service::access_policy::JobFieldsTouched,
};

/// Nullable job columns a partial update can reset to empty.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClearableJobField {
    ClientEmail,
    LockboxCode,
    ChecklistNotes,
}

/// Nullable contractor columns a partial update can reset to empty.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClearableContractorField {
    Avatar,
    UserId,
}

// Job DTOs
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct CreateJobDto {
    #[validate(length(min = 1, max = 50, message = "Unit must be between 1 and 50 characters"))]
    pub unit: String,

    #[validate(length(min = 1, max = 200, message = "Client name is required"))]
    pub client_name: String,

    #[validate(email(message = "Client email is invalid"))]
    pub client_email: Option<String>,

    #[validate(length(min = 1, max = 500, message = "Address is required"))]
    pub address: String,

    #[validate(length(min = 1, max = 100, message = "Service type is required"))]
    pub service_type: String,

    pub service_date: NaiveDate,

    #[validate(length(max = 64, message = "Lockbox code must be at most 64 characters"))]
    pub lockbox_code: Option<String>,

    #[validate(length(max = 4000, message = "Checklist notes must be at most 4000 characters"))]
    pub checklist_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateJobDto {
    #[validate(length(min = 1, max = 50, message = "Unit must be between 1 and 50 characters"))]
    pub unit: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Client name cannot be empty"))]
    pub client_name: Option<String>,

    #[validate(email(message = "Client email is invalid"))]
    pub client_email: Option<String>,

    #[validate(length(min = 1, max = 500, message = "Address cannot be empty"))]
    pub address: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Service type cannot be empty"))]
    pub service_type: Option<String>,

    pub service_date: Option<NaiveDate>,

    #[validate(length(max = 64, message = "Lockbox code must be at most 64 characters"))]
    pub lockbox_code: Option<String>,

    #[validate(length(max = 4000, message = "Checklist notes must be at most 4000 characters"))]
    pub checklist_notes: Option<String>,

    pub status: Option<JobStatus>,

    #[serde(default)]
    pub clear: Vec<ClearableJobField>,
}

impl UpdateJobDto {
    pub fn clears(&self, field: ClearableJobField) -> bool {
        self.clear.contains(&field)
    }

    /// A field listed in `clear` must not carry a new value as well.
    pub fn check_clears(&self) -> Result<(), String> {
        for field in &self.clear {
            let (name, set) = match field {
                ClearableJobField::ClientEmail => ("client_email", self.client_email.is_some()),
                ClearableJobField::LockboxCode => ("lockbox_code", self.lockbox_code.is_some()),
                ClearableJobField::ChecklistNotes => {
                    ("checklist_notes", self.checklist_notes.is_some())
                }
            };
            if set {
                return Err(format!("{} cannot be set and cleared in one update", name));
            }
        }
        Ok(())
    }

    pub fn fields_touched(&self) -> JobFieldsTouched {
        JobFieldsTouched {
            status: self.status.is_some(),
            assignment: false,
            details: self.unit.is_some()
                || self.client_name.is_some()
                || self.client_email.is_some()
                || self.address.is_some()
                || self.service_type.is_some()
                || self.service_date.is_some()
                || self.lockbox_code.is_some()
                || self.checklist_notes.is_some()
                || !self.clear.is_empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields_touched() == JobFieldsTouched::default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobFilterDto {
    pub status: Option<JobStatus>,
    pub contractor_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignContractorDto {
    pub contractor_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateJobStatusDto {
    pub status: JobStatus,
}

// Contractor DTOs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateContractorDto {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, max = 100, message = "Specialty is required"))]
    pub specialty: String,

    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: Option<f32>,

    #[validate(length(max = 16, message = "Avatar must be at most 16 characters"))]
    pub avatar: Option<String>,

    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateContractorDto {
    #[validate(length(min = 1, max = 200, message = "Name cannot be empty"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Specialty cannot be empty"))]
    pub specialty: Option<String>,

    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: Option<f32>,

    #[validate(length(max = 16, message = "Avatar must be at most 16 characters"))]
    pub avatar: Option<String>,

    pub user_id: Option<Uuid>,

    #[serde(default)]
    pub clear: Vec<ClearableContractorField>,
}

impl UpdateContractorDto {
    pub fn clears(&self, field: ClearableContractorField) -> bool {
        self.clear.contains(&field)
    }

    pub fn check_clears(&self) -> Result<(), String> {
        for field in &self.clear {
            let (name, set) = match field {
                ClearableContractorField::Avatar => ("avatar", self.avatar.is_some()),
                ClearableContractorField::UserId => ("user_id", self.user_id.is_some()),
            };
            if set {
                return Err(format!("{} cannot be set and cleared in one update", name));
            }
        }
        Ok(())
    }
}

// Admin DTOs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRoleDto {
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            data: Some(data),
        }
    }
}
