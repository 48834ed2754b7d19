use axum::http::StatusCode;
use thiserror::Error;

use crate::error::{ErrorMessage, HttpError};

/// SQLSTATE raised by policy rejections and by the admin procedures.
const INSUFFICIENT_PRIVILEGE: &str = "42501";
const CHECK_VIOLATION: &str = "23514";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("access denied")]
    AccessDenied,

    #[error("Job {0} not found")]
    JobNotFound(i64),

    #[error("Contractor {0} not found")]
    ContractorNotFound(i64),

    #[error("User {0} not found")]
    UserNotFound(uuid::Uuid),

    #[error("No contractor record is linked to this account")]
    ContractorNotLinked,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for ServiceError {
    fn from(error: sqlx::Error) -> Self {
        let code = error
            .as_database_error()
            .and_then(|db_error| db_error.code())
            .map(|code| code.into_owned());

        match code.as_deref() {
            Some(INSUFFICIENT_PRIVILEGE) => ServiceError::AccessDenied,
            Some(CHECK_VIOLATION) | Some(FOREIGN_KEY_VIOLATION) => {
                let message = error
                    .as_database_error()
                    .map(|db_error| db_error.message().to_string())
                    .unwrap_or_default();
                ServiceError::Validation(message)
            }
            Some(UNIQUE_VIOLATION) => ServiceError::Conflict("record already exists".to_string()),
            _ => ServiceError::Database(error),
        }
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::AccessDenied => StatusCode::FORBIDDEN,

            ServiceError::JobNotFound(_)
            | ServiceError::ContractorNotFound(_)
            | ServiceError::UserNotFound(_)
            | ServiceError::ContractorNotLinked => StatusCode::NOT_FOUND,

            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,

            ServiceError::Conflict(_) => StatusCode::CONFLICT,

            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            // Denials stay opaque: no hint about which rule or row was involved.
            ServiceError::AccessDenied => {
                HttpError::forbidden(ErrorMessage::PermissionDenied.to_string())
            }
            ServiceError::Database(ref db_error) => {
                tracing::error!("database error: {}", db_error);
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            }
            other => HttpError::new(other.to_string(), other.status_code()),
        }
    }
}
