pub mod access_policy;
pub mod admin_service;
pub mod contractor_service;
pub mod error;
pub mod job_service;
