pub mod admin;
pub mod auth;
pub mod contractors;
pub mod jobs;
pub mod profiles;
