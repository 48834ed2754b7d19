pub mod config;
pub mod dashboard;
pub mod db;
pub mod dtos;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
pub mod utils;

use std::sync::Arc;

use config::Config;
use db::db::DBClient;
use service::{
    admin_service::AdminService, contractor_service::ContractorService, job_service::JobService,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    pub job_service: Arc<JobService>,
    pub contractor_service: Arc<ContractorService>,
    pub admin_service: Arc<AdminService>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client = Arc::new(db_client);

        Self {
            env: config,
            job_service: Arc::new(JobService::new(db_client.clone())),
            contractor_service: Arc::new(ContractorService::new(db_client.clone())),
            admin_service: Arc::new(AdminService::new(db_client.clone())),
            db_client,
        }
    }
}
