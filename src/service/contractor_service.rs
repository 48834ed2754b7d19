// service/contractor_service.rs
use std::sync::Arc;

use crate::{
    db::{contractordb::ContractorExt, db::DBClient},
    dtos::dispatchdtos::{CreateContractorDto, UpdateContractorDto},
    models::contractormodel::Contractor,
    service::{
        access_policy::{Caller, Operation, Resource, RowScope},
        error::ServiceError,
    },
};

#[derive(Debug, Clone)]
pub struct ContractorService {
    db_client: Arc<DBClient>,
}

impl ContractorService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    /// Every authenticated caller can read the roster, ordered by name.
    pub async fn list_contractors(&self, caller: &Caller) -> Result<Vec<Contractor>, ServiceError> {
        self.require(caller, Operation::Read)?;
        Ok(self.db_client.get_contractors(caller.id).await?)
    }

    /// The contractor record a contractor login resolves to.
    pub async fn my_contractor(&self, caller: &Caller) -> Result<Contractor, ServiceError> {
        self.require(caller, Operation::Read)?;

        self.db_client
            .get_contractor_by_user(caller.id, caller.id)
            .await?
            .ok_or(ServiceError::ContractorNotLinked)
    }

    pub async fn create_contractor(
        &self,
        caller: &Caller,
        contractor: CreateContractorDto,
    ) -> Result<Contractor, ServiceError> {
        self.require(caller, Operation::Create)?;

        let created = self.db_client.create_contractor(caller.id, &contractor).await?;

        tracing::info!("contractor {} ({}) created by {}", created.id, created.name, caller.id);
        Ok(created)
    }

    pub async fn update_contractor(
        &self,
        caller: &Caller,
        contractor_id: i64,
        changes: UpdateContractorDto,
    ) -> Result<Contractor, ServiceError> {
        self.require(caller, Operation::Update)?;
        changes.check_clears().map_err(ServiceError::Validation)?;

        self.db_client
            .update_contractor(caller.id, contractor_id, &changes)
            .await?
            .ok_or(ServiceError::ContractorNotFound(contractor_id))
    }

    pub async fn delete_contractor(&self, caller: &Caller, contractor_id: i64) -> Result<(), ServiceError> {
        self.require(caller, Operation::Delete)?;

        if !self.db_client.delete_contractor(caller.id, contractor_id).await? {
            return Err(ServiceError::ContractorNotFound(contractor_id));
        }

        tracing::info!("contractor {} deleted by {}", contractor_id, caller.id);
        Ok(())
    }

    fn require(&self, caller: &Caller, operation: Operation) -> Result<(), ServiceError> {
        match caller.scope(Resource::Contractors, operation) {
            RowScope::All => Ok(()),
            _ => Err(ServiceError::AccessDenied),
        }
    }
}
