// service/admin_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{db::DBClient, identitydb::IdentityExt, profiledb::ProfileExt},
    models::profilemodel::{Profile, Role, UserSummary},
    service::{
        access_policy::{Caller, Operation, Resource, RowScope},
        error::ServiceError,
    },
};

/// Administrative user management. The listing and deletion go through the
/// database procedures, which repeat the admin check on their side.
#[derive(Debug, Clone)]
pub struct AdminService {
    db_client: Arc<DBClient>,
}

impl AdminService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn list_users(&self, caller: &Caller) -> Result<Vec<UserSummary>, ServiceError> {
        self.require(caller, Operation::Read)?;
        Ok(self.db_client.get_all_users(caller.id).await?)
    }

    pub async fn delete_user(&self, caller: &Caller, target: Uuid) -> Result<(), ServiceError> {
        self.require(caller, Operation::Delete)?;

        self.db_client
            .get_identity(Some(target), None)
            .await?
            .ok_or(ServiceError::UserNotFound(target))?;

        self.db_client.delete_user(caller.id, target).await?;

        tracing::warn!("identity {} deleted by admin {}", target, caller.id);
        Ok(())
    }

    pub async fn update_role(
        &self,
        caller: &Caller,
        profile_id: Uuid,
        role: Role,
    ) -> Result<Profile, ServiceError> {
        self.require(caller, Operation::Update)?;

        let profile = self
            .db_client
            .update_profile_role(caller.id, profile_id, role)
            .await?
            .ok_or(ServiceError::UserNotFound(profile_id))?;

        tracing::info!("profile {} now has role {} (changed by {})", profile.id, profile.role, caller.id);
        Ok(profile)
    }

    fn require(&self, caller: &Caller, operation: Operation) -> Result<(), ServiceError> {
        match caller.scope(Resource::Profiles, operation) {
            RowScope::All => Ok(()),
            _ => Err(ServiceError::AccessDenied),
        }
    }
}
