//! Role-based access rules, mirroring the row-level policies installed by the
//! migrations so that every decision can be made (and tested) without a database.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::profilemodel::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Profiles,
    Contractors,
    Jobs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Create,
    Update,
    Delete,
}

/// Which rows of a resource an operation may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowScope {
    None,
    /// Only the row belonging to the caller's own identity.
    Own,
    /// Only jobs assigned to the contractor record linked to the caller.
    Assigned,
    All,
}

impl RowScope {
    pub fn is_denied(self) -> bool {
        self == RowScope::None
    }
}

/// The authenticated caller of a request. `role` is `None` while the caller's
/// profile row does not exist yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Caller {
    pub id: Uuid,
    pub email: String,
    pub role: Option<Role>,
}

impl Caller {
    pub fn principal(&self) -> Principal {
        Principal::Authenticated(self.role)
    }

    pub fn scope(&self, resource: Resource, operation: Operation) -> RowScope {
        row_scope(self.principal(), resource, operation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    Anonymous,
    Authenticated(Option<Role>),
}

pub fn row_scope(principal: Principal, resource: Resource, operation: Operation) -> RowScope {
    use Operation::*;
    use Resource::*;

    let role = match principal {
        Principal::Anonymous => return RowScope::None,
        Principal::Authenticated(role) => role,
    };

    match (role, resource, operation) {
        (Some(Role::Admin), _, _) => RowScope::All,

        // Grants every authenticated caller has, with or without a profile.
        (_, Profiles, Read) => RowScope::Own,
        (_, Contractors, Read) => RowScope::All,

        (Some(Role::PropertyManager), Contractors, Create | Update) => RowScope::All,
        (Some(Role::PropertyManager), Jobs, Read | Create | Update) => RowScope::All,

        (Some(Role::Contractor), Jobs, Read | Update) => RowScope::Assigned,

        _ => RowScope::None,
    }
}

/// A job is in a contractor's scope only when its assigned contractor record is
/// linked to the caller's identity. Unassigned jobs and jobs of unlinked
/// contractors are never in scope.
pub fn job_in_scope(caller_id: Uuid, assignee_identity: Option<Uuid>) -> bool {
    assignee_identity == Some(caller_id)
}

/// Fields a job update would change. Contractors may only change `status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobFieldsTouched {
    pub status: bool,
    pub assignment: bool,
    pub details: bool,
}

pub fn may_update_job_fields(role: Option<Role>, touched: JobFieldsTouched) -> bool {
    match role {
        Some(Role::Admin) | Some(Role::PropertyManager) => true,
        Some(Role::Contractor) => !touched.assignment && !touched.details,
        None => false,
    }
}
